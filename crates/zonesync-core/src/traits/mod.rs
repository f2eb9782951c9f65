//! Core traits for zonesync
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Transport`]: Send typed commands to the remote provider
//! - [`ZoneProvider`]: Caller-facing record operations per zone

pub mod transport;
pub mod zone_provider;

pub use transport::{Credentials, Session, Transport, TransportFactory};
pub use zone_provider::ZoneProvider;
