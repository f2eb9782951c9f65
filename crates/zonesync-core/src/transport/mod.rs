//! Built-in transport implementations
//!
//! This module provides transports that ship with the core crate.

mod memory;

pub use memory::{MemoryTransport, MemoryTransportFactory};
