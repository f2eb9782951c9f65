// # zonesync-core
//
// Core library for synchronizing zone records with line-oriented DNS
// provider APIs.
//
// ## Architecture Overview
//
// This library provides:
// - **Record**: The normalized record model (name, type, value, ttl)
// - **LineCodec**: `<name> <ttl> IN <type> <value>` parsing and formatting,
//   with a pluggable TXT sanitize strategy
// - **Transport**: Trait for sending typed commands to the provider
// - **ZoneReconciler**: Session owner and record operations (get, append,
//   set, delete), including the set-diffing reconciliation
// - **TransportRegistry**: Plugin-based registry for transports
//
// ## Design Principles
//
// 1. **Provider is authoritative**: No local state survives a call
// 2. **Typed until the edge**: Commands only become string maps in transports
// 3. **Serialized session**: One lock covers every operation
// 4. **No hidden retries**: Every remote failure reaches the caller

pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod reconciler;
pub mod record;
pub mod registry;
pub mod traffic;
pub mod traits;
pub mod transport;

// Re-export core types for convenience
pub use codec::{LineCodec, TtlParsing};
pub use config::{Entity, ProviderConfig, ReconcileConfig, ZoneSyncConfig};
pub use error::{Error, Result};
pub use reconciler::{ChangeSet, IdentityPolicy, ZoneReconciler, plan_changes};
pub use record::Record;
pub use registry::TransportRegistry;
pub use traits::{Transport, ZoneProvider};
