//! Plugin-based transport registry
//!
//! The registry allows transports to be registered dynamically at runtime,
//! avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zonesync_core::registry::TransportRegistry;
//! use zonesync_core::config::ProviderConfig;
//!
//! let registry = TransportRegistry::with_builtins();
//! zonesync_hexonet::register(&registry);
//!
//! let transport = registry.create_transport(&ProviderConfig::Memory)?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{Transport, TransportFactory};
use crate::transport::MemoryTransportFactory;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Registry for plugin-based transport creation
///
/// Maps provider type names (as returned by [`ProviderConfig::type_name`])
/// to factories.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct TransportRegistry {
    transports: RwLock<HashMap<String, Box<dyn TransportFactory>>>,
}

impl TransportRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the in-process `memory` transport registered
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_transport("memory", Box::new(MemoryTransportFactory));
        registry
    }

    /// Register a transport factory under a provider type name
    pub fn register_transport(&self, name: impl Into<String>, factory: Box<dyn TransportFactory>) {
        let mut transports = self
            .transports
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        transports.insert(name.into(), factory);
    }

    /// Create a transport from configuration
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the provider type is not registered, or whatever
    /// the factory returns.
    pub fn create_transport(&self, config: &ProviderConfig) -> Result<Box<dyn Transport>> {
        let provider_type = config.type_name();
        let transports = self
            .transports
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = transports
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {provider_type}")))?;

        factory.create(config)
    }

    /// List all registered provider types
    pub fn list_transports(&self) -> Vec<String> {
        let transports = self
            .transports
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = transports.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider type is registered
    pub fn has_transport(&self, name: &str) -> bool {
        self.transports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }
}
