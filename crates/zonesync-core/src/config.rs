//! Configuration types for zonesync
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec::TtlParsing;
use crate::reconciler::IdentityPolicy;
use crate::traits::Credentials;

/// Main zonesync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSyncConfig {
    /// Provider connection settings
    pub provider: ProviderConfig,

    /// Reconciliation behaviour
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

impl ZoneSyncConfig {
    /// Create a configuration for the given provider with default reconcile settings
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            reconcile: ReconcileConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()
    }
}

/// Hexonet API environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    /// Live system
    #[default]
    Live,
    /// OT&E test system
    Ote,
}

impl Entity {
    /// The `s_entity` value sent on every request
    pub fn code(self) -> &'static str {
        match self {
            Entity::Live => "54cd",
            Entity::Ote => "1234",
        }
    }

    /// Parse a configuration value (`live`/`54cd` or `ote`/`1234`)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "live" | "54cd" => Some(Entity::Live),
            "ote" | "test" | "1234" => Some(Entity::Ote),
            _ => None,
        }
    }
}

/// Provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Hexonet HTTP API
    Hexonet {
        /// Account login
        username: String,
        /// Account password
        password: String,
        /// API environment
        #[serde(default)]
        entity: Entity,
        /// API endpoint override (defaults to the public gateway)
        #[serde(default)]
        endpoint: Option<String>,
        /// Raw traffic dump target: stdout, stderr, trace (empty = off)
        #[serde(default)]
        debug: Option<String>,
    },

    /// In-process transport (tests, dry runs)
    Memory,

    /// Custom transport
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Hexonet {
                username,
                password,
                endpoint,
                ..
            } => {
                if username.is_empty() {
                    return Err(crate::Error::config("Hexonet username cannot be empty"));
                }
                if password.is_empty() {
                    return Err(crate::Error::config("Hexonet password cannot be empty"));
                }
                if let Some(url) = endpoint
                    && !url.starts_with("https://")
                    && !url.starts_with("http://")
                {
                    return Err(crate::Error::config(format!(
                        "Hexonet endpoint must use HTTP or HTTPS scheme. Got: {url}"
                    )));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
            ProviderConfig::Memory => Ok(()),
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Hexonet { .. } => "hexonet",
            ProviderConfig::Memory => "memory",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }

    /// Credentials to log in with
    ///
    /// Custom providers may carry `username`/`password` keys in their config
    /// object; anything missing is empty.
    pub fn credentials(&self) -> Credentials {
        match self {
            ProviderConfig::Hexonet {
                username, password, ..
            } => Credentials::new(username.clone(), password.clone()),
            ProviderConfig::Memory => Credentials::new("", ""),
            ProviderConfig::Custom { config, .. } => {
                let field = |key: &str| {
                    config
                        .get(key)
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                Credentials::new(field("username"), field("password"))
            }
        }
    }
}

// Custom Debug implementation that hides the password
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Hexonet {
                username,
                entity,
                endpoint,
                debug,
                ..
            } => f
                .debug_struct("Hexonet")
                .field("username", username)
                .field("password", &"<REDACTED>")
                .field("entity", entity)
                .field("endpoint", endpoint)
                .field("debug", debug)
                .finish(),
            ProviderConfig::Memory => f.write_str("Memory"),
            ProviderConfig::Custom { factory, .. } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", &"<REDACTED>")
                .finish(),
        }
    }
}

/// Reconciliation settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Which fields identify a record when diffing
    #[serde(default)]
    pub identity: IdentityPolicy,

    /// How to treat out-of-range TTLs in listed records
    #[serde(default)]
    pub ttl_parsing: TtlParsing,
}
