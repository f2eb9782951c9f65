//! Error types for zonesync
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for zonesync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for zonesync
#[derive(Error, Debug)]
pub enum Error {
    /// Session establishment was rejected by the provider
    #[error("Authentication failed (code {code}): {description}")]
    Authentication {
        /// Provider response code
        code: u32,
        /// Provider response description
        description: String,
    },

    /// A line record did not match the `<name> <ttl> IN <type> <value>` grammar
    #[error("Malformed record line: {0:?}")]
    MalformedRecordLine(String),

    /// A line record carried a TTL that does not fit in 32 bits
    #[error("Invalid TTL {ttl:?} in record line: {line:?}")]
    InvalidTtl {
        /// The offending line
        line: String,
        /// The TTL field as received
        ttl: String,
    },

    /// A read command (record listing) was rejected by the provider
    #[error("Remote query failed (code {code}): {description}")]
    RemoteQueryFailed {
        /// Provider response code
        code: u32,
        /// Provider response description
        description: String,
    },

    /// A mutating command (add/remove) was rejected by the provider
    #[error("Remote mutation failed (code {code}): {description}")]
    RemoteMutationFailed {
        /// Provider response code
        code: u32,
        /// Provider response description
        description: String,
    },

    /// Transport-level errors (connection, HTTP status, unreadable body)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an authentication error
    pub fn auth(code: u32, description: impl Into<String>) -> Self {
        Self::Authentication {
            code,
            description: description.into(),
        }
    }

    /// Create a malformed-line error
    pub fn malformed(line: impl Into<String>) -> Self {
        Self::MalformedRecordLine(line.into())
    }

    /// Create a failed-query error
    pub fn query_failed(code: u32, description: impl Into<String>) -> Self {
        Self::RemoteQueryFailed {
            code,
            description: description.into(),
        }
    }

    /// Create a failed-mutation error
    pub fn mutation_failed(code: u32, description: impl Into<String>) -> Self {
        Self::RemoteMutationFailed {
            code,
            description: description.into(),
        }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the provider itself answered with a non-success code
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. }
                | Self::RemoteQueryFailed { .. }
                | Self::RemoteMutationFailed { .. }
        )
    }

    /// The provider response code, when the error carries one
    pub fn remote_code(&self) -> Option<u32> {
        match self {
            Self::Authentication { code, .. }
            | Self::RemoteQueryFailed { code, .. }
            | Self::RemoteMutationFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_code_is_exposed() {
        let err = Error::query_failed(505, "Object does not exist");
        assert!(err.is_remote_failure());
        assert_eq!(err.remote_code(), Some(505));
        assert_eq!(
            err.to_string(),
            "Remote query failed (code 505): Object does not exist"
        );
    }

    #[test]
    fn test_local_errors_have_no_code() {
        let err = Error::malformed("garbage");
        assert!(!err.is_remote_failure());
        assert_eq!(err.remote_code(), None);
    }
}
