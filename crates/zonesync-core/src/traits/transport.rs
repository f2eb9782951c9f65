// # Transport Trait
//
// The boundary to the remote provider: log in once, send typed commands over
// the resulting session, log out.
//
// ## Implementations
//
// - Hexonet HTTP gateway: `zonesync-hexonet` crate
// - In-process fake: `zonesync_core::transport::MemoryTransport`
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::traits::{Credentials, Transport};
// use zonesync_core::command::{Command, ListRequest};
//
// let login = transport.login(&Credentials::new("user", "secret")).await?;
// let session = Session::from_response(&login)?;
// let response = transport
//     .request(&session, &Command::List(ListRequest { zone: "example.com".into() }))
//     .await?;
// ```

use async_trait::async_trait;
use std::fmt;

use crate::command::{Command, Response};
use crate::error::{Error, Result};

/// Account credentials for the provider
///
/// The Debug implementation intentionally does NOT expose the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account login
    pub username: String,
    /// Account password
    /// ⚠️ NEVER log this value
    pub password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// An established provider session
///
/// The Debug implementation intentionally does NOT expose the session id.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
}

impl Session {
    /// Wrap a raw session id
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Build a session from a login response
    ///
    /// # Errors
    ///
    /// [`Error::Authentication`] if the login was rejected, [`Error::Transport`]
    /// if it succeeded without returning a session id.
    pub fn from_response(response: &Response) -> Result<Self> {
        if !response.is_success() {
            return Err(Error::auth(response.code, response.description.clone()));
        }
        response
            .session_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(Self::new)
            .ok_or_else(|| Error::transport("login succeeded without a session id"))
    }

    /// The raw session id
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("id", &"<REDACTED>").finish()
    }
}

/// Trait for provider transports
///
/// A transport moves one command to the provider and brings one response
/// back. It does not interpret response codes beyond building a
/// [`Response`]; mapping codes to errors is the reconciler's job.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Constraints
///
/// - No retry (a failed call surfaces immediately)
/// - No caching between calls
/// - One remote call per method invocation
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a session
    ///
    /// Returns the provider's answer as-is; a non-success code is NOT an
    /// `Err` here. `Err` is reserved for failures to reach the provider.
    async fn login(&self, credentials: &Credentials) -> Result<Response>;

    /// Send one command over an open session
    async fn request(&self, session: &Session, command: &Command) -> Result<Response>;

    /// Close a session
    async fn logout(&self, session: &Session) -> Result<()>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}

/// Helper trait for constructing transports from configuration
pub trait TransportFactory: Send + Sync {
    /// Create a Transport instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn Transport>>;
}
