// # Hexonet Transport
//
// This crate provides the Hexonet API transport for zonesync.
//
// ## Behaviour
//
// - ✅ One HTTP request per transport call
// - ✅ Session login via `StartSession`, logout via `EndSession`
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Raw traffic can be observed through a TrafficSink (password and
//   session ids redacted)
// - ❌ NO retry logic (a failed call surfaces immediately)
// - ❌ NO response-code interpretation (owned by ZoneReconciler)
// - ❌ NO caching
//
// ## Security Requirements
//
// - The password is only sent with `StartSession` and never reaches logs
//   or the traffic sink
// - Session ids never appear in logs or the traffic sink
//
// ## API Reference
//
// - Gateway: POST `https://api.ispapi.net/api/call.cgi`
// - Form fields: `s_entity`, `s_login` + `s_pw` or `s_session`, `s_command`
// - `s_command` is one `KEY = value` pair per line

mod response;

pub use response::parse_response;

use response::redact_session;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use zonesync_core::command::{Command, Response};
use zonesync_core::config::{Entity, ProviderConfig};
use zonesync_core::traffic::{DebugTarget, DiscardSink, Direction, TrafficSink};
use zonesync_core::traits::{Credentials, Session, Transport, TransportFactory};
use zonesync_core::{Error, Result, TransportRegistry};

/// Public API gateway
pub const DEFAULT_ENDPOINT: &str = "https://api.ispapi.net/api/call.cgi";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Hexonet API transport
///
/// Holds no credentials: they are passed to [`Transport::login`] and only
/// the resulting session is used afterwards.
pub struct HexonetTransport {
    /// HTTP client for API requests
    client: reqwest::Client,

    /// Gateway URL
    endpoint: String,

    /// API environment
    entity: Entity,

    /// Observer of raw requests and responses
    traffic: Arc<dyn TrafficSink>,
}

impl std::fmt::Debug for HexonetTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HexonetTransport")
            .field("endpoint", &self.endpoint)
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}

impl HexonetTransport {
    /// Create a transport against `endpoint` for `entity`
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, entity: Entity) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            entity,
            traffic: Arc::new(DiscardSink),
        })
    }

    /// Create a transport against the public gateway
    pub fn live() -> Result<Self> {
        Self::new(DEFAULT_ENDPOINT, Entity::Live)
    }

    /// Report raw traffic to a sink
    pub fn with_traffic_sink(mut self, traffic: Arc<dyn TrafficSink>) -> Self {
        self.traffic = traffic;
        self
    }

    /// The gateway URL in use
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one command and parse the answer
    ///
    /// `auth` are the form fields identifying the caller; `redacted` is what
    /// the traffic sink sees in their place.
    async fn call(
        &self,
        auth: &[(&str, &str)],
        redacted: &str,
        params: &[(String, String)],
    ) -> Result<Response> {
        let command = encode_command(params);
        self.traffic
            .observe(Direction::Outgoing, &format!("{redacted}\n{command}"));

        let mut form: Vec<(&str, &str)> = vec![("s_entity", self.entity.code())];
        form.extend_from_slice(auth);
        form.push(("s_command", command.as_str()));

        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {e}")))?;
        self.traffic
            .observe(Direction::Incoming, &redact_session(&body));

        if !status.is_success() {
            return Err(Error::transport(format!(
                "Hexonet gateway returned HTTP {status}"
            )));
        }

        parse_response(&body)
    }
}

/// Render parameters as the `s_command` payload
fn encode_command(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key} = {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn single(command: &str) -> Vec<(String, String)> {
    vec![("COMMAND".to_string(), command.to_string())]
}

#[async_trait]
impl Transport for HexonetTransport {
    async fn login(&self, credentials: &Credentials) -> Result<Response> {
        tracing::debug!("Starting Hexonet session for {}", credentials.username);
        self.call(
            &[
                ("s_login", credentials.username.as_str()),
                ("s_pw", credentials.password.as_str()),
            ],
            &format!("s_login = {}\ns_pw = ***", credentials.username),
            &single("StartSession"),
        )
        .await
    }

    async fn request(&self, session: &Session, command: &Command) -> Result<Response> {
        tracing::debug!("Sending {} for zone {}", command.name(), command.zone());
        self.call(
            &[("s_session", session.id())],
            "s_session = ***",
            &command.to_wire(),
        )
        .await
    }

    async fn logout(&self, session: &Session) -> Result<()> {
        let response = self
            .call(
                &[("s_session", session.id())],
                "s_session = ***",
                &single("EndSession"),
            )
            .await?;
        if !response.is_success() {
            tracing::warn!(
                "EndSession returned {}: {}",
                response.code,
                response.description
            );
        }
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "hexonet"
    }
}

/// Factory for creating Hexonet transports
pub struct HexonetFactory;

impl TransportFactory for HexonetFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn Transport>> {
        match config {
            ProviderConfig::Hexonet {
                entity,
                endpoint,
                debug,
                ..
            } => {
                config.validate()?;

                let target = debug.as_deref().map_or(DebugTarget::Off, DebugTarget::parse);
                if target != DebugTarget::Off {
                    tracing::warn!("Hexonet traffic dump enabled ({:?})", target);
                }

                let endpoint = endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
                Ok(Box::new(
                    HexonetTransport::new(endpoint, *entity)?.with_traffic_sink(target.sink()),
                ))
            }
            _ => Err(Error::config("Invalid config for Hexonet transport")),
        }
    }
}

/// Register the Hexonet transport with a registry
///
/// # Example
///
/// ```rust
/// use zonesync_core::TransportRegistry;
///
/// let registry = TransportRegistry::new();
/// zonesync_hexonet::register(&registry);
/// assert!(registry.has_transport("hexonet"));
/// ```
pub fn register(registry: &TransportRegistry) {
    registry.register_transport("hexonet", Box::new(HexonetFactory));
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonesync_core::command::MutateRequest;

    fn config(debug: Option<&str>) -> ProviderConfig {
        ProviderConfig::Hexonet {
            username: "user".to_string(),
            password: "secret".to_string(),
            entity: Entity::Ote,
            endpoint: None,
            debug: debug.map(str::to_string),
        }
    }

    #[test]
    fn test_factory_creation() {
        let transport = HexonetFactory.create(&config(None)).unwrap();
        assert_eq!(transport.transport_name(), "hexonet");
    }

    #[test]
    fn test_factory_with_debug_target() {
        assert!(HexonetFactory.create(&config(Some("stderr"))).is_ok());
    }

    #[test]
    fn test_factory_missing_password() {
        let config = ProviderConfig::Hexonet {
            username: "user".to_string(),
            password: String::new(),
            entity: Entity::Live,
            endpoint: None,
            debug: None,
        };
        assert!(HexonetFactory.create(&config).is_err());
    }

    #[test]
    fn test_factory_rejects_other_config() {
        assert!(HexonetFactory.create(&ProviderConfig::Memory).is_err());
    }

    #[test]
    fn test_encode_update_command() {
        let command = Command::Mutate(MutateRequest::add(
            "acme.com",
            vec!["acme.com. 300 IN A 1.2.3.4".to_string()],
        ));
        assert_eq!(
            encode_command(&command.to_wire()),
            "COMMAND = UpdateDNSZone\ndnszone = acme.com\naddrr0 = acme.com. 300 IN A 1.2.3.4"
        );
    }

    #[test]
    fn test_register() {
        let registry = TransportRegistry::new();
        register(&registry);
        assert!(registry.has_transport("hexonet"));
    }

    #[test]
    fn test_live_endpoint() {
        let transport = HexonetTransport::live().unwrap();
        assert_eq!(transport.endpoint(), DEFAULT_ENDPOINT);
        assert!(!format!("{transport:?}").contains("traffic"));
    }
}
