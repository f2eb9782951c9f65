// # Memory Transport
//
// In-process implementation of Transport.
//
// ## Purpose
//
// Speaks the same command set as the real provider against a zone map held
// in memory. Useful for testing, dry runs, and for exercising the reconciler
// without network access.
//
// ## Semantics
//
// - `QueryDNSZoneRRList` on an unknown zone fails with 545
// - `UpdateDNSZone` applies all `delrr` entries, then all `addrr` entries,
//   within one write lock; nothing is applied if the zone is unknown
// - Lines are compared with whitespace runs collapsed
// - Adding a line that is already present is a no-op
// - Optional expected credentials; a mismatch answers 530
//
// ## Crash Behavior
//
// All state is lost when the transport is dropped.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::command::{Command, Response};
use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traffic::{DiscardSink, Direction, TrafficSink};
use crate::traits::{Credentials, Session, Transport, TransportFactory};

/// In-memory transport implementation
///
/// Clones share the same zones, command log and scripted failures.
///
/// # Example
///
/// ```rust,no_run
/// use zonesync_core::transport::MemoryTransport;
/// use zonesync_core::{ZoneProvider, ZoneReconciler};
/// use zonesync_core::traits::Credentials;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let transport = MemoryTransport::new();
///     transport.seed_zone("example.com", ["example.com. 300 IN A 192.0.2.1"]).await;
///
///     let reconciler = ZoneReconciler::new(Box::new(transport), Credentials::new("u", "p"));
///     let records = reconciler.get_records("example.com").await?;
///     assert_eq!(records.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct MemoryTransport {
    zones: Arc<RwLock<HashMap<String, Vec<String>>>>,
    expected: Option<Credentials>,
    commands: Arc<Mutex<Vec<Command>>>,
    failures: Arc<Mutex<VecDeque<(&'static str, Response)>>>,
    logins: Arc<AtomicUsize>,
    logouts: Arc<AtomicUsize>,
    traffic: Arc<dyn TrafficSink>,
}

impl std::fmt::Debug for MemoryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("expected", &self.expected)
            .field("logins", &self.logins.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    /// Create a transport with no zones that accepts any credentials
    pub fn new() -> Self {
        Self {
            zones: Arc::new(RwLock::new(HashMap::new())),
            expected: None,
            commands: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(VecDeque::new())),
            logins: Arc::new(AtomicUsize::new(0)),
            logouts: Arc::new(AtomicUsize::new(0)),
            traffic: Arc::new(DiscardSink),
        }
    }

    /// Only accept these credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.expected = Some(credentials);
        self
    }

    /// Report traffic to a sink
    pub fn with_traffic_sink(mut self, traffic: Arc<dyn TrafficSink>) -> Self {
        self.traffic = traffic;
        self
    }

    /// Create (or replace) a zone with the given line records
    pub async fn seed_zone<I, S>(&self, zone: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(Into::into).collect();
        self.zones.write().await.insert(zone.to_string(), lines);
    }

    /// Current line records of a zone, if it exists
    pub async fn zone_lines(&self, zone: &str) -> Option<Vec<String>> {
        self.zones.read().await.get(zone).cloned()
    }

    /// Answer the next command named `command` with `response` instead of
    /// executing it
    ///
    /// `command` is a provider command name such as `"UpdateDNSZone"`, or
    /// `"StartSession"` for logins.
    pub async fn fail_next(&self, command: &'static str, response: Response) {
        self.failures.lock().await.push_back((command, response));
    }

    /// Every command received so far, in order
    pub async fn commands(&self) -> Vec<Command> {
        self.commands.lock().await.clone()
    }

    /// Number of login attempts so far
    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    /// Number of logouts so far
    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }

    async fn scripted(&self, command: &str) -> Option<Response> {
        let mut failures = self.failures.lock().await;
        let pos = failures.iter().position(|(name, _)| *name == command)?;
        failures.remove(pos).map(|(_, response)| response)
    }

    async fn execute(&self, command: &Command) -> Response {
        match command {
            Command::List(req) => match self.zones.read().await.get(&req.zone) {
                Some(lines) => Response::ok().with_records(lines.clone()),
                None => zone_not_found(&req.zone),
            },
            Command::Mutate(req) => {
                let mut zones = self.zones.write().await;
                let Some(lines) = zones.get_mut(&req.zone) else {
                    return zone_not_found(&req.zone);
                };

                for del in &req.remove {
                    let del = normalize(del);
                    lines.retain(|line| normalize(line) != del);
                }
                for add in &req.add {
                    let key = normalize(add);
                    if !lines.iter().any(|line| normalize(line) == key) {
                        lines.push(add.clone());
                    }
                }
                Response::ok()
            }
        }
    }
}

fn zone_not_found(zone: &str) -> Response {
    Response::new(545, format!("Entity reference not found; zone {zone}"))
}

fn normalize(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn login(&self, credentials: &Credentials) -> Result<Response> {
        let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        self.traffic.observe(
            Direction::Outgoing,
            &format!("COMMAND = StartSession (login {})", credentials.username),
        );

        if let Some(response) = self.scripted("StartSession").await {
            return Ok(response);
        }
        if self.expected.as_ref().is_some_and(|expected| expected != credentials) {
            return Ok(Response::new(530, "Authentication failed"));
        }

        Ok(Response::ok().with_session_id(format!("memory-session-{n}")))
    }

    async fn request(&self, session: &Session, command: &Command) -> Result<Response> {
        if session.id().is_empty() {
            return Err(Error::transport("request without a session"));
        }
        for (key, value) in command.to_wire() {
            self.traffic
                .observe(Direction::Outgoing, &format!("{key} = {value}"));
        }
        self.commands.lock().await.push(command.clone());

        let response = match self.scripted(command.name()).await {
            Some(response) => response,
            None => self.execute(command).await,
        };
        self.traffic.observe(
            Direction::Incoming,
            &format!("code = {}, description = {}", response.code, response.description),
        );
        Ok(response)
    }

    async fn logout(&self, _session: &Session) -> Result<()> {
        self.traffic.observe(Direction::Outgoing, "COMMAND = EndSession");
        self.logouts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory for creating memory transports
pub struct MemoryTransportFactory;

impl TransportFactory for MemoryTransportFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn Transport>> {
        match config {
            ProviderConfig::Memory => {
                tracing::warn!("Using in-memory transport - no provider will be contacted");
                Ok(Box::new(MemoryTransport::new()))
            }
            _ => Err(Error::config("Invalid config for memory transport")),
        }
    }
}
