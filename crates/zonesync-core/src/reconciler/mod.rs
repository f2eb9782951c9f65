//! Zone reconciler
//!
//! The ZoneReconciler is responsible for:
//! - Establishing the provider session lazily and keeping it
//! - Listing, adding and removing line records through the [`Transport`]
//! - Turning a desired record set into a remove batch and an add batch
//!
//! ## Architecture
//!
//! ```text
//!  caller
//!    │ set_records(zone, desired)
//!    ▼
//! ┌────────────────┐  list   ┌───────────┐  QueryDNSZoneRRList  ┌───────────┐
//! │ ZoneReconciler │────────▶│ LineCodec │◀────────────────────│           │
//! │                │         └───────────┘                     │ Transport │
//! │  plan_changes  │  encode ┌───────────┐  UpdateDNSZone      │           │
//! │                │────────▶│ LineCodec │────────────────────▶│           │
//! └────────────────┘         └───────────┘  (delrr, then addrr) └───────────┘
//! ```
//!
//! ## Session & Locking
//!
//! One session per reconciler, opened on first use. A single async mutex
//! guards it and is held for the whole of every operation, so operations
//! on different zones are serialized as well. A rejected login caches
//! nothing; the next operation logs in again.
//!
//! ## Failure Semantics
//!
//! `set_records` removes before it adds. If removal fails, nothing is added
//! and the error is returned as-is; removals already committed by the
//! provider are not rolled back. Nothing is retried. Every record is
//! encoded before the first mutation is sent, so a record that cannot be
//! encoded fails the operation with the zone untouched.

pub mod plan;

pub use plan::{ChangeSet, IdentityPolicy, plan_changes};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::codec::LineCodec;
use crate::command::{Command, ListRequest, MutateRequest};
use crate::config::ZoneSyncConfig;
use crate::error::{Error, Result};
use crate::record::Record;
use crate::registry::TransportRegistry;
use crate::traits::{Credentials, Session, Transport, ZoneProvider};

/// Which batch of an `UpdateDNSZone` a set of lines goes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Add,
    Remove,
}

/// Record reconciler bound to one transport and one account
pub struct ZoneReconciler {
    /// Transport to the provider
    transport: Box<dyn Transport>,

    /// Account credentials, used on first operation
    credentials: Credentials,

    /// Line record codec
    codec: LineCodec,

    /// Identity used when diffing current and desired records
    identity: IdentityPolicy,

    /// Cached session; the lock also serializes all operations
    session: Mutex<Option<Session>>,
}

impl std::fmt::Debug for ZoneReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneReconciler")
            .field("transport", &self.transport.transport_name())
            .field("credentials", &self.credentials)
            .field("codec", &self.codec)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl ZoneReconciler {
    /// Create a reconciler with the default codec and identity policy
    pub fn new(transport: Box<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            codec: LineCodec::new(),
            identity: IdentityPolicy::default(),
            session: Mutex::new(None),
        }
    }

    /// Build a reconciler from configuration, creating the transport
    /// through the registry
    pub fn from_config(registry: &TransportRegistry, config: &ZoneSyncConfig) -> Result<Self> {
        config.validate()?;

        let transport = registry.create_transport(&config.provider)?;
        let codec = LineCodec::new().with_ttl_parsing(config.reconcile.ttl_parsing);

        Ok(Self::new(transport, config.provider.credentials())
            .with_codec(codec)
            .with_identity(config.reconcile.identity))
    }

    /// Replace the codec
    pub fn with_codec(mut self, codec: LineCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Replace the identity policy
    pub fn with_identity(mut self, identity: IdentityPolicy) -> Self {
        self.identity = identity;
        self
    }

    /// The codec in use
    pub fn codec(&self) -> &LineCodec {
        &self.codec
    }

    /// Whether a session is currently cached
    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Log out and drop the cached session
    ///
    /// Safe to call without a session. The session is dropped even if the
    /// logout call fails.
    pub async fn close(&self) -> Result<()> {
        let mut guard = self.session.lock().await;
        match guard.take() {
            Some(session) => {
                info!("Closing {} session", self.transport.transport_name());
                self.transport.logout(&session).await
            }
            None => Ok(()),
        }
    }

    /// Return the cached session, logging in if there is none
    async fn ensure_session<'a>(&self, slot: &'a mut Option<Session>) -> Result<&'a Session> {
        let session = match slot.take() {
            Some(session) => session,
            None => {
                debug!(
                    "Opening {} session for {}",
                    self.transport.transport_name(),
                    self.credentials.username
                );
                let response = self.transport.login(&self.credentials).await?;
                let session = Session::from_response(&response).inspect_err(|e| {
                    warn!("Login rejected: {}", e);
                })?;
                info!("{} session established", self.transport.transport_name());
                session
            }
        };
        Ok(slot.insert(session))
    }

    async fn list(&self, session: &Session, zone: &str) -> Result<Vec<Record>> {
        let command = Command::List(ListRequest {
            zone: zone.to_string(),
        });
        let response = self.transport.request(session, &command).await?;
        if !response.is_success() {
            return Err(Error::query_failed(response.code, response.description));
        }

        debug!("Zone {} has {} line record(s)", zone, response.records.len());
        response
            .records
            .iter()
            .map(|line| self.codec.parse_line(line))
            .collect()
    }

    /// Encode records as line records, failing before anything is sent
    fn encode(&self, records: &[Record]) -> Result<Vec<String>> {
        records.iter().map(|r| self.codec.format_line(r)).collect()
    }

    async fn mutate(
        &self,
        session: &Session,
        zone: &str,
        mutation: Mutation,
        lines: Vec<String>,
    ) -> Result<()> {
        debug!("{:?} {} line record(s) in zone {}", mutation, lines.len(), zone);
        let request = match mutation {
            Mutation::Add => MutateRequest::add(zone, lines),
            Mutation::Remove => MutateRequest::remove(zone, lines),
        };

        let response = self
            .transport
            .request(session, &Command::Mutate(request))
            .await?;
        if !response.is_success() {
            return Err(Error::mutation_failed(response.code, response.description));
        }
        Ok(())
    }
}

#[async_trait]
impl ZoneProvider for ZoneReconciler {
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>> {
        let mut guard = self.session.lock().await;
        let session = self.ensure_session(&mut guard).await?;

        self.list(session, zone).await
    }

    async fn append_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let mut guard = self.session.lock().await;
        let lines = self.encode(records)?;
        let session = self.ensure_session(&mut guard).await?;

        self.mutate(session, zone, Mutation::Add, lines).await?;
        info!("Appended {} record(s) to zone {}", records.len(), zone);
        Ok(records.to_vec())
    }

    async fn set_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let mut guard = self.session.lock().await;
        let session = self.ensure_session(&mut guard).await?;

        // Step 1: current state
        let current = self.list(session, zone).await?;

        // Step 2: diff
        let changes = plan_changes(&current, records, self.identity);
        info!(
            "Reconciling zone {}: {} removal(s), {} addition(s)",
            zone,
            changes.removals.len(),
            changes.additions.len()
        );

        // Step 3: encode both batches, then remove and add; a failed
        // removal stops here
        let removals = self.encode(&changes.removals)?;
        let additions = self.encode(&changes.additions)?;
        self.mutate(session, zone, Mutation::Remove, removals).await?;
        self.mutate(session, zone, Mutation::Add, additions).await?;

        Ok(records.to_vec())
    }

    async fn delete_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let mut guard = self.session.lock().await;
        let lines = self.encode(records)?;
        let session = self.ensure_session(&mut guard).await?;

        self.mutate(session, zone, Mutation::Remove, lines).await?;
        info!("Deleted {} record(s) from zone {}", records.len(), zone);
        Ok(records.to_vec())
    }

    fn provider_name(&self) -> &'static str {
        self.transport.transport_name()
    }
}
