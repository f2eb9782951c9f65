//! Test doubles and common utilities for contract tests
//!
//! This module provides minimal test doubles that verify the reconciler's
//! contracts without a real provider.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use zonesync_core::command::{Command, MutateRequest, Response};
use zonesync_core::error::Result;
use zonesync_core::traits::{Credentials, Session, Transport};
use zonesync_core::transport::MemoryTransport;
use zonesync_core::{Record, ZoneReconciler};

/// A transport that wraps [`MemoryTransport`], slows every call down and
/// records how many calls were in flight at once
#[derive(Clone)]
pub struct SlowTransport {
    inner: MemoryTransport,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl SlowTransport {
    pub fn new(inner: MemoryTransport, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Highest number of concurrent calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl Transport for SlowTransport {
    async fn login(&self, credentials: &Credentials) -> Result<Response> {
        self.enter().await;
        let response = self.inner.login(credentials).await;
        self.leave();
        response
    }

    async fn request(&self, session: &Session, command: &Command) -> Result<Response> {
        self.enter().await;
        let response = self.inner.request(session, command).await;
        self.leave();
        response
    }

    async fn logout(&self, session: &Session) -> Result<()> {
        self.inner.logout(session).await
    }

    fn transport_name(&self) -> &'static str {
        "slow"
    }
}

/// Credentials accepted by [`memory_with_zone`]
pub fn test_credentials() -> Credentials {
    Credentials::new("test-user", "test-password")
}

/// A memory transport with one seeded zone that only accepts [`test_credentials`]
pub async fn memory_with_zone(zone: &str, lines: &[&str]) -> MemoryTransport {
    let transport = MemoryTransport::new().with_credentials(test_credentials());
    transport.seed_zone(zone, lines.iter().copied()).await;
    transport
}

/// A reconciler over a clone of `transport`
pub fn reconciler_for(transport: &MemoryTransport) -> ZoneReconciler {
    ZoneReconciler::new(Box::new(transport.clone()), test_credentials())
}

/// All mutate requests the transport received, in order
pub async fn mutations(transport: &MemoryTransport) -> Vec<MutateRequest> {
    transport
        .commands()
        .await
        .into_iter()
        .filter_map(|command| match command {
            Command::Mutate(req) => Some(req),
            Command::List(_) => None,
        })
        .collect()
}

/// Number of list requests the transport received
pub async fn list_count(transport: &MemoryTransport) -> usize {
    transport
        .commands()
        .await
        .iter()
        .filter(|command| matches!(command, Command::List(_)))
        .count()
}

pub fn a(name: &str, value: &str, ttl: u32) -> Record {
    Record::new(name, "A", value, ttl)
}
