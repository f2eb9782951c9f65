//! Contract Test: Session & Serialization
//!
//! This test verifies the session lifecycle and the single-lock model.
//!
//! Constraints verified:
//! - Login happens lazily, once, and the session is reused
//! - A rejected login caches nothing and is retried by the next call
//! - `close()` logs out and forces a fresh login afterwards
//! - Operations never overlap, even across zones
//! - Remote failures surface verbatim with no retry
//!
//! If this test fails, session handling is broken.

mod common;

use common::*;
use std::sync::Arc;
use std::time::Duration;
use zonesync_core::command::Response;
use zonesync_core::traits::Credentials;
use zonesync_core::transport::MemoryTransport;
use zonesync_core::{Error, Record, ZoneProvider, ZoneReconciler};

#[tokio::test]
async fn login_is_lazy_and_reused() {
    let transport = memory_with_zone("acme.com", &["acme.com. 300 IN A 1.2.3.4"]).await;
    let reconciler = reconciler_for(&transport);

    assert_eq!(transport.login_count(), 0, "no login before first use");
    assert!(!reconciler.has_session().await);

    reconciler.get_records("acme.com").await.unwrap();
    reconciler
        .append_records("acme.com", &[a("acme.com.", "5.6.7.8", 300)])
        .await
        .unwrap();
    reconciler.get_records("acme.com").await.unwrap();

    assert_eq!(transport.login_count(), 1);
    assert!(reconciler.has_session().await);
}

#[tokio::test]
async fn rejected_login_is_not_cached() {
    let transport = memory_with_zone("acme.com", &[]).await;
    let reconciler = ZoneReconciler::new(
        Box::new(transport.clone()),
        Credentials::new("test-user", "wrong"),
    );

    let err = reconciler.get_records("acme.com").await.unwrap_err();
    assert!(matches!(err, Error::Authentication { code: 530, .. }));
    assert!(!reconciler.has_session().await);

    let err = reconciler.get_records("acme.com").await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
    assert_eq!(transport.login_count(), 2, "each call retries the login");
    assert!(transport.commands().await.is_empty(), "no command without a session");
}

#[tokio::test]
async fn login_recovers_after_transient_rejection() {
    let transport = memory_with_zone("acme.com", &["acme.com. 300 IN A 1.2.3.4"]).await;
    transport
        .fail_next("StartSession", Response::new(530, "Authentication failed"))
        .await;
    let reconciler = reconciler_for(&transport);

    assert!(reconciler.get_records("acme.com").await.is_err());
    let records = reconciler.get_records("acme.com").await.unwrap();
    assert_eq!(records, vec![a("acme.com.", "1.2.3.4", 300)]);
}

#[tokio::test]
async fn close_logs_out_and_next_call_logs_in_again() {
    let transport = memory_with_zone("acme.com", &[]).await;
    let reconciler = reconciler_for(&transport);

    // closing without a session is a no-op
    reconciler.close().await.unwrap();
    assert_eq!(transport.logout_count(), 0);

    reconciler.get_records("acme.com").await.unwrap();
    reconciler.close().await.unwrap();
    assert_eq!(transport.logout_count(), 1);
    assert!(!reconciler.has_session().await);

    reconciler.get_records("acme.com").await.unwrap();
    assert_eq!(transport.login_count(), 2);
}

#[tokio::test]
async fn operations_are_serialized_across_zones() {
    let memory = MemoryTransport::new();
    memory.seed_zone("one.com", ["one.com. 300 IN A 1.1.1.1"]).await;
    memory.seed_zone("two.com", ["two.com. 300 IN A 2.2.2.2"]).await;

    let slow = SlowTransport::new(memory, Duration::from_millis(10));
    let reconciler = Arc::new(ZoneReconciler::new(
        Box::new(slow.clone()),
        test_credentials(),
    ));

    let mut handles = Vec::new();
    for i in 0..6 {
        let reconciler = Arc::clone(&reconciler);
        let (zone, name) = if i % 2 == 0 {
            ("one.com", "one.com.")
        } else {
            ("two.com", "two.com.")
        };
        handles.push(tokio::spawn(async move {
            reconciler
                .set_records(zone, &[Record::new(name, "A", format!("10.0.0.{i}"), 60)])
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(slow.max_in_flight(), 1, "remote calls must never overlap");
}

#[tokio::test]
async fn list_failure_surfaces_code_without_retry() {
    let transport = memory_with_zone("acme.com", &[]).await;
    transport
        .fail_next("QueryDNSZoneRRList", Response::new(505, "Object does not exist"))
        .await;
    let reconciler = reconciler_for(&transport);

    let err = reconciler.get_records("acme.com").await.unwrap_err();
    match err {
        Error::RemoteQueryFailed { code, description } => {
            assert_eq!(code, 505);
            assert_eq!(description, "Object does not exist");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(list_count(&transport).await, 1, "no retry");
}

#[tokio::test]
async fn malformed_line_is_surfaced_not_skipped() {
    let transport = memory_with_zone(
        "acme.com",
        &["acme.com. 300 IN A 1.2.3.4", "acme.com 300 IN A 5.6.7.8"],
    )
    .await;
    let reconciler = reconciler_for(&transport);

    let err = reconciler.get_records("acme.com").await.unwrap_err();
    match err {
        Error::MalformedRecordLine(line) => assert_eq!(line, "acme.com 300 IN A 5.6.7.8"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn append_and_delete_return_input_records() {
    let transport = memory_with_zone("acme.com", &["acme.com. 300 IN A 1.2.3.4"]).await;
    let reconciler = reconciler_for(&transport);

    let added = vec![a("www.acme.com.", "5.6.7.8", 120)];
    assert_eq!(
        reconciler.append_records("acme.com", &added).await.unwrap(),
        added
    );

    let removed = vec![a("acme.com.", "1.2.3.4", 300)];
    assert_eq!(
        reconciler.delete_records("acme.com", &removed).await.unwrap(),
        removed
    );

    assert_eq!(
        transport.zone_lines("acme.com").await.unwrap(),
        vec!["www.acme.com. 120 IN A 5.6.7.8".to_string()]
    );
}

#[tokio::test]
async fn mutation_failure_on_unknown_zone() {
    let transport = MemoryTransport::new();
    let reconciler = reconciler_for(&transport);

    let err = reconciler
        .append_records("missing.com", &[a("missing.com.", "1.2.3.4", 300)])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RemoteMutationFailed { code: 545, .. }));
}
