//! Integration tests for connection lifecycle.
//!
//! These tests verify the open-or-reuse invariant (one singleton handle per
//! logical connection, opened lazily and never closed between operations),
//! pooled acquisition, the driver connection string format, and teardown.

mod common;

use common::Harness;
use db2_adapter::{AttributeSpec, Collection, ConnectionConfig, QueryOptions};
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;

fn users() -> Collection {
    let mut attrs = BTreeMap::new();
    attrs.insert("id".to_string(), AttributeSpec::identity());
    Collection::new("users", attrs)
}

fn config(identity: &str) -> ConnectionConfig {
    ConnectionConfig::new(identity, "db2.internal", "SAMPLE", "dbuser", "secret").with_port(50001)
}

/// Test that the singleton handle is opened once and reused across
/// operations on the same logical connection.
#[tokio::test]
async fn test_singleton_handle_is_reused() {
    let harness = Harness::new();
    harness
        .adapter
        .register_connection(config("main"), vec![users()])
        .await
        .unwrap();

    for _ in 0..3 {
        harness
            .adapter
            .find("main", "users", &QueryOptions::new())
            .await
            .unwrap();
    }

    assert_eq!(harness.driver.state.opens.load(Ordering::SeqCst), 1);
    assert_eq!(harness.driver.state.closes.load(Ordering::SeqCst), 0);
}

/// Test that a pooled connection creates the pool once and acquires a
/// handle per operation.
#[tokio::test]
async fn test_pooled_handle_acquired_per_operation() {
    let harness = Harness::new();
    harness
        .adapter
        .register_connection(config("pooled").with_pool(true), vec![users()])
        .await
        .unwrap();

    for _ in 0..3 {
        harness
            .adapter
            .find("pooled", "users", &QueryOptions::new())
            .await
            .unwrap();
    }

    assert_eq!(harness.driver.state.pool_opens.load(Ordering::SeqCst), 1);
    assert_eq!(harness.driver.state.acquires.load(Ordering::SeqCst), 3);
    assert_eq!(harness.driver.state.opens.load(Ordering::SeqCst), 0);
}

/// Test that the driver receives the connection string in the exact
/// KEY=VALUE format.
#[tokio::test]
async fn test_connection_string_reaches_driver_verbatim() {
    let harness = Harness::new();
    harness
        .adapter
        .register_connection(config("main"), vec![users()])
        .await
        .unwrap();
    harness
        .adapter
        .find("main", "users", &QueryOptions::new())
        .await
        .unwrap();

    let strings = harness.driver.connection_strings();
    assert_eq!(
        strings,
        vec![
            "DRIVER={DB2};DATABASE=SAMPLE;HOSTNAME=db2.internal;UID=dbuser;PWD=secret;PORT=50001;PROTOCOL=TCPIP"
                .to_string()
        ]
    );
}

/// Test that teardown closes the cached handle and removes the entry, and
/// that later operations on the identity are rejected.
#[tokio::test]
async fn test_teardown_closes_handle() {
    let harness = Harness::new();
    harness
        .adapter
        .register_connection(config("main"), vec![users()])
        .await
        .unwrap();
    harness
        .adapter
        .find("main", "users", &QueryOptions::new())
        .await
        .unwrap();

    harness.adapter.teardown(Some("main")).await.unwrap();
    assert_eq!(harness.driver.state.closes.load(Ordering::SeqCst), 1);

    let result = harness
        .adapter
        .find("main", "users", &QueryOptions::new())
        .await;
    assert!(result.is_err());
}

/// Test that teardown with no identity closes every registered connection.
#[tokio::test]
async fn test_teardown_all_connections() {
    let harness = Harness::new();
    for identity in ["a", "b"] {
        harness
            .adapter
            .register_connection(config(identity), vec![users()])
            .await
            .unwrap();
        harness
            .adapter
            .find(identity, "users", &QueryOptions::new())
            .await
            .unwrap();
    }

    harness.adapter.teardown(None).await.unwrap();
    assert_eq!(harness.driver.state.closes.load(Ordering::SeqCst), 2);
    assert!(harness.adapter.registry().identities().await.is_empty());
}

/// Test that registration never opens a handle; the first operation does.
#[tokio::test]
async fn test_handle_opened_lazily() {
    let harness = Harness::new();
    harness
        .adapter
        .register_connection(config("main"), vec![users()])
        .await
        .unwrap();

    assert_eq!(harness.driver.state.opens.load(Ordering::SeqCst), 0);

    harness
        .adapter
        .find("main", "users", &QueryOptions::new())
        .await
        .unwrap();
    assert_eq!(harness.driver.state.opens.load(Ordering::SeqCst), 1);
}

/// Test that two adapters own independent registries.
#[tokio::test]
async fn test_independent_registries() {
    let first = Harness::new();
    let second = Harness::new();

    first
        .adapter
        .register_connection(config("main"), vec![users()])
        .await
        .unwrap();

    // The same identity is free in the second adapter's registry
    second
        .adapter
        .register_connection(config("main"), vec![users()])
        .await
        .unwrap();

    assert!(first.adapter.registry().is_registered("main").await);
    assert!(second.adapter.registry().is_registered("main").await);
}

/// Test accessor aliases resolved at registration are reachable through
/// the adapter's registry in both casings.
#[tokio::test]
async fn test_primary_key_accessor_aliases() {
    let harness = Harness::new();
    harness
        .adapter
        .register_connection(config("main"), vec![users()])
        .await
        .unwrap();

    let registry = harness.adapter.registry();
    for accessor in ["find_by_id", "find_by_ID"] {
        let target = registry
            .resolve_accessor("main", accessor)
            .await
            .unwrap()
            .expect("accessor should resolve");
        assert_eq!(target.collection, "users");
        assert_eq!(target.column, "id");
    }
}
