//! Contract Test: Resource Lifecycle State Machine
//!
//! This test verifies that the reconciler commits Local State only after a
//! handler operation succeeds.
//!
//! Constraints verified:
//! - Create failure leaves the instance absent
//! - Update failure leaves the prior Local State and identifier intact
//! - Delete success removes the instance; delete failure retains it
//! - Import followed by read stores a complete Local State
//! - Cancellation surfaces as an operation failure
//!
//! If this test fails, the absent/present state machine is broken.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use secconf_core::traits::StateStore;
use secconf_core::{HandlerRegistry, MemoryStateStore, OpContext, Reconciler, ResourceData};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::Ordering;

const ADDRESS: &str = "mock_resource.example";

fn setup() -> (Arc<MockResource>, Arc<MemoryStateStore>, Reconciler) {
    let resource = Arc::new(MockResource::new());
    let registry = Arc::new(HandlerRegistry::new());
    registry.register_resource(resource.clone());
    let store = Arc::new(MemoryStateStore::new());
    let reconciler = Reconciler::new(registry, store.clone());
    (resource, store, reconciler)
}

#[tokio::test]
async fn create_commits_refreshed_state() {
    let (resource, store, reconciler) = setup();

    let data = reconciler
        .apply(&OpContext::new(), ADDRESS, MOCK_TYPE, mock_config("alpha", 3))
        .await
        .expect("create succeeds");

    assert_eq!(data.id(), Some("alpha"));
    assert_eq!(data.get("output_text"), Some(&json!("alpha=3")));
    assert_eq!(resource.create_calls(), 1);
    assert_eq!(resource.read_calls(), 1, "create must read back");

    let stored = store.get(ADDRESS).await.unwrap().expect("state committed");
    assert_eq!(stored.type_name, MOCK_TYPE);
    assert_eq!(stored.data, data);
}

#[tokio::test]
async fn create_failure_stays_absent() {
    let (resource, store, reconciler) = setup();
    resource.fail_create.store(true, Ordering::SeqCst);

    let err = reconciler
        .apply(&OpContext::new(), ADDRESS, MOCK_TYPE, mock_config("alpha", 3))
        .await
        .unwrap_err();

    assert_eq!(err.operation(), Some("CreateMock"));
    assert!(store.get(ADDRESS).await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_config_is_rejected_before_any_remote_call() {
    let (resource, store, reconciler) = setup();

    let config = ResourceData::from_attributes([("size", json!(3))]);
    let err = reconciler
        .apply(&OpContext::new(), ADDRESS, MOCK_TYPE, config)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("name"));
    assert_eq!(resource.create_calls(), 0);
    assert!(store.get(ADDRESS).await.unwrap().is_none());
}

#[tokio::test]
async fn update_replaces_state() {
    let (resource, store, reconciler) = setup();
    let ctx = OpContext::new();

    reconciler.apply(&ctx, ADDRESS, MOCK_TYPE, mock_config("alpha", 3)).await.unwrap();
    let data = reconciler.apply(&ctx, ADDRESS, MOCK_TYPE, mock_config("alpha", 9)).await.unwrap();

    assert_eq!(resource.update_calls(), 1);
    assert_eq!(resource.remote_size("alpha"), Some(9));
    assert_eq!(data.get("size"), Some(&json!(9)));
    assert_eq!(store.get(ADDRESS).await.unwrap().unwrap().data, data);
}

#[tokio::test]
async fn update_failure_keeps_prior_state_and_identifier() {
    let (resource, store, reconciler) = setup();
    let ctx = OpContext::new();

    let created = reconciler.apply(&ctx, ADDRESS, MOCK_TYPE, mock_config("alpha", 3)).await.unwrap();
    resource.fail_update.store(true, Ordering::SeqCst);

    let err = reconciler
        .apply(&ctx, ADDRESS, MOCK_TYPE, mock_config("alpha", 9))
        .await
        .unwrap_err();
    assert_eq!(err.operation(), Some("UpdateMock"));

    let stored = store.get(ADDRESS).await.unwrap().unwrap();
    assert_eq!(stored.data, created, "prior Local State must be untouched");
    assert_eq!(stored.data.id(), Some("alpha"));
}

#[tokio::test]
async fn destroy_removes_state() {
    let (resource, store, reconciler) = setup();
    let ctx = OpContext::new();

    reconciler.apply(&ctx, ADDRESS, MOCK_TYPE, mock_config("alpha", 3)).await.unwrap();
    reconciler.destroy(&ctx, ADDRESS).await.expect("destroy succeeds");

    assert!(store.get(ADDRESS).await.unwrap().is_none());
    assert_eq!(resource.remote_size("alpha"), None);

    // A second destroy is a local no-op
    reconciler.destroy(&ctx, ADDRESS).await.expect("second destroy succeeds");
    assert_eq!(resource.delete_calls(), 1);
}

#[tokio::test]
async fn destroy_failure_retains_identifier() {
    let (resource, store, reconciler) = setup();
    let ctx = OpContext::new();

    reconciler.apply(&ctx, ADDRESS, MOCK_TYPE, mock_config("alpha", 3)).await.unwrap();
    resource.fail_delete.store(true, Ordering::SeqCst);

    let err = reconciler.destroy(&ctx, ADDRESS).await.unwrap_err();
    assert_eq!(err.operation(), Some("RemoveMock"));

    let stored = store.get(ADDRESS).await.unwrap().expect("still present");
    assert_eq!(stored.data.id(), Some("alpha"));
}

#[tokio::test]
async fn import_then_read_stores_complete_state() {
    let (resource, store, reconciler) = setup();
    let ctx = OpContext::new();

    // Create the remote object under a different address, then forget it locally
    reconciler.apply(&ctx, "mock_resource.other", MOCK_TYPE, mock_config("beta", 5)).await.unwrap();
    store.delete("mock_resource.other").await.unwrap();

    let data = reconciler.import(&ctx, ADDRESS, MOCK_TYPE, "beta").await.unwrap();
    assert_eq!(data.id(), Some("beta"));
    assert_eq!(data.get("name"), Some(&json!("beta")));
    assert_eq!(data.get("size"), Some(&json!(5)));
    assert!(resource.read_calls() >= 2);

    // Importing over a managed address is refused
    assert!(reconciler.import(&ctx, ADDRESS, MOCK_TYPE, "beta").await.is_err());
}

#[tokio::test]
async fn import_of_missing_object_stays_absent() {
    let (_resource, store, reconciler) = setup();

    let err = reconciler
        .import(&OpContext::new(), ADDRESS, MOCK_TYPE, "ghost")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(store.get(ADDRESS).await.unwrap().is_none());
}

#[tokio::test]
async fn cancellation_surfaces_as_failure() {
    let (resource, store, reconciler) = setup();
    let ctx = OpContext::new();

    let created = reconciler.apply(&ctx, ADDRESS, MOCK_TYPE, mock_config("alpha", 3)).await.unwrap();
    resource.slow_update.store(true, Ordering::SeqCst);

    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let err = reconciler
        .apply(&ctx, ADDRESS, MOCK_TYPE, mock_config("alpha", 9))
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(store.get(ADDRESS).await.unwrap().unwrap().data, created);
}

#[tokio::test]
async fn refresh_of_unmanaged_address_fails() {
    let (_resource, _store, reconciler) = setup();
    assert!(reconciler.refresh(&OpContext::new(), ADDRESS).await.is_err());
}
