//! Deployment generations sharing one durable cache database.

#[path = "../common/mod.rs"]
mod common;

use common::{dead_upstream, serve, TestStack, TestStackBuilder, Wiring};
use std::sync::Arc;
use waystation_domain::request_class::PassThroughReason;
use waystation_domain::{LifecycleState, Route};

#[tokio::test]
async fn test_new_generation_purges_previous_stores() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("cache.db");

    let v1 = TestStackBuilder::new()
        .with_generation("v1")
        .with_database(&db)
        .build()
        .await;
    v1.install_and_activate().await;
    serve(&v1.upstream, "/blog", "blog").await;
    serve(&v1.upstream, "/api/feed", "feed").await;
    v1.online.dispatch("/blog").await;
    v1.online.dispatch("/api/feed").await;
    v1.online.engine.wait_for_background().await;

    let v2 = TestStackBuilder::new()
        .with_generation("v2")
        .with_database(&db)
        .build()
        .await;
    serve_manifest_and_install(&v2).await;
    let report = v2.online.lifecycle.activate().await.unwrap();

    let mut deleted = report.deleted.clone();
    deleted.sort();
    assert_eq!(deleted, vec!["api-v1", "dynamic-v1", "static-v1"]);
    assert!(report.retained.is_empty());
    assert_eq!(v2.storage.store_names().await.unwrap(), vec!["static-v2"]);
    assert_eq!(v2.online.lifecycle.state(), LifecycleState::Active);
}

async fn serve_manifest_and_install(stack: &TestStack) {
    common::serve_manifest(&stack.upstream, &stack.cache.static_manifest).await;
    let report = stack.online.lifecycle.install().await.unwrap();
    assert_eq!(report.cached, stack.cache.static_manifest);
}

#[tokio::test]
async fn test_cached_pages_survive_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("cache.db");

    let first = TestStackBuilder::new().with_database(&db).build().await;
    first.install_and_activate().await;
    serve(&first.upstream, "/docs/intro", "intro").await;
    first.online.dispatch("/docs/intro").await;
    drop(first);

    // Same generation, fresh process, no network.
    let restarted = TestStackBuilder::new().with_database(&db).build().await;
    let offline = Wiring::new(
        Arc::clone(&restarted.storage),
        dead_upstream(),
        &restarted.cache,
        LifecycleState::Active,
    );

    let response = offline.dispatch("/docs/intro").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body_text(), "intro");
}

#[tokio::test]
async fn test_requests_pass_through_until_activation() {
    let stack = TestStack::start().await;
    serve(&stack.upstream, "/blog", "blog").await;

    assert_eq!(
        stack.online.router.route(&common::get("/blog")),
        Route::PassThrough(PassThroughReason::NotActive)
    );
    let response = stack.online.dispatch("/blog").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body_text(), "blog");
    assert!(stack
        .keys_of(&stack.cache.stores.dynamic_name)
        .await
        .is_empty());
    assert_eq!(stack.online.metrics.snapshot().passthrough, 1);
}

#[tokio::test]
async fn test_install_records_unreachable_manifest_entries() {
    let stack = TestStack::start().await;
    serve(&stack.upstream, "/", "shell").await;
    serve(&stack.upstream, "/index.html", "shell").await;

    let report = stack.online.lifecycle.install().await.unwrap();

    assert_eq!(report.cached, vec!["/", "/index.html"]);
    let failed: Vec<&str> = report.failed.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(failed, vec!["/manifest.json", "/logo.png"]);
    assert_eq!(stack.online.lifecycle.state(), LifecycleState::Installed);
}
