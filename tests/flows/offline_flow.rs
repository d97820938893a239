//! Online, then offline: what a user sees once the upstream goes away.

#[path = "../common/mod.rs"]
mod common;

use common::{serve, TestStack, TestStackBuilder, APP_ORIGIN};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

// ============================================================================
// Static assets (cache-first)
// ============================================================================

#[tokio::test]
async fn test_visited_app_shell_survives_upstream_loss() {
    let stack = TestStack::start_active().await;

    let online = stack.online.dispatch("/").await;
    assert_eq!(online.status, 200);
    assert_eq!(online.body_text(), "asset /");

    let offline = stack.offline();
    let response = offline.dispatch("/").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body_text(), "asset /");
    assert_eq!(offline.metrics.snapshot().cache_hits, 1);
}

#[tokio::test]
async fn test_unvisited_asset_offline_is_network_error_placeholder() {
    let stack = TestStack::start_active().await;

    let response = stack.offline().dispatch("/logo.png").await;

    assert_eq!(response.status, 408);
    assert_eq!(response.body_text(), "Network error occurred");
}

#[tokio::test]
async fn test_seeded_manifest_answers_offline_with_static_lookup() {
    let stack = TestStackBuilder::new().with_static_lookup().build().await;
    stack.install_and_activate().await;

    let response = stack.offline().dispatch("/manifest.json").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body_text(), "asset /manifest.json");
}

// ============================================================================
// Pages (network-first)
// ============================================================================

#[tokio::test]
async fn test_page_falls_back_to_last_good_copy() {
    let stack = TestStack::start_active().await;
    serve(&stack.upstream, "/blog", "blog v1").await;
    assert_eq!(stack.online.dispatch("/blog").await.body_text(), "blog v1");

    // Upstream still answers, but with an error status.
    stack.upstream.reset().await;
    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&stack.upstream)
        .await;
    let degraded = stack.online.dispatch("/blog").await;
    assert_eq!(degraded.status, 200);
    assert_eq!(degraded.body_text(), "blog v1");

    let offline = stack.offline().dispatch("/blog").await;
    assert_eq!(offline.status, 200);
    assert_eq!(offline.body_text(), "blog v1");
}

#[tokio::test]
async fn test_unknown_page_offline_is_double_failure_placeholder() {
    let stack = TestStack::start_active().await;

    let response = stack.offline().dispatch("/never-seen").await;

    assert_eq!(response.status, 500);
    assert_eq!(response.body_text(), "Both network and cache failed");
}

#[tokio::test]
async fn test_query_string_is_part_of_page_identity() {
    let stack = TestStack::start_active().await;
    serve(&stack.upstream, "/search", "results").await;

    stack.online.dispatch("/search?q=rust").await;

    let offline = stack.offline();
    assert_eq!(offline.dispatch("/search?q=rust").await.status, 200);
    assert_eq!(offline.dispatch("/search?q=go").await.status, 500);
}

#[tokio::test]
async fn test_dynamic_store_keeps_most_recent_pages() {
    let stack = TestStackBuilder::new().with_max_entries(3).build().await;
    stack.install_and_activate().await;
    for page in ["/a", "/b", "/c", "/d", "/e"] {
        serve(&stack.upstream, page, page).await;
        stack.online.dispatch(page).await;
    }

    let keys = stack.keys_of(&stack.cache.stores.dynamic_name).await;

    assert_eq!(
        keys,
        vec![
            format!("{APP_ORIGIN}/c"),
            format!("{APP_ORIGIN}/d"),
            format!("{APP_ORIGIN}/e"),
        ]
    );
    assert_eq!(stack.online.metrics.snapshot().evictions, 2);
    assert_eq!(stack.offline().dispatch("/a").await.status, 500);
}

// ============================================================================
// API calls (stale-while-revalidate)
// ============================================================================

#[tokio::test]
async fn test_api_serves_stale_then_refreshed_data() {
    let stack = TestStack::start_active().await;
    serve(&stack.upstream, "/api/rates", "rates v1").await;

    assert_eq!(stack.online.dispatch("/api/rates").await.body_text(), "rates v1");

    stack.upstream.reset().await;
    serve(&stack.upstream, "/api/rates", "rates v2").await;

    let stale = stack.online.dispatch("/api/rates").await;
    assert_eq!(stale.body_text(), "rates v1");

    stack.online.engine.wait_for_background().await;

    let fresh = stack.online.dispatch("/api/rates").await;
    assert_eq!(fresh.body_text(), "rates v2");
}

#[tokio::test]
async fn test_api_offline_serves_cached_copy() {
    let stack = TestStack::start_active().await;
    serve(&stack.upstream, "/api/profile", "profile").await;
    stack.online.dispatch("/api/profile").await;

    let offline = stack.offline();
    let response = offline.dispatch("/api/profile").await;
    offline.engine.wait_for_background().await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body_text(), "profile");
    assert_eq!(
        stack.keys_of(&stack.cache.stores.api_name).await,
        vec![format!("{APP_ORIGIN}/api/profile")]
    );
}

#[tokio::test]
async fn test_api_offline_without_copy_is_api_failure_placeholder() {
    let stack = TestStack::start_active().await;

    let response = stack.offline().dispatch("/api/unknown").await;

    assert_eq!(response.status, 400);
    assert_eq!(response.body_text(), "API request failed");
}
