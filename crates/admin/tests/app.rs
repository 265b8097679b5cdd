//! Router-level tests for the product listing and discount stub.
//!
//! Uses a substitute `ProductSource` so no Shopify credentials or network
//! access are required.

#![allow(clippy::unwrap_used)]

use std::net::IpAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::get,
};
use futures::future::BoxFuture;
use http_body_util::BodyExt;
use secrecy::SecretString;
use tower::ServiceExt;

use custom_discounts_admin::{
    config::{AppConfig, ShopifyConfig},
    middleware::create_session_layer,
    routes,
    shopify::{OAuthToken, ProductSource, ShopifyClient, ShopifyError, types::Product},
    state::AppState,
};

// ============================================================================
// Test Harness
// ============================================================================

/// Substitute product source: canned products or a canned failure.
struct StubProducts {
    products: Vec<Product>,
    fail: bool,
}

impl ProductSource for StubProducts {
    fn list_products(&self, limit: i64) -> BoxFuture<'_, Result<Vec<Product>, ShopifyError>> {
        Box::pin(async move {
            if self.fail {
                return Err(ShopifyError::Api {
                    status: 500,
                    body: "upstream exploded".to_string(),
                });
            }
            let limit = usize::try_from(limit).unwrap_or(usize::MAX);
            Ok(self.products.iter().take(limit).cloned().collect())
        })
    }
}

fn test_config(surface_fetch_errors: bool) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".parse::<IpAddr>().unwrap(),
        port: 0,
        shopify: ShopifyConfig {
            api_key: "test_api_key".to_string(),
            api_secret: SecretString::from("shpss_9f2c1ab8e3d74f6a"),
            scopes: vec!["read_products".to_string()],
            app_url: "http://localhost:3000".to_string(),
            custom_shop_domain: None,
            api_version: "2024-10".to_string(),
            product_limit: 50,
        },
        surface_fetch_errors,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    }
}

fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            title: "Red Summer Shirt".to_string(),
            sku: "AB-100".to_string(),
            tags: vec!["red".to_string(), "sale".to_string()],
            collections: vec!["Summer".to_string()],
        },
        Product {
            id: "2".to_string(),
            title: "Blue Winter Coat".to_string(),
            sku: "AB-200".to_string(),
            tags: vec!["blue".to_string()],
            collections: vec!["Winter".to_string()],
        },
    ]
}

/// Build an app with the stub source; optionally with an installed token.
async fn test_app(products: Vec<Product>, fail: bool, surface: bool, installed: bool) -> Router {
    let config = test_config(surface);
    let shopify = ShopifyClient::new(&config.shopify);

    if installed {
        shopify
            .set_token(OAuthToken {
                access_token: "shpat_test".to_string(),
                scope: "read_products".to_string(),
                obtained_at: 0,
                shop: "demo.myshopify.com".to_string(),
            })
            .await;
    }

    let source: Arc<dyn ProductSource> = Arc::new(StubProducts { products, fail });
    let state = AppState::with_product_source(config.clone(), shopify, source);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(routes::routes())
        .layer(create_session_layer(&config))
        .with_state(state)
}

async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn post_form(app: Router, uri: &str, body: &str) -> StatusCode {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn unauthenticated_request_gets_401_with_no_product_data() {
    let app = test_app(sample_products(), false, false, false).await;
    let (status, body) = get_body(app, "/").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "Unauthorized");
}

#[tokio::test]
async fn health_does_not_require_authentication() {
    let app = test_app(vec![], false, false, false).await;
    let (status, body) = get_body(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

// ============================================================================
// Product Listing & Filters
// ============================================================================

#[tokio::test]
async fn listing_renders_all_products_without_filters() {
    let app = test_app(sample_products(), false, false, true).await;
    let (status, body) = get_body(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Red Summer Shirt"));
    assert!(body.contains("Blue Winter Coat"));
}

#[tokio::test]
async fn sku_filter_narrows_listing() {
    let app = test_app(sample_products(), false, false, true).await;
    let (status, body) = get_body(app, "/?sku=AB-1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Red Summer Shirt"));
    assert!(!body.contains("Blue Winter Coat"));
}

#[tokio::test]
async fn tag_and_collection_filters_narrow_listing() {
    let app = test_app(sample_products(), false, false, true).await;
    let (_, body) = get_body(app, "/?tag=sale").await;
    assert!(body.contains("Red Summer Shirt"));
    assert!(!body.contains("Blue Winter Coat"));

    let app = test_app(sample_products(), false, false, true).await;
    let (_, body) = get_body(app, "/?collection=Winter").await;
    assert!(!body.contains("Red Summer Shirt"));
    assert!(body.contains("Blue Winter Coat"));
}

#[tokio::test]
async fn no_matches_renders_empty_state() {
    let app = test_app(sample_products(), false, false, true).await;
    let (status, body) = get_body(app, "/?sku=ZZ-999").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No products found matching your criteria."));
}

#[tokio::test]
async fn empty_store_renders_empty_state_regardless_of_filters() {
    let app = test_app(vec![], false, false, true).await;
    let (status, body) = get_body(app, "/?sku=AB&tag=red&collection=Summer").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No products found matching your criteria."));
}

// ============================================================================
// Fetch Failure Handling
// ============================================================================

#[tokio::test]
async fn fetch_failure_degrades_to_empty_listing_by_default() {
    let app = test_app(sample_products(), true, false, true).await;
    let (status, body) = get_body(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No products found matching your criteria."));
    assert!(!body.contains("upstream exploded"));
}

#[tokio::test]
async fn fetch_failure_is_surfaced_when_configured() {
    let app = test_app(sample_products(), true, true, true).await;
    let (status, body) = get_body(app, "/").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    // Internal details stay out of the response
    assert!(!body.contains("upstream exploded"));
}

// ============================================================================
// Discount Stub
// ============================================================================

#[tokio::test]
async fn apply_discount_requires_authentication() {
    let app = test_app(sample_products(), false, false, false).await;
    let status = post_form(app, "/discounts/apply", "product_ids=1,2").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn apply_discount_rejects_empty_selection() {
    let app = test_app(sample_products(), false, false, true).await;
    let status = post_form(app, "/discounts/apply", "product_ids=").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn apply_discount_is_not_implemented() {
    let app = test_app(sample_products(), false, false, true).await;
    let status = post_form(app, "/discounts/apply", "product_ids=1,2").await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
}
