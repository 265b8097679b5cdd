//! Shopify Admin API integration.
//!
//! A thin shim over the platform: OAuth install flow plus a single
//! product-listing call. No retry, no backoff, no caching - anything beyond
//! one authenticated fetch per page load is out of scope for this app.

mod client;
pub mod types;

pub use client::{OAuthToken, ShopSession, ShopifyClient};

use futures::future::BoxFuture;
use thiserror::Error;

use types::Product;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// OAuth flow failed (token exchange, bad callback).
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The API returned a non-success status.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// No access token available - the app has not completed the install flow.
    #[error("No access token - complete the install flow first")]
    NoAccessToken,
}

/// Source of catalog products.
///
/// Handlers depend on this seam rather than on `ShopifyClient` directly so
/// they can be exercised with a substitute source in tests.
pub trait ProductSource: Send + Sync {
    /// Fetch up to `limit` products (first page only, no pagination).
    fn list_products(&self, limit: i64) -> BoxFuture<'_, Result<Vec<Product>, ShopifyError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::Unauthorized("Invalid token".to_string());
        assert_eq!(err.to_string(), "Unauthorized: Invalid token");

        let err = ShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");

        let err = ShopifyError::Api {
            status: 500,
            body: "Internal Server Error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (status 500): Internal Server Error"
        );
    }

    #[test]
    fn test_no_access_token_display() {
        let err = ShopifyError::NoAccessToken;
        assert!(err.to_string().contains("install flow"));
    }
}
