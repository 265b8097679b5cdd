//! Shopify Admin API REST client with OAuth authentication.

use std::sync::Arc;

use futures::future::BoxFuture;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::config::ShopifyConfig;

use super::{
    ProductSource, ShopifyError,
    types::{Product, ProductsResponse},
};

/// OAuth token for Admin API access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthToken {
    /// The access token for API calls.
    pub access_token: String,
    /// Granted scopes (comma-separated, as returned by Shopify).
    pub scope: String,
    /// Unix timestamp when the token was obtained.
    pub obtained_at: i64,
    /// Associated shop domain.
    pub shop: String,
}

/// An authenticated platform session.
///
/// Issued by [`ShopifyClient::session`] once the install flow has completed;
/// required for all product queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSession {
    /// Shop domain the session is bound to.
    pub shop: String,
    /// Scopes granted to the session.
    pub scopes: Vec<String>,
}

/// OAuth token response from Shopify.
#[derive(Debug, Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
    scope: String,
}

/// Shopify Admin API client.
///
/// Constructed from an explicit [`ShopifyConfig`] and shared by reference
/// through application state - there is deliberately no module-wide instance.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    client: reqwest::Client,
    api_key: String,
    api_secret: String,
    api_version: String,
    custom_shop_domain: Option<String>,
    /// In-memory token cache; discarded on restart, re-obtained via install.
    token: RwLock<Option<OAuthToken>>,
}

impl ShopifyClient {
    /// Create a new client from the app configuration.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        Self {
            inner: Arc::new(ShopifyClientInner {
                client: reqwest::Client::new(),
                api_key: config.api_key.clone(),
                api_secret: config.api_secret.expose_secret().to_string(),
                api_version: config.api_version.clone(),
                custom_shop_domain: config.custom_shop_domain.clone(),
                token: RwLock::new(None),
            }),
        }
    }

    /// Get the app API key (OAuth client ID).
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.inner.api_key
    }

    /// Get the app API secret (for callback HMAC verification).
    #[must_use]
    pub fn api_secret(&self) -> &str {
        &self.inner.api_secret
    }

    /// Resolve the effective shop domain for `shop` supplied at install time.
    ///
    /// A configured `SHOP_CUSTOM_DOMAIN` overrides whatever the platform sent.
    #[must_use]
    pub fn resolve_shop<'a>(&'a self, shop: &'a str) -> &'a str {
        self.inner.custom_shop_domain.as_deref().unwrap_or(shop)
    }

    // =========================================================================
    // OAuth Flow
    // =========================================================================

    /// Generate the OAuth authorization URL for a shop.
    ///
    /// Redirect the merchant to this URL to begin the install flow.
    #[must_use]
    pub fn authorization_url(
        &self,
        shop: &str,
        scopes: &[String],
        redirect_uri: &str,
        state: &str,
    ) -> String {
        let scope = scopes.join(",");
        format!(
            "https://{}/admin/oauth/authorize?client_id={}&scope={}&redirect_uri={}&state={}",
            self.resolve_shop(shop),
            urlencoding::encode(&self.inner.api_key),
            urlencoding::encode(&scope),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Call this in the OAuth callback handler after the merchant authorizes.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::OAuth` if the token exchange fails, or
    /// `ShopifyError::Http` if the HTTP request itself fails.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, shop: &str, code: &str) -> Result<OAuthToken, ShopifyError> {
        let shop = self.resolve_shop(shop);
        let url = format!("https://{shop}/admin/oauth/access_token");

        let params = [
            ("client_id", self.inner.api_key.as_str()),
            ("client_secret", self.inner.api_secret.as_str()),
            ("code", code),
        ];

        let response = self.inner.client.post(&url).form(&params).send().await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ShopifyError::OAuth(format!(
                "Token exchange failed: {text}"
            )));
        }

        let token_response: OAuthTokenResponse = response.json().await?;

        let token = OAuthToken {
            access_token: token_response.access_token,
            scope: token_response.scope,
            obtained_at: chrono::Utc::now().timestamp(),
            shop: shop.to_string(),
        };

        *self.inner.token.write().await = Some(token.clone());

        Ok(token)
    }

    /// Set the access token directly (used by tests and token restore).
    pub async fn set_token(&self, token: OAuthToken) {
        *self.inner.token.write().await = Some(token);
    }

    /// Check if the client holds an access token.
    pub async fn has_token(&self) -> bool {
        self.inner.token.read().await.is_some()
    }

    /// Clear the cached token.
    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
    }

    /// Return the authenticated session, if the install flow has completed.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NoAccessToken` when no token is cached; callers
    /// translate this into a uniform 401 denial.
    pub async fn session(&self) -> Result<ShopSession, ShopifyError> {
        let token = self.inner.token.read().await;
        token
            .as_ref()
            .map(|t| ShopSession {
                shop: t.shop.clone(),
                scopes: t.scope.split(',').map(|s| s.trim().to_string()).collect(),
            })
            .ok_or(ShopifyError::NoAccessToken)
    }

    async fn access_token(&self) -> Result<(String, String), ShopifyError> {
        let token = self.inner.token.read().await;
        token
            .as_ref()
            .map(|t| (t.shop.clone(), t.access_token.clone()))
            .ok_or(ShopifyError::NoAccessToken)
    }

    // =========================================================================
    // Product Listing
    // =========================================================================

    /// Fetch up to `limit` products from the shop (first page only).
    ///
    /// # Errors
    ///
    /// Returns an error if no token is cached, the request fails, the API
    /// rejects the token, or the response body cannot be parsed.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self, limit: i64) -> Result<Vec<Product>, ShopifyError> {
        let (shop, access_token) = self.access_token().await?;
        let url = format!(
            "https://{}/admin/api/{}/products.json",
            shop, self.inner.api_version
        );

        let response = self
            .inner
            .client
            .get(&url)
            .header("X-Shopify-Access-Token", &access_token)
            .query(&[("limit", limit)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ShopifyError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyError::Api { status, body });
        }

        let body: ProductsResponse = response.json().await?;

        Ok(body.products.into_iter().map(Product::from).collect())
    }
}

impl ProductSource for ShopifyClient {
    fn list_products(&self, limit: i64) -> BoxFuture<'_, Result<Vec<Product>, ShopifyError>> {
        Box::pin(self.fetch_products(limit))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn test_config(custom_shop_domain: Option<&str>) -> ShopifyConfig {
        ShopifyConfig {
            api_key: "test_api_key".to_string(),
            api_secret: SecretString::from("shpss_9f2c1ab8e3d74f6a"),
            scopes: vec!["read_products".to_string(), "write_products".to_string()],
            app_url: "https://discounts.test.app".to_string(),
            custom_shop_domain: custom_shop_domain.map(String::from),
            api_version: "2024-10".to_string(),
            product_limit: 50,
        }
    }

    fn test_token() -> OAuthToken {
        OAuthToken {
            access_token: "shpat_token".to_string(),
            scope: "read_products, write_products".to_string(),
            obtained_at: 0,
            shop: "demo.myshopify.com".to_string(),
        }
    }

    #[test]
    fn test_authorization_url() {
        let client = ShopifyClient::new(&test_config(None));
        let url = client.authorization_url(
            "demo.myshopify.com",
            &["read_products".to_string()],
            "https://discounts.test.app/auth/callback",
            "nonce-123",
        );

        assert!(url.starts_with("https://demo.myshopify.com/admin/oauth/authorize?"));
        assert!(url.contains("client_id=test_api_key"));
        assert!(url.contains("scope=read_products"));
        assert!(url.contains("state=nonce-123"));
    }

    #[test]
    fn test_custom_shop_domain_overrides_install_shop() {
        let client = ShopifyClient::new(&test_config(Some("shop.example.com")));
        assert_eq!(client.resolve_shop("demo.myshopify.com"), "shop.example.com");

        let client = ShopifyClient::new(&test_config(None));
        assert_eq!(client.resolve_shop("demo.myshopify.com"), "demo.myshopify.com");
    }

    #[tokio::test]
    async fn test_session_requires_token() {
        let client = ShopifyClient::new(&test_config(None));
        assert!(matches!(
            client.session().await.unwrap_err(),
            ShopifyError::NoAccessToken
        ));

        client.set_token(test_token()).await;
        let session = client.session().await.unwrap();
        assert_eq!(session.shop, "demo.myshopify.com");
        assert_eq!(session.scopes, vec!["read_products", "write_products"]);
    }

    #[tokio::test]
    async fn test_clear_token() {
        let client = ShopifyClient::new(&test_config(None));
        client.set_token(test_token()).await;
        assert!(client.has_token().await);

        client.clear_token().await;
        assert!(!client.has_token().await);
    }
}
