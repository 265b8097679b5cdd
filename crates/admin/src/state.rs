//! Application state shared across handlers.

use std::sync::Arc;

use crate::{
    config::AppConfig,
    shopify::{ProductSource, ShopifyClient},
};

/// Application state shared across all handlers.
///
/// Holds the explicit Shopify client (no ambient singleton) plus the product
/// source handlers read from. In production both are the same client; tests
/// substitute the product source.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    shopify: ShopifyClient,
    products: Arc<dyn ProductSource>,
}

impl AppState {
    /// Build state with the real Shopify client as the product source.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let shopify = ShopifyClient::new(&config.shopify);
        let products: Arc<dyn ProductSource> = Arc::new(shopify.clone());
        Self::with_product_source(config, shopify, products)
    }

    /// Build state with a substitute product source.
    #[must_use]
    pub fn with_product_source(
        config: AppConfig,
        shopify: ShopifyClient,
        products: Arc<dyn ProductSource>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                products,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn shopify(&self) -> &ShopifyClient {
        &self.inner.shopify
    }

    #[must_use]
    pub fn products(&self) -> &dyn ProductSource {
        self.inner.products.as_ref()
    }
}
