//! Product listing route handler.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use tracing::instrument;

use crate::{
    error::AppError,
    filter::ProductFilter,
    middleware::RequireShopSession,
    shopify::types::Product,
    state::AppState,
};

/// Product view for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub sku: String,
    pub tags: String,
    pub collections: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            sku: product.sku.clone(),
            tags: product.tags.join(", "),
            collections: product.collections.join(", "),
        }
    }
}

/// Product listing page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub shop: String,
    pub filter: ProductFilter,
    pub products: Vec<ProductView>,
}

/// Product listing page handler.
///
/// Fetches the first page of products and applies the three substring
/// filters from the query string. On fetch failure the listing degrades to
/// empty unless `SURFACE_FETCH_ERRORS` is enabled, in which case the failure
/// is surfaced as 502.
#[instrument(skip(session, state))]
pub async fn index(
    RequireShopSession(session): RequireShopSession,
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Html<String>, AppError> {
    let limit = state.config().shopify.product_limit;

    let products = match state.products().list_products(limit).await {
        Ok(products) => products,
        Err(e) if !state.config().surface_fetch_errors => {
            // Historical behavior: a failed fetch renders the same empty
            // listing as a genuinely empty store.
            tracing::error!("Failed to fetch products, rendering empty list: {e}");
            vec![]
        }
        Err(e) => return Err(e.into()),
    };

    let products: Vec<ProductView> = filter
        .apply(&products)
        .into_iter()
        .map(ProductView::from)
        .collect();

    let template = ProductsIndexTemplate {
        shop: session.shop,
        filter,
        products,
    };

    Ok(Html(template.render().map_err(|e| {
        tracing::error!("Template render error: {e}");
        AppError::Internal(format!("template render: {e}"))
    })?))
}
