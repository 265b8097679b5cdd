//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health           - Health check
//!
//! # Products
//! GET  /                 - Product listing with SKU/tag/collection filters
//!
//! # Auth (Shopify OAuth install flow)
//! GET  /auth/install     - Start the install flow for a shop
//! GET  /auth/callback    - OAuth callback (HMAC + state verified)
//!
//! # Discounts
//! POST /discounts/apply  - Apply a discount to selected products (stub, 501)
//! ```

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod auth;
pub mod discounts;
pub mod products;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/auth/install", get(auth::install))
        .route("/auth/callback", get(auth::callback))
        .route("/discounts/apply", post(discounts::apply))
}
