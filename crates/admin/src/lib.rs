//! Custom Discounts admin library.
//!
//! Merchant-facing admin app: authenticate against the Shopify Admin API,
//! list products with SKU/tag/collection substring filters, select a subset
//! and (eventually) apply a discount to it.
//!
//! The binary in `main.rs` wires this library into an Axum server; the
//! library split exists so routes and handlers can be exercised in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filter;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;
