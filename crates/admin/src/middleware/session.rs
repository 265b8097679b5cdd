//! Session middleware configuration.
//!
//! Sessions here carry only the OAuth CSRF state during the install flow;
//! nothing is persisted, so an in-memory store is sufficient.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::AppConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "custom_discounts_session";

/// Session expiry in seconds (1 hour - long enough for an install flow).
const SESSION_EXPIRY_SECONDS: i64 = 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &AppConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    let is_secure = config.shopify.app_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        // Lax, not Strict: the OAuth callback arrives as a top-level
        // cross-site navigation from Shopify and must carry the cookie.
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
