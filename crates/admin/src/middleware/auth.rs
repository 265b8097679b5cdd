//! Authentication extractor.
//!
//! Requiring a platform session in a handler is done through the
//! [`RequireShopSession`] extractor.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use crate::shopify::ShopSession;
use crate::state::AppState;

/// Extractor that requires an authenticated platform session.
///
/// If the app holds no valid session (install flow not completed, token
/// cleared), the request terminates with 401 and a bare status marker. Every
/// failure path is logged and collapses into the same denial.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireShopSession(session): RequireShopSession,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", session.shop)
/// }
/// ```
pub struct RequireShopSession(pub ShopSession);

/// Uniform denial returned when no platform session is available.
pub struct ShopSessionRejection;

impl IntoResponse for ShopSessionRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

impl FromRequestParts<AppState> for RequireShopSession {
    type Rejection = ShopSessionRejection;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.shopify().session().await {
            Ok(session) => Ok(Self(session)),
            Err(e) => {
                tracing::warn!("Authentication failed: {e}");
                Err(ShopSessionRejection)
            }
        }
    }
}
