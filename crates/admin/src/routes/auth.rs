//! Shopify OAuth install flow routes.
//!
//! `GET /auth/install?shop=...` redirects the merchant to Shopify's consent
//! screen; `GET /auth/callback` verifies the HMAC signature and CSRF state,
//! exchanges the authorization code and caches the access token.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tower_sessions::Session;
use tracing::instrument;

use crate::{error::AppError, state::AppState};

const OAUTH_STATE_KEY: &str = "shopify_oauth_state";

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Query Parameters
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct InstallParams {
    pub shop: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub shop: Option<String>,
    pub hmac: Option<String>,
    pub timestamp: Option<String>,
    pub host: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

// =============================================================================
// HMAC Verification
// =============================================================================

/// Verify the HMAC signature from a Shopify OAuth callback.
fn verify_shopify_hmac(params: &OAuthCallbackParams, api_secret: &str) -> bool {
    let Some(provided_hmac) = &params.hmac else {
        return false;
    };

    // Build the message from sorted params (excluding hmac)
    let mut param_pairs: Vec<(&str, &str)> = Vec::new();

    if let Some(v) = &params.code {
        param_pairs.push(("code", v));
    }
    if let Some(v) = &params.host {
        param_pairs.push(("host", v));
    }
    if let Some(v) = &params.shop {
        param_pairs.push(("shop", v));
    }
    if let Some(v) = &params.state {
        param_pairs.push(("state", v));
    }
    if let Some(v) = &params.timestamp {
        param_pairs.push(("timestamp", v));
    }

    param_pairs.sort_by(|a, b| a.0.cmp(b.0));

    let message: String = param_pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let Ok(mut mac) = HmacSha256::new_from_slice(api_secret.as_bytes()) else {
        return false;
    };
    mac.update(message.as_bytes());

    let computed = hex::encode(mac.finalize().into_bytes());

    computed == *provided_hmac
}

// =============================================================================
// Route Handlers
// =============================================================================

/// GET /auth/install - start the OAuth install flow.
#[instrument(skip(state, session))]
pub async fn install(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<InstallParams>,
) -> Result<Redirect, AppError> {
    let shop = params
        .shop
        .or_else(|| state.config().shopify.custom_shop_domain.clone())
        .ok_or_else(|| AppError::BadRequest("Missing shop parameter".to_string()))?;

    // Random state parameter for CSRF protection
    let oauth_state = uuid::Uuid::new_v4().to_string();
    session
        .insert(OAUTH_STATE_KEY, &oauth_state)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store OAuth state: {e}")))?;

    let auth_url = state.shopify().authorization_url(
        &shop,
        &state.config().shopify.scopes,
        &state.config().shopify.redirect_uri(),
        &oauth_state,
    );

    tracing::info!("Redirecting to Shopify OAuth for shop {shop}");
    Ok(Redirect::to(&auth_url))
}

/// GET /auth/callback - handle the OAuth callback.
#[instrument(skip(state, session, params))]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<OAuthCallbackParams>,
) -> Result<Redirect, AppError> {
    // Merchant denied the install, or Shopify reported an error
    if let Some(error) = &params.error {
        let description = params.error_description.as_deref().unwrap_or_default();
        tracing::error!("Shopify OAuth error: {error} - {description}");
        return Err(AppError::BadRequest(
            "OAuth authorization was denied".to_string(),
        ));
    }

    if !verify_shopify_hmac(&params, state.shopify().api_secret()) {
        tracing::error!("Invalid HMAC signature in OAuth callback");
        return Err(AppError::BadRequest("Invalid HMAC signature".to_string()));
    }

    let (Some(code), Some(callback_state), Some(shop)) =
        (&params.code, &params.state, &params.shop)
    else {
        tracing::error!("Missing code, state or shop in OAuth callback");
        return Err(AppError::BadRequest("Malformed OAuth callback".to_string()));
    };

    // Verify state matches what we stored at install start
    let stored_state: Option<String> = session.get(OAUTH_STATE_KEY).await.ok().flatten();
    if stored_state.as_ref() != Some(callback_state) {
        tracing::error!("OAuth state mismatch - possible CSRF attack");
        return Err(AppError::BadRequest("Invalid state parameter".to_string()));
    }
    let _ = session.remove::<String>(OAUTH_STATE_KEY).await;

    let token = state.shopify().exchange_code(shop, code).await?;

    tracing::info!("Connected to Shopify store: {}", token.shop);
    Ok(Redirect::to("/"))
}
