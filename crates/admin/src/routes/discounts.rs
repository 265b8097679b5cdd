//! Discount application route handler.
//!
//! The discount action is an explicit unimplemented extension point: no
//! discount semantics (kind, scope, persistence) are defined yet, so the
//! handler validates the selection and answers 501.

use axum::{Form, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::AppError, filter::Selection, middleware::RequireShopSession, state::AppState,
};

/// Form body for the apply-discount action.
#[derive(Debug, Deserialize)]
pub struct ApplyDiscountForm {
    /// Comma-separated selected product ids, assembled by the listing page.
    #[serde(default)]
    pub product_ids: String,
}

/// POST /discounts/apply - placeholder for the discount action.
#[instrument(skip(_session, _state))]
pub async fn apply(
    RequireShopSession(_session): RequireShopSession,
    State(_state): State<AppState>,
    Form(form): Form<ApplyDiscountForm>,
) -> Result<(), AppError> {
    let selection = Selection::from_ids(
        form.product_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty()),
    );

    if selection.is_empty() {
        return Err(AppError::BadRequest("No products selected".to_string()));
    }

    tracing::info!(selected = selection.len(), "Discount application requested");

    Err(AppError::NotImplemented(
        "Discount functionality is not implemented yet".to_string(),
    ))
}
