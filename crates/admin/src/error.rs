//! Unified error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::shopify::ShopifyError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// No authenticated platform session.
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Requested action exists but is not implemented.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server-side failures go to Sentry
        if matches!(self, Self::Shopify(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients. The 401 body is a
        // bare status marker, nothing more.
        let message = match &self {
            Self::Shopify(_) => "External service error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Unauthorized => "Unauthorized".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("no products selected".to_string());
        assert_eq!(err.to_string(), "Bad request: no products selected");

        let err = AppError::Unauthorized;
        assert_eq!(err.to_string(), "Unauthorized");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotImplemented("x".to_string())),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            get_status(AppError::Shopify(ShopifyError::NoAccessToken)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
