//! Unified error handling for the HTTP layer.
//!
//! Route handlers return `Result<T, AppError>`. The response body is a
//! structured JSON object with a stable `error` discriminant plus any
//! machine-usable fields (shortfall, available stock), replacing the
//! original system's flash-message strings.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::account::AccountError;
use crate::services::catalog::CatalogError;
use crate::services::checkout::CheckoutError;
use crate::services::media::MediaError;

/// Application-level error type for the store.
#[derive(Debug, Error)]
pub enum AppError {
    /// Account operation failed.
    #[error("account error: {0}")]
    Account(#[from] AccountError),

    /// Catalog/admin operation failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart/checkout operation failed.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Direct repository failure.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Image file handling failed.
    #[error("media error: {0}")]
    Media(#[from] MediaError),

    /// Session store failure.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code, stable error discriminant, and extra JSON fields.
    fn parts(&self) -> (StatusCode, &'static str, Value) {
        match self {
            Self::Account(err) => account_parts(err),
            Self::Catalog(err) => catalog_parts(err),
            Self::Checkout(err) => checkout_parts(err),
            Self::Media(MediaError::UnsupportedFile) => {
                (StatusCode::BAD_REQUEST, "unsupported_file", json!({}))
            }
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", json!({})),
            Self::Database(_) | Self::Session(_) | Self::Internal(_) | Self::Media(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", json!({}))
            }
        }
    }
}

fn account_parts(err: &AccountError) -> (StatusCode, &'static str, Value) {
    match err {
        AccountError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "invalid_credentials", json!({}))
        }
        AccountError::UserNotFound => (StatusCode::NOT_FOUND, "not_found", json!({})),
        AccountError::UsernameTaken => (StatusCode::CONFLICT, "username_taken", json!({})),
        AccountError::EmailTaken => (StatusCode::CONFLICT, "email_taken", json!({})),
        AccountError::InvalidUsername(_)
        | AccountError::InvalidEmail(_)
        | AccountError::WeakPassword(_)
        | AccountError::PasswordMismatch => (StatusCode::BAD_REQUEST, "validation", json!({})),
        AccountError::PasswordHash | AccountError::Repository(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", json!({}))
        }
    }
}

fn catalog_parts(err: &CatalogError) -> (StatusCode, &'static str, Value) {
    match err {
        CatalogError::DuplicateName => (StatusCode::CONFLICT, "duplicate_name", json!({})),
        CatalogError::NotFound { kind, id } => (
            StatusCode::NOT_FOUND,
            "not_found",
            json!({ "kind": kind, "id": id }),
        ),
        CatalogError::EmptyName
        | CatalogError::InvalidPrice
        | CatalogError::InvalidStock
        | CatalogError::InvalidBalance => (StatusCode::BAD_REQUEST, "validation", json!({})),
        CatalogError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", json!({})),
    }
}

fn checkout_parts(err: &CheckoutError) -> (StatusCode, &'static str, Value) {
    match err {
        CheckoutError::EmptyCart => (StatusCode::BAD_REQUEST, "empty_cart", json!({})),
        CheckoutError::InsufficientFunds { shortfall } => (
            StatusCode::PAYMENT_REQUIRED,
            "insufficient_funds",
            json!({ "shortfall": shortfall }),
        ),
        CheckoutError::InsufficientStock {
            product_id,
            name,
            available,
        } => (
            StatusCode::CONFLICT,
            "insufficient_stock",
            json!({ "product_id": product_id, "name": name, "available": available }),
        ),
        CheckoutError::InvalidQuantity => (StatusCode::BAD_REQUEST, "validation", json!({})),
        CheckoutError::NotFound { kind, id } => (
            StatusCode::NOT_FOUND,
            "not_found",
            json!({ "kind": kind, "id": id }),
        ),
        CheckoutError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", json!({})),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, extra) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self, "request error");
        }

        // Don't expose internal error details to clients.
        let message = if status.is_server_error() {
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        let mut body = json!({ "error": code, "message": message });
        if let (Some(object), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                object.insert(key.clone(), value.clone());
            }
        }

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_taxonomy_status_codes() {
        assert_eq!(
            status_of(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Checkout(CheckoutError::InsufficientFunds {
                shortfall: 10
            })),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            status_of(AppError::Catalog(CatalogError::DuplicateName)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Account(AccountError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::BadRequest("nope".to_owned())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let response = AppError::Internal("pool exhausted".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
