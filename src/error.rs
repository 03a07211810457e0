use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::EmailRuleError;

/// Every failure a handler can surface, mapped to one HTTP status and one
/// JSON body shape: `{"success": false, "message": ...}` plus a reason flag
/// where the frontend keys off it.
///
/// Token-redemption and login failures are deliberately generic: expired,
/// already-used and never-existed tokens all read the same, and an unknown
/// email reads the same as a wrong password.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(String),
    #[error("Your account has been restricted. Please contact support.")]
    Blocked,
    #[error("Email verification required. Please verify your email to create listings.")]
    Unverified,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Too many requests. Please try again in {retry_after} seconds.")]
    RateLimited { retry_after: u64 },
    #[error("Something went wrong. Please try again later.")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Blocked | ApiError::Unverified | ApiError::Forbidden(_) => {
                StatusCode::FORBIDDEN
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({
            "success": false,
            "message": self.to_string(),
        });

        match &self {
            ApiError::Blocked => {
                body["isBlocked"] = json!(true);
            }
            ApiError::Unverified => {
                body["isVerified"] = json!(false);
            }
            ApiError::Internal(source) => {
                // Full cause stays server-side; the client sees the generic line.
                error!(error = %source, "internal error");
            }
            _ => {}
        }

        if let ApiError::RateLimited { retry_after } = &self {
            return (
                status,
                [(header::RETRY_AFTER, retry_after.to_string())],
                Json(body),
            )
                .into_response();
        }

        (status, Json(body)).into_response()
    }
}

impl From<EmailRuleError> for ApiError {
    fn from(e: EmailRuleError) -> Self {
        ApiError::Validation(e.to_string())
    }
}
