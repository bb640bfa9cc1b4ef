/*
 * Responsibility
 * - AppError shared by handlers and middleware
 * - IntoResponse (HTTP status / JSON body / challenge header)
 */
use std::sync::Arc;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or rejected credentials. Rendered as a Basic challenge for `realm`.
    #[error("unauthorized")]
    Unauthorized { realm: Arc<str> },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn unauthorized(realm: impl Into<Arc<str>>) -> Self {
        Self::Unauthorized {
            realm: realm.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized { realm } => challenge(&realm),
            AppError::Internal => {
                let body = ErrorResponse {
                    error: ErrorBody {
                        code: "INTERNAL",
                        message: "internal server error".into(),
                    },
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

/// 401 with `{"message": "Authenticate."}` and `WWW-Authenticate: Basic realm="..."`.
fn challenge(realm: &str) -> Response {
    let www_authenticate = HeaderValue::from_str(&format!("Basic realm=\"{realm}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("Basic"));

    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, www_authenticate)],
        Json(json!({ "message": "Authenticate." })),
    )
        .into_response()
}
