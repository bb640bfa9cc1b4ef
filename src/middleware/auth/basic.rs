//! HTTP Basic auth gate: header extraction → CredentialValidator → pass or challenge.
//!
//! On success the authenticated identifier is put into request extensions as
//! `AuthCtx`, and the wrapped handler's response is returned unmodified.
//! Missing, malformed and rejected credentials all produce the same 401 challenge.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::basic::{self as basic_auth, BasicAuthError};
use crate::state::AppState;

/// Puts a method route behind the Basic auth gate.
///
/// The layer is attached with `MethodRouter::route_layer`, so only the
/// registered methods are gated; other methods still get axum's 405.
///
/// ```ignore
/// Router::new().route("/secrets", middleware::auth::basic::apply(get(secrets), state.clone()))
/// ```
pub fn apply(route: MethodRouter<AppState>, state: AppState) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(state, require_basic_auth))
}

async fn require_basic_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let credentials = match basic_auth::parse_authorization(req.headers()) {
        Ok(credentials) => credentials,
        Err(BasicAuthError::Missing) => {
            tracing::warn!(uri = %req.uri(), "basic auth: credentials missing");
            return Err(AppError::unauthorized(state.realm.clone()));
        }
        Err(err) => {
            tracing::debug!(uri = %req.uri(), error = %err, "basic auth: malformed credentials");
            return Err(AppError::unauthorized(state.realm.clone()));
        }
    };

    if !state.validator.validate(&credentials).await {
        tracing::warn!(
            uri = %req.uri(),
            username = %credentials.username,
            "basic auth: credentials rejected"
        );
        return Err(AppError::unauthorized(state.realm.clone()));
    }

    req.extensions_mut().insert(AuthCtx::new(credentials.username));

    Ok(next.run(req).await)
}
