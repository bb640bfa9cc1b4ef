/*
 * Responsibility
 * - URL layout of the API
 * - public routes: /health, /hello
 * - Basic-auth protected routes: /secrets (gate wraps the GET route only)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{health::health, hello::hello, secrets::secrets};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/hello", post(hello))
        .route(
            "/secrets",
            middleware::auth::basic::apply(get(secrets), state),
        )
}
