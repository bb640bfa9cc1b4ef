/*
 * Responsibility
 * - GET /secrets (behind middleware::auth::basic)
 * - plain text body with the default 200
 */
use crate::api::extractors::AuthCtxExtractor;

pub const SECRET_MESSAGE: &str = "Shhh this is top secret spy stuff!";

pub async fn secrets(AuthCtxExtractor(ctx): AuthCtxExtractor) -> &'static str {
    tracing::debug!(username = %ctx.username, "serving secrets");
    SECRET_MESSAGE
}
