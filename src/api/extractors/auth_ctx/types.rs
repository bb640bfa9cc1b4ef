/*
 * Responsibility
 * - the "authenticated context" type handlers see
 * - inserted into request extensions by middleware::auth::basic
 */

/// Context attached to a request that passed the Basic auth gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub username: String,
}

impl AuthCtx {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}
