/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 *   - credential validator for the Basic auth gate, realm for the challenge
 * - cheap to Clone (Arc inside)
 */
use std::sync::Arc;

use crate::services::auth::{CredentialValidator, StaticCredentials};

#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<dyn CredentialValidator>,
    pub realm: Arc<str>,
}

impl AppState {
    pub fn new(validator: Arc<dyn CredentialValidator>, realm: impl Into<Arc<str>>) -> Self {
        Self {
            validator,
            realm: realm.into(),
        }
    }

    /// State with the single accepted pair `admin`/`secret` in realm `Example`.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(
            Arc::new(StaticCredentials::new("admin", "secret")),
            "Example",
        )
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("realm", &self.realm)
            .finish_non_exhaustive()
    }
}

impl From<&crate::config::Config> for AppState {
    fn from(config: &crate::config::Config) -> Self {
        let validator = StaticCredentials::new(
            config.basic_auth_username.clone(),
            config.basic_auth_password.clone(),
        );
        Self::new(Arc::new(validator), config.basic_auth_realm.as_str())
    }
}
