/*
 * Responsibility
 * - credential type seen by the Basic auth gate
 * - CredentialValidator: the accept/reject policy injected into AppState
 * - StaticCredentials: default policy (one configured identifier/secret pair)
 */
pub mod basic;

use async_trait::async_trait;

/// Identifier/secret pair taken from one request's `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Decides whether a credential pair may pass the gate.
///
/// Implementations must not keep per-request state: the same pair always gets
/// the same answer.
#[async_trait]
pub trait CredentialValidator: Send + Sync + 'static {
    async fn validate(&self, credentials: &Credentials) -> bool;
}

/// Accepts exactly one identifier/secret pair.
pub struct StaticCredentials {
    accepted: Credentials,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            accepted: Credentials::new(username, password),
        }
    }
}

#[async_trait]
impl CredentialValidator for StaticCredentials {
    async fn validate(&self, credentials: &Credentials) -> bool {
        // both fields are always compared
        let user_ok = bytes_eq(
            credentials.username.as_bytes(),
            self.accepted.username.as_bytes(),
        );
        let pass_ok = bytes_eq(
            credentials.password.as_bytes(),
            self.accepted.password.as_bytes(),
        );
        user_ok & pass_ok
    }
}

/// Equality that does not return at the first differing byte.
fn bytes_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
