//! `Authorization: Basic <base64(user:pass)>` parsing (RFC 7617).
//!
//! Only extraction lives here; whether the pair is accepted is decided by a
//! `CredentialValidator`.

use axum::http::{HeaderMap, header};
use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

use super::Credentials;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BasicAuthError {
    #[error("authorization header missing")]
    Missing,
    #[error("authorization header is not valid ascii")]
    InvalidHeader,
    #[error("unsupported authorization scheme")]
    UnsupportedScheme,
    #[error("credentials are not valid base64")]
    InvalidEncoding,
    #[error("credentials are not valid utf-8")]
    InvalidUtf8,
    #[error("credentials have no ':' separator")]
    MissingSeparator,
}

/// Extracts the Basic credential pair from request headers.
pub fn parse_authorization(headers: &HeaderMap) -> Result<Credentials, BasicAuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BasicAuthError::Missing)?
        .to_str()
        .map_err(|_| BasicAuthError::InvalidHeader)?;

    parse_basic(value)
}

/// Parses a raw `Authorization` header value.
pub fn parse_basic(value: &str) -> Result<Credentials, BasicAuthError> {
    let value = value.trim();
    let (scheme, payload) = value
        .split_once(' ')
        .ok_or(BasicAuthError::UnsupportedScheme)?;

    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(BasicAuthError::UnsupportedScheme);
    }

    let decoded = STANDARD
        .decode(payload.trim_start())
        .map_err(|_| BasicAuthError::InvalidEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| BasicAuthError::InvalidUtf8)?;

    // the secret may itself contain ':'
    let (username, password) = decoded
        .split_once(':')
        .ok_or(BasicAuthError::MissingSeparator)?;

    Ok(Credentials::new(username, password))
}
