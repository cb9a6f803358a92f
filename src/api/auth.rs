//! API-key capability check.
//!
//! Kept independent of the engine: handlers call [`check_api_key`] and only
//! reach the model on [`AuthResult::Granted`].

use axum::http::HeaderMap;

use crate::config::ApiKeys;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthResult {
    Granted,
    Missing,
    Rejected,
}

impl AuthResult {
    pub fn is_granted(self) -> bool {
        self == AuthResult::Granted
    }
}

/// Decide whether `provided` is one of the `allowed` keys. The provided
/// key is compared exactly as sent.
pub fn check_api_key(provided: Option<&str>, allowed: &ApiKeys) -> AuthResult {
    match provided {
        None | Some("") => AuthResult::Missing,
        Some(key) if allowed.contains(key) => AuthResult::Granted,
        Some(_) => AuthResult::Rejected,
    }
}

/// Pull the API key out of request headers. Non-ASCII values count as
/// absent.
pub fn api_key_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}
