//! Shared-secret checks for the HTTP surfaces.

use secrecy::{ExposeSecret, SecretString};

/// Compare a caller-supplied token with the configured secret.
pub fn token_matches(expected: &SecretString, given: &str) -> bool {
    constant_time_eq(expected.expose_secret(), given)
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Extract the token from an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
