//! Error classifier: distinguish an authentication rejection from anything
//! else a dial attempt can fail with.
//!
//! The underlying SSH library signals authentication failure via a stable
//! human-readable prefix, but richer structured errors aren't universally
//! available across SSH client implementations. [`DialError`] therefore
//! carries an optional typed hint (`auth_rejected`); [`is_auth_rejection`]
//! prefers it when present and falls back to substring-matching the textual
//! error against [`AUTH_MARKER`] otherwise.

use std::time::Duration;

/// Marker substring an SSH client surfaces in an authentication rejection.
/// Any error whose text contains this substring is an auth rejection;
/// anything else (including no match) is a transport failure.
pub const AUTH_MARKER: &str = "ssh: unable to authenticate";

/// A classified dial failure.
#[derive(Debug, Clone)]
pub struct DialError {
    /// Human-readable description, propagated unchanged into
    /// `TransportFailure` when the error turns out not to be auth-related.
    pub message: String,
    /// `Some(true)`/`Some(false)` when the dialer can discriminate the cause
    /// directly (e.g. from a typed SSH error code); `None` when only the
    /// textual form is available and the substring fallback should decide.
    pub auth_rejected: Option<bool>,
}

impl DialError {
    /// Build a `DialError` the dialer has typed-discriminated as an auth
    /// rejection.
    pub fn auth(message: impl Into<String>) -> Self {
        DialError {
            message: message.into(),
            auth_rejected: Some(true),
        }
    }

    /// Build a `DialError` the dialer has typed-discriminated as a non-auth
    /// transport failure.
    pub fn transport(message: impl Into<String>) -> Self {
        DialError {
            message: message.into(),
            auth_rejected: Some(false),
        }
    }

    /// Build a `DialError` with only a textual form; classification falls
    /// back to the `AUTH_MARKER` substring match.
    pub fn untyped(message: impl Into<String>) -> Self {
        DialError {
            message: message.into(),
            auth_rejected: None,
        }
    }
}

impl std::fmt::Display for DialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DialError {}

/// Returns `true` if `err` represents an authentication rejection (the secret
/// was wrong but the server is reachable and speaking the expected protocol),
/// `false` for anything else (unreachable, timeout, handshake error,
/// resolution error).
pub fn is_auth_rejection(err: &DialError) -> bool {
    err.auth_rejected
        .unwrap_or_else(|| err.message.contains(AUTH_MARKER))
}

/// The external SSH-client primitive: attempt TCP connect + SSH handshake +
/// password authentication, reporting success or a classified failure. On
/// success the implementation must have already closed the connection.
pub trait Dialer: Send + Sync {
    fn dial(
        &self,
        address: &str,
        port: &str,
        username: &str,
        secret: &str,
        timeout: Duration,
    ) -> Result<(), DialError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_auth_rejection_overrides_text() {
        let err = DialError::auth("anything, even without the marker");
        assert!(is_auth_rejection(&err));
    }

    #[test]
    fn typed_transport_failure_overrides_text_even_with_marker() {
        // A dialer that knows better than the substring heuristic wins.
        let err = DialError::transport(format!("{AUTH_MARKER} but actually not"));
        assert!(!is_auth_rejection(&err));
    }

    #[test]
    fn untyped_falls_back_to_substring_match_positive() {
        let err = DialError::untyped(format!(
            "ssh: handshake failed: {AUTH_MARKER}, attempted methods [password]"
        ));
        assert!(is_auth_rejection(&err));
    }

    #[test]
    fn untyped_falls_back_to_substring_match_negative() {
        let err = DialError::untyped("dial tcp: connection refused");
        assert!(!is_auth_rejection(&err));
    }
}
