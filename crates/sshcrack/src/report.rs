//! Pure string-formatting for per-host results. No I/O lives here — the CLI
//! binary decides where these lines go (terminal, file, or both) and how to
//! color them.

/// `Host: <user>@<addr> | Secret: <secret>`, mirroring the original's
/// `Host: '%s' | Pass: '%s'\n`.
pub fn success_line(username: &str, label: &str, secret: &str) -> String {
    format!("Host: {username}@{label} | Secret: {secret}")
}

/// The dictionary was exhausted without a match.
pub fn exhausted_line(username: &str, label: &str) -> String {
    format!("Host: {username}@{label} | exhausted")
}

/// A non-auth failure aborted the attempt.
pub fn transport_failure_line(username: &str, label: &str, cause: &str) -> String {
    format!("Host: {username}@{label} | unreachable: {cause}")
}

/// A per-target hostname resolution failure (never reaches the Driver).
pub fn resolution_failure_line(host: &str, cause: &str) -> String {
    format!("Host: {host} | could not resolve: {cause}")
}
