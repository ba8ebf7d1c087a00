//! Hostname resolution: turn a `HostEntry`'s hostname into a numeric address
//! the Driver can dial directly, using the platform resolver (the same role
//! Go's `net` package plays inside `ssh.Dial("tcp", ...)`).

use std::fmt;
use std::net::ToSocketAddrs;

use crate::hostlist::HostEntry;

/// One resolved, driver-ready target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub username: String,
    pub address: String,
    /// The original hostname or address literal, kept for reporting.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    pub host: String,
    pub cause: String,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not resolve {}: {}", self.host, self.cause)
    }
}

impl std::error::Error for ResolveError {}

/// Resolves one `HostEntry` to a numeric address via `port`. Failure is
/// per-target: the caller is expected to skip this target and continue the
/// host-list run rather than abort.
pub fn resolve(entry: &HostEntry, port: &str) -> Result<ResolvedTarget, ResolveError> {
    let lookup = format!("{}:{}", entry.host, port);
    let mut addrs = lookup.to_socket_addrs().map_err(|e| ResolveError {
        host: entry.host.clone(),
        cause: e.to_string(),
    })?;
    let addr = addrs.next().ok_or_else(|| ResolveError {
        host: entry.host.clone(),
        cause: "resolver returned no addresses".to_string(),
    })?;
    Ok(ResolvedTarget {
        username: entry.username.clone(),
        address: addr.ip().to_string(),
        label: entry.host.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_numeric_address_as_itself() {
        let entry = HostEntry { username: "root".to_string(), host: "127.0.0.1".to_string() };
        let resolved = resolve(&entry, "22").unwrap();
        assert_eq!(resolved.address, "127.0.0.1");
        assert_eq!(resolved.username, "root");
        assert_eq!(resolved.label, "127.0.0.1");
    }

    #[test]
    fn unresolvable_host_is_a_resolve_error_not_a_panic() {
        let entry = HostEntry {
            username: "root".to_string(),
            host: "this.host.does.not.exist.invalid".to_string(),
        };
        let result = resolve(&entry, "22");
        assert!(result.is_err());
    }
}
