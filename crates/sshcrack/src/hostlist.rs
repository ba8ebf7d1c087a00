//! Host-list ingestion: one target per line, `user@host` or a bare hostname.
//!
//! Grounded on `loadcfg.go`'s `StrToHost`, which splits on the first `@` and
//! otherwise leaves the username unset (the original's `usr_is_host` config
//! knob then decides whether the bare string doubles as the username; here
//! that knob is represented by `default_username` supplied by the caller).

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One line of a host list, before hostname resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub username: String,
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostlistError {
    Io(String),
    /// Line `line_no` (1-indexed) had no resolvable username: it was bare
    /// and no `default_username` was supplied.
    MissingUsername(usize),
}

impl fmt::Display for HostlistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostlistError::Io(cause) => write!(f, "could not read host list: {cause}"),
            HostlistError::MissingUsername(line) => {
                write!(f, "line {line}: no username given and no default username configured")
            }
        }
    }
}

impl std::error::Error for HostlistError {}

/// Parses one line into a `HostEntry`. `user@host` splits on the first `@`;
/// a bare hostname falls back to `default_username`, matching the original's
/// `usr_is_host` behavior when a default is configured.
pub fn parse_line(line: &str, default_username: Option<&str>) -> Result<HostEntry, &'static str> {
    if let Some((user, host)) = line.split_once('@') {
        if user.is_empty() || host.is_empty() {
            return Err("malformed user@host entry");
        }
        Ok(HostEntry {
            username: user.to_string(),
            host: host.to_string(),
        })
    } else {
        match default_username {
            Some(user) => Ok(HostEntry {
                username: user.to_string(),
                host: line.to_string(),
            }),
            None => Err("no username"),
        }
    }
}

/// Reads `path` into an ordered list of `HostEntry`s, one per line, blank
/// lines skipped. Lines lacking a username fail with `MissingUsername` when
/// no `default_username` is configured.
pub fn load(path: &Path, default_username: Option<&str>) -> Result<Vec<HostEntry>, HostlistError> {
    let file = File::open(path).map_err(|e| HostlistError::Io(e.to_string()))?;
    let mut entries = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| HostlistError::Io(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line, default_username) {
            Ok(entry) => entries.push(entry),
            Err(_) => return Err(HostlistError::MissingUsername(idx + 1)),
        }
    }
    Ok(entries)
}
