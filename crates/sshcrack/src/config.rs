//! Merged run configuration: an optional TOML config file overlaid with
//! command-line overrides, matching the reference implementation's
//! `loadcfg.go` field set but loaded as TOML via `serde` rather than YAML via
//! `viper` (see `DESIGN.md`).

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Which kind of run this invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// A single `--host USER@ADDRESS` target.
    Single,
    /// A file of targets, one per line.
    Hostlist,
}

impl Mode {
    fn parse(s: &str) -> Option<Mode> {
        match s {
            "single" => Some(Mode::Single),
            "hostlist" => Some(Mode::Hostlist),
            _ => None,
        }
    }
}

/// The on-disk shape of the optional TOML config file. Every field is
/// optional here; absence means "fall through to a CLI flag or a default",
/// resolved in [`RunConfig::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfigFile {
    pub mode: Option<String>,
    pub port: Option<String>,
    pub concurrency: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub wordlist_path: Option<String>,
    pub hostlist_path: Option<String>,
    pub verbose: Option<bool>,
    pub output_path: Option<String>,
}

impl RunConfigFile {
    /// Parses a TOML config file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))
    }
}

/// Command-line overrides. `None` means "the flag was not given"; every field
/// mirrors one `clap` flag one-to-one. The single-target `--host` value is
/// parsed by the CLI binary into a `HostEntry` directly and does not live
/// here — it bypasses config-file merging entirely.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub mode: Option<String>,
    pub port: Option<String>,
    pub concurrency: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub wordlist_path: Option<String>,
    pub hostlist_path: Option<String>,
    pub verbose: Option<bool>,
    pub output_path: Option<String>,
}

/// The fully merged, validated settings for one process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: Mode,
    pub port: String,
    pub concurrency: usize,
    pub timeout: Duration,
    pub wordlist_path: String,
    pub hostlist_path: Option<String>,
    pub verbose: bool,
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String, String),
    Parse(String, String),
    /// A required field had no value from either the config file or a flag.
    Missing(&'static str),
    /// A field had a value, but it failed validation. `field` names it.
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, cause) => write!(f, "could not read config file {path}: {cause}"),
            ConfigError::Parse(path, cause) => write!(f, "could not parse config file {path}: {cause}"),
            ConfigError::Missing(field) => write!(f, "missing required setting: {field}"),
            ConfigError::Invalid(field, cause) => write!(f, "invalid {field}: {cause}"),
        }
    }
}

impl std::error::Error for ConfigError {}

const DEFAULT_PORT: &str = "22";
const DEFAULT_CONCURRENCY: usize = 8;
const DEFAULT_TIMEOUT_MS: u64 = 3000;

impl RunConfig {
    /// Merges an optional config file with CLI overrides (flags win) and
    /// validates the result. Missing optional fields fall back to the
    /// defaults declared below (port `22`, concurrency `8`, timeout `3s`).
    pub fn resolve(file: Option<RunConfigFile>, cli: CliOverrides) -> Result<RunConfig, ConfigError> {
        let file = file.unwrap_or_default();

        let mode_str = cli.mode.or(file.mode).ok_or(ConfigError::Missing("mode"))?;
        let mode = Mode::parse(&mode_str)
            .ok_or_else(|| ConfigError::Invalid("mode", format!("{mode_str:?} is not \"single\" or \"hostlist\"")))?;

        let port = cli.port.or(file.port).unwrap_or_else(|| DEFAULT_PORT.to_string());
        if port.is_empty() {
            return Err(ConfigError::Invalid("port", "must not be empty".to_string()));
        }

        let concurrency = cli.concurrency.or(file.concurrency).unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency < 1 {
            return Err(ConfigError::Invalid("concurrency", "must be >= 1".to_string()));
        }

        let timeout_ms = cli.timeout_ms.or(file.timeout_ms).unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms", "must be >= 1".to_string()));
        }

        let wordlist_path = cli
            .wordlist_path
            .or(file.wordlist_path)
            .ok_or(ConfigError::Missing("wordlist_path"))?;

        let hostlist_path = cli.hostlist_path.or(file.hostlist_path);
        if mode == Mode::Hostlist && hostlist_path.is_none() {
            return Err(ConfigError::Missing("hostlist_path"));
        }

        let verbose = cli.verbose.or(file.verbose).unwrap_or(false);
        let output_path = cli.output_path.or(file.output_path);

        Ok(RunConfig {
            mode,
            port,
            concurrency,
            timeout: Duration::from_millis(timeout_ms),
            wordlist_path,
            hostlist_path,
            verbose,
            output_path,
        })
    }
}
