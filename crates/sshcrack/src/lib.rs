//! sshcrack: a bounded worker pool and a dictionary-attack driver for
//! discovering which candidate secret, if any, authenticates against a
//! remote SSH endpoint.

pub mod classify;
pub mod config;
pub mod dialer;
pub mod driver;
pub mod hostlist;
pub mod pool;
pub mod report;
pub mod resolve;
pub mod wordlist;

pub use classify::{is_auth_rejection, DialError, Dialer, AUTH_MARKER};
pub use config::{CliOverrides, ConfigError, Mode, RunConfig, RunConfigFile};
pub use dialer::Ssh2Dialer;
pub use driver::{run as run_dictionary_attack, AttemptOptions, DriverError, DEFAULT_PORT};
pub use hostlist::{HostEntry, HostlistError};
pub use pool::{Pool, PoolError, Task};
pub use resolve::{resolve, ResolveError, ResolvedTarget};
