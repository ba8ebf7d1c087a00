//! Dictionary-attack driver: attempt every candidate secret against one
//! target, short-circuiting on the first success, and distinguishing benign
//! authentication rejection from a fatal transport failure.
//!
//! ## Serial vs. parallel
//!
//! `concurrency == 1` iterates candidates in input order on the calling
//! thread and is the only mode that guarantees earliest-candidate-wins.
//! `concurrency > 1` fans the candidates out across a [`Pool`] of that size;
//! whichever candidate succeeds first wins, with no deterministic tie-break
//! (see `DESIGN.md`'s Open Question).
//!
//! ## The three-way race, the Rust way
//!
//! The historical Go implementation arbitrates three events — a password
//! found, a non-auth error, or every worker finishing without either — with
//! a `select` over two channels plus a `sync.WaitGroup`, and must send to the
//! error channel with a non-blocking `select`/`default` because an unbuffered
//! Go channel send blocks forever without a receiver.
//!
//! `std::sync::mpsc::Sender::send` has no such hazard: it never blocks, it
//! only fails once every receiver is gone. That lets this driver collapse the
//! three-way race into a single channel of a two-variant [`Event`] enum and a
//! single blocking `recv()`: every task clones the sender, and a task that
//! hits an auth rejection simply returns without sending anything. Once every
//! clone has been dropped without anyone sending an `Event`, `recv()` returns
//! `Err` — no explicit atomic completion counter is needed, because channel
//! closure already *is* "every task has finished and none of them won".

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use crate::classify::{is_auth_rejection, Dialer};
use crate::pool::{Pool, PoolError};

/// Inputs to one [`run`] invocation. Value-like; validated once at the start
/// of `run`.
#[derive(Debug, Clone)]
pub struct AttemptOptions {
    /// Already-resolved numeric IPv4 or IPv6 address.
    pub address: String,
    /// Decimal port string. Empty defaults to the standard SSH port (`"22"`).
    pub port: String,
    pub username: String,
    /// Candidate secrets, attempted in this order in serial mode. Duplicates
    /// and blank entries are permitted.
    pub secrets: Vec<String>,
    /// Number of concurrent dial attempts. `1` selects serial mode.
    pub concurrency: usize,
    /// Per-dial timeout, passed through to the dialer unchanged.
    pub timeout: Duration,
}

/// The standard SSH port, used when `AttemptOptions::port` is empty.
pub const DEFAULT_PORT: &str = "22";

/// Errors `run` can return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// A precondition on `AttemptOptions` was violated. `field` names which
    /// one, e.g. `"address"`, `"username"`, `"concurrency"`, `"timeout"`.
    InvalidInput(&'static str),
    /// Every candidate was rejected as an authentication failure.
    AuthenticationExhausted,
    /// A non-auth dial failure was observed; the underlying cause is
    /// attached as context.
    TransportFailure(String),
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverError::InvalidInput(field) => write!(f, "invalid input: {field}"),
            DriverError::AuthenticationExhausted => {
                write!(f, "unable to authenticate: dictionary exhausted")
            }
            DriverError::TransportFailure(cause) => write!(f, "unable to connect: {cause}"),
        }
    }
}

impl std::error::Error for DriverError {}

impl From<PoolError> for DriverError {
    fn from(_: PoolError) -> Self {
        // The driver builds and drives the pool itself; a PoolError here
        // would indicate a bug in this module, not a caller input error.
        // Surfacing it as exhaustion would be misleading, so route it
        // through a dedicated field name instead.
        DriverError::InvalidInput("concurrency")
    }
}

/// Attempt every candidate secret in `opts` against one target, returning the
/// first secret that authenticates or a classified error.
pub fn run(mut opts: AttemptOptions, dialer: Arc<dyn Dialer>) -> Result<String, DriverError> {
    if opts.address.is_empty() {
        return Err(DriverError::InvalidInput("address"));
    }
    if opts.port.is_empty() {
        opts.port = DEFAULT_PORT.to_string();
    }
    if opts.username.is_empty() {
        return Err(DriverError::InvalidInput("username"));
    }
    // `secrets: Vec<String>` has no nil state in Rust the way the original
    // `[]string` does (a Vec is never "unset", only possibly empty); an
    // empty dictionary simply exhausts immediately below. See DESIGN.md.
    if opts.concurrency < 1 {
        return Err(DriverError::InvalidInput("concurrency"));
    }
    if opts.timeout.is_zero() {
        return Err(DriverError::InvalidInput("timeout"));
    }

    if opts.concurrency == 1 {
        run_serial(&opts, dialer.as_ref())
    } else {
        run_parallel(&opts, dialer)
    }
}

fn run_serial(opts: &AttemptOptions, dialer: &dyn Dialer) -> Result<String, DriverError> {
    for secret in &opts.secrets {
        match dialer.dial(&opts.address, &opts.port, &opts.username, secret, opts.timeout) {
            Ok(()) => return Ok(secret.clone()),
            Err(e) if is_auth_rejection(&e) => continue,
            Err(e) => return Err(DriverError::TransportFailure(e.message)),
        }
    }
    Err(DriverError::AuthenticationExhausted)
}

enum Event {
    Secret(String),
    Error(String),
}

fn run_parallel(opts: &AttemptOptions, dialer: Arc<dyn Dialer>) -> Result<String, DriverError> {
    let pool = Pool::new(opts.concurrency)?;
    let (tx, rx) = mpsc::channel::<Event>();

    for secret in &opts.secrets {
        let dialer = Arc::clone(&dialer);
        let address = opts.address.clone();
        let port = opts.port.clone();
        let username = opts.username.clone();
        let secret = secret.clone();
        let timeout = opts.timeout;
        let tx = tx.clone();
        pool.queue(Box::new(move || {
            match dialer.dial(&address, &port, &username, &secret, timeout) {
                Ok(()) => {
                    // Blocking send is fine: the driver is always selecting
                    // on this channel for as long as any task might still
                    // win.
                    let _ = tx.send(Event::Secret(secret));
                }
                Err(e) if is_auth_rejection(&e) => {
                    // Absorbed locally; nothing to report.
                }
                Err(e) => {
                    // send() cannot block (mpsc never blocks); if the
                    // receiver is already gone this is a no-op, which is
                    // exactly the "drop subsequent errors" behavior the
                    // non-blocking-send invariant asks for.
                    let _ = tx.send(Event::Error(e.message));
                }
            }
        }))?;
    }
    // Drop the driver's own sender clone so the channel closes once every
    // queued task has run and returned without sending.
    drop(tx);

    pool.start()?;
    let outcome = match rx.recv() {
        Ok(Event::Secret(secret)) => Ok(secret),
        Ok(Event::Error(cause)) => Err(DriverError::TransportFailure(cause)),
        Err(_) => Err(DriverError::AuthenticationExhausted),
    };
    pool.close()?;
    outcome
}
