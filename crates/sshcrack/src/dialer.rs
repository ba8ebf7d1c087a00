//! Real `Dialer` implementation, wrapping the synchronous `ssh2` crate
//! (a libssh2 binding). Synchronous matches the thread-per-executor pool
//! exactly — no async runtime appears anywhere in this crate.

use std::net::TcpStream;
use std::time::Duration;

use ssh2::Session;

use crate::classify::{DialError, Dialer, AUTH_MARKER};

/// The production `Dialer`: real TCP + real SSH handshake + real password
/// authentication. Host-key verification is never performed — the crate's
/// session API has no verification step unless the caller opts into one.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ssh2Dialer;

impl Dialer for Ssh2Dialer {
    fn dial(
        &self,
        address: &str,
        port: &str,
        username: &str,
        secret: &str,
        timeout: Duration,
    ) -> Result<(), DialError> {
        let addr = format!("{address}:{port}");
        let socket_addr = addr
            .parse()
            .map_err(|e| DialError::transport(format!("invalid address {addr}: {e}")))?;
        let tcp = TcpStream::connect_timeout(&socket_addr, timeout)
            .map_err(|e| DialError::transport(format!("dial tcp: {e}")))?;

        let mut session = Session::new().map_err(|e| DialError::transport(format!("ssh session init: {e}")))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(timeout.as_millis().min(u32::MAX as u128) as u32);

        session
            .handshake()
            .map_err(|e| DialError::transport(format!("ssh handshake: {e}")))?;

        match session.userauth_password(username, secret) {
            Ok(()) => {
                let _ = session.disconnect(None, "done", None);
                Ok(())
            }
            Err(e) => {
                if is_auth_error(&e) {
                    Err(DialError::auth(format!("{AUTH_MARKER}: {e}")))
                } else {
                    Err(DialError::transport(format!("ssh authentication: {e}")))
                }
            }
        }
    }
}

/// `ssh2::ErrorCode::Session(-18)` is libssh2's `LIBSSH2_ERROR_AUTHENTICATION_FAILED`,
/// the typed discriminator preferred over the textual substring match
/// whenever the library exposes it.
fn is_auth_error(err: &ssh2::Error) -> bool {
    match err.code() {
        ssh2::ErrorCode::Session(-18) => true,
        _ => err.message().contains("authentication"),
    }
}
