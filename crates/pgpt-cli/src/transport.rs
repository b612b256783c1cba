//! TCP transport for command envelopes.
//!
//! Each call to [`Transport::send`] opens a fresh connection, writes the
//! payload in one piece, reads one reply through the configured
//! [`FramingPolicy`], and drops the stream before returning.

use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use pgpt_config::Config;
use thiserror::Error;
use tracing::{debug, warn};

use crate::command::ServerAddress;
use crate::framing::{FramingPolicy, framing_for};

/// Failures between opening the connection and decoding the reply.
#[derive(Debug, Error)]
pub(crate) enum TransportError {
    #[error("failed to resolve server address {address}: {source}")]
    Resolve { address: String, source: io::Error },
    #[error("failed to connect to server at {address}: {source}")]
    Connect { address: String, source: io::Error },
    #[error("failed to configure connection to {address}: {source}")]
    Configure { address: String, source: io::Error },
    #[error("failed to serialise command request: {0}")]
    Serialise(#[source] serde_json::Error),
    #[error("failed to send request: {0}")]
    Send(#[source] io::Error),
    #[error("failed to read response: {0}")]
    Read(#[source] io::Error),
    #[error("no response from server")]
    EmptyResponse,
    #[error("response is not valid UTF-8: {0}")]
    InvalidUtf8(#[source] std::string::FromUtf8Error),
}

/// Sends one serialised request and returns the reply text.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Transport {
    /// Delivers `payload` to `address` over a dedicated connection.
    fn send(&self, address: &ServerAddress, payload: &[u8]) -> Result<String, TransportError>;
}

pub(crate) struct TcpTransport {
    framing: Box<dyn FramingPolicy>,
    timeout: Option<Duration>,
}

impl TcpTransport {
    pub(crate) fn new(framing: Box<dyn FramingPolicy>, timeout: Option<Duration>) -> Self {
        Self { framing, timeout }
    }

    pub(crate) fn from_config(config: &Config) -> Self {
        Self::new(
            framing_for(config.framing(), config.read_buffer_size()),
            config.io_timeout(),
        )
    }

    fn connect(&self, address: &ServerAddress) -> Result<TcpStream, TransportError> {
        let display = address.to_string();
        let resolved =
            resolve_tcp_address(&address.host, address.port).map_err(|source| {
                TransportError::Resolve {
                    address: display.clone(),
                    source,
                }
            })?;

        let connected = match self.timeout {
            Some(timeout) => TcpStream::connect_timeout(&resolved, timeout),
            None => TcpStream::connect(resolved),
        };
        let stream = connected.map_err(|source| TransportError::Connect {
            address: display.clone(),
            source,
        })?;

        stream
            .set_read_timeout(self.timeout)
            .and_then(|()| stream.set_write_timeout(self.timeout))
            .map_err(|source| TransportError::Configure {
                address: display,
                source,
            })?;
        Ok(stream)
    }
}

impl Transport for TcpTransport {
    fn send(&self, address: &ServerAddress, payload: &[u8]) -> Result<String, TransportError> {
        let mut stream = self.connect(address)?;
        debug!(%address, bytes = payload.len(), "connected; sending request");

        stream.write_all(payload).map_err(TransportError::Send)?;
        stream.flush().map_err(TransportError::Send)?;

        let reply = self
            .framing
            .read_message(&mut stream)
            .map_err(TransportError::Read)?;
        debug!(%address, bytes = reply.len(), "response received");

        if reply.is_empty() {
            warn!(%address, "server closed the connection without replying");
            return Err(TransportError::EmptyResponse);
        }
        String::from_utf8(reply).map_err(TransportError::InvalidUtf8)
    }
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    let mut addrs = (host, port).to_socket_addrs()?;
    addrs
        .find(|addr| matches!(addr, SocketAddr::V4(_) | SocketAddr::V6(_)))
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}
