//! Request/response transport for the transfer protocol
//!
//! A [`Transport`] moves single lines of text in both directions. The
//! production implementation is [`LineTransport`] over a TCP stream, but any
//! `AsyncRead + AsyncWrite` byte stream works, which is how the tests drive
//! coordinator and participant through in-memory pipes.

mod error;
mod line;

pub use error::{Result, TransportError};
pub use line::{LineTransport, MAX_LINE_LENGTH};

use async_trait::async_trait;

/// A synchronous request/response channel carrying one line per message
#[async_trait]
pub trait Transport: Send {
    /// Send one message; the line terminator is added by the transport
    async fn send(&mut self, line: &str) -> Result<()>;

    /// Wait for the next message from the peer
    async fn receive(&mut self) -> Result<String>;

    /// Human-readable peer description for log lines
    fn peer(&self) -> &str;
}
