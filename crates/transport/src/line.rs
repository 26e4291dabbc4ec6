//! Newline-delimited framing over any byte stream

use crate::error::{Result, TransportError};
use crate::Transport;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LinesCodec};

/// Longest line accepted from a peer
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Line-framed session over a byte stream
pub struct LineTransport<S> {
    framed: Framed<S, LinesCodec>,
    peer: String,
}

impl<S> LineTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an established stream
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            framed: Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)),
            peer: peer.into(),
        }
    }
}

impl LineTransport<TcpStream> {
    /// Connect to `host:port`
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{}:{}", host, port);
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|source| TransportError::Connect {
                addr: addr.clone(),
                source,
            })?;
        stream.set_nodelay(true)?;

        tracing::debug!(peer = %addr, "Connection established");
        Ok(Self::new(stream, addr))
    }
}

#[async_trait]
impl<S> Transport for LineTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, line: &str) -> Result<()> {
        self.framed.send(line).await?;
        Ok(())
    }

    async fn receive(&mut self) -> Result<String> {
        match self.framed.next().await {
            Some(line) => Ok(line?),
            None => Err(TransportError::Closed),
        }
    }

    fn peer(&self) -> &str {
        &self.peer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lines_round_trip_over_pipe() {
        let (left, right) = tokio::io::duplex(1024);
        let mut client = LineTransport::new(left, "participant");
        let mut server = LineTransport::new(right, "coordinator");

        client.send("VOTE-REQUEST alice -30").await.unwrap();
        assert_eq!(server.receive().await.unwrap(), "VOTE-REQUEST alice -30");

        server.send("VOTE-COMMIT").await.unwrap();
        assert_eq!(client.receive().await.unwrap(), "VOTE-COMMIT");
        assert_eq!(client.peer(), "participant");
    }

    #[tokio::test]
    async fn test_receive_after_hangup_is_closed() {
        let (left, right) = tokio::io::duplex(1024);
        let mut client = LineTransport::new(left, "participant");
        drop(right);

        assert!(matches!(
            client.receive().await,
            Err(TransportError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_tcp_connect_and_exchange() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (stream, peer) = listener.accept().await.unwrap();
            let mut session = LineTransport::new(stream, peer.to_string());
            let line = session.receive().await.unwrap();
            session.send(&format!("echo {}", line)).await.unwrap();
        });

        let mut client = LineTransport::connect("127.0.0.1", port).await.unwrap();
        client.send("ping").await.unwrap();
        assert_eq!(client.receive().await.unwrap(), "echo ping");
        assert_eq!(client.peer(), format!("127.0.0.1:{}", port));

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = LineTransport::connect("127.0.0.1", port).await.err().unwrap();
        assert!(matches!(err, TransportError::Connect { .. }));
    }
}
