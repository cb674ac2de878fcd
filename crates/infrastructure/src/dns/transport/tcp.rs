//! TCP transport for upstream queries, plus the two-byte length framing
//! shared with the TCP listener (RFC 1035 §4.2.2).

use super::{transport_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use devdns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

pub const MAX_TCP_MESSAGE_SIZE: usize = 65535;

pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn exchange(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        let mut stream = TcpStream::connect(self.server_addr)
            .await
            .map_err(|e| transport_error(self.server_addr, format!("connect failed: {}", e)))?;
        stream
            .set_nodelay(true)
            .map_err(|e| transport_error(self.server_addr, e))?;

        send_with_length_prefix(&mut stream, message_bytes)
            .await
            .map_err(|e| transport_error(self.server_addr, e))?;
        debug!(server = %self.server_addr, message_len = message_bytes.len(), "TCP query sent");

        let response = read_with_length_prefix(&mut stream)
            .await
            .map_err(|e| transport_error(self.server_addr, e))?;
        debug!(server = %self.server_addr, response_len = response.len(), "TCP response received");
        Ok(response)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let bytes = tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| DomainError::QueryTimeout)??;

        Ok(TransportResponse {
            bytes,
            protocol_used: "TCP",
        })
    }
}

/// Writes `message_bytes` preceded by its big-endian length.
pub async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), std::io::Error>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "message of {} bytes exceeds {} byte limit",
                message_bytes.len(),
                MAX_TCP_MESSAGE_SIZE
            ),
        )
    })?;

    stream.write_all(&length.to_be_bytes()).await?;
    stream.write_all(message_bytes).await?;
    stream.flush().await
}

/// Reads one length-prefixed message.
pub async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, std::io::Error>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let message_len = u16::from_be_bytes(len_buf) as usize;
    let mut message = vec![0u8; message_len];
    stream.read_exact(&mut message).await?;
    Ok(message)
}
