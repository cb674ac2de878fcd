//! UDP transport for upstream queries (RFC 1035 §4.2.1).
//!
//! Messages are sent as-is, no framing. A reply with the TC bit set is
//! retried over TCP by the caller.

use super::{transport_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use devdns_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Largest reply accepted over UDP (EDNS(0) payload size).
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let bind_addr = if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| transport_error(self.server_addr, format!("bind failed: {}", e)))?;

        let exchange = async {
            let bytes_sent = socket
                .send_to(message_bytes, self.server_addr)
                .await
                .map_err(|e| transport_error(self.server_addr, format!("send failed: {}", e)))?;
            debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

            let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
            loop {
                let (bytes_received, from_addr) = socket
                    .recv_from(&mut recv_buf)
                    .await
                    .map_err(|e| {
                        transport_error(self.server_addr, format!("receive failed: {}", e))
                    })?;

                if from_addr != self.server_addr {
                    warn!(
                        expected = %self.server_addr,
                        received_from = %from_addr,
                        "UDP response from unexpected source"
                    );
                    continue;
                }

                recv_buf.truncate(bytes_received);
                debug!(server = %self.server_addr, bytes_received, "UDP response received");
                return Ok(recv_buf);
            }
        };

        let bytes = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| DomainError::QueryTimeout)??;

        Ok(TransportResponse {
            bytes,
            protocol_used: "UDP",
        })
    }
}
