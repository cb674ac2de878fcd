use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use crate::dns::transport;
use devdns_domain::{DnsQuery, DnsResponse, DomainError, UpstreamEndpoint, UpstreamProtocol};
use std::time::{Duration, Instant};
use tracing::debug;

/// Sends `query` to one upstream and decodes its reply.
///
/// A truncated UDP reply is retried over TCP against the same server within
/// what is left of `timeout`.
pub async fn query_endpoint(
    endpoint: &UpstreamEndpoint,
    query: &DnsQuery,
    timeout: Duration,
) -> Result<DnsResponse, DomainError> {
    let start = Instant::now();
    let server_addr = endpoint
        .socket_addr()
        .ok_or_else(|| DomainError::Transport {
            server: endpoint.addr.to_string(),
            reason: "address not resolved".to_string(),
        })?;

    let (id, query_bytes) = MessageBuilder::build_query_with_id(query)?;

    let transport = transport::create_transport(endpoint.protocol, server_addr);
    let reply = transport.send(&query_bytes, timeout).await?;
    debug!(server = %server_addr, protocol = reply.protocol_used, bytes = reply.bytes.len(), "Upstream replied");
    let response = ResponseParser::parse(&reply.bytes, id)?;

    if !response.truncated || endpoint.protocol != UpstreamProtocol::Udp {
        return Ok(response);
    }

    debug!(server = %server_addr, "Response truncated (TC bit), retrying via TCP");
    let remaining = timeout.saturating_sub(start.elapsed());
    if remaining.is_zero() {
        return Err(DomainError::QueryTimeout);
    }

    let tcp = transport::create_transport(UpstreamProtocol::Tcp, server_addr);
    let reply = tcp.send(&query_bytes, remaining).await?;
    debug!(server = %server_addr, protocol = reply.protocol_used, bytes = reply.bytes.len(), "Upstream replied");
    ResponseParser::parse(&reply.bytes, id)
}
