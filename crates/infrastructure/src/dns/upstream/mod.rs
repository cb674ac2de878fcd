mod failover;
mod query;

pub use failover::FailoverUpstreamClient;
pub use query::query_endpoint;

use devdns_domain::{DomainError, UpstreamEndpoint};
use tracing::{info, warn};

/// Resolves hostname upstreams to socket addresses, keeping the
/// configured order. A hostname that does not resolve is an error.
pub async fn resolve_endpoints(
    endpoints: Vec<UpstreamEndpoint>,
) -> Result<Vec<UpstreamEndpoint>, DomainError> {
    let mut resolved = Vec::with_capacity(endpoints.len());

    for endpoint in endpoints {
        let Some((hostname, port)) = endpoint.addr.unresolved_parts() else {
            resolved.push(endpoint);
            continue;
        };

        let mut addrs = tokio::net::lookup_host((hostname, port)).await.map_err(|e| {
            DomainError::InvalidUpstream(format!("cannot resolve '{}': {}", hostname, e))
        })?;
        let Some(addr) = addrs.next() else {
            warn!(upstream = %endpoint, "Upstream hostname resolved to no address");
            return Err(DomainError::InvalidUpstream(format!(
                "'{}' resolved to no address",
                hostname
            )));
        };

        info!(upstream = %endpoint, resolved = %addr, "Upstream hostname resolved");
        resolved.push(endpoint.with_resolved_addr(addr));
    }

    Ok(resolved)
}
