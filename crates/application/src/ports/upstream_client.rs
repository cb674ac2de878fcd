use async_trait::async_trait;
use devdns_domain::{DnsQuery, DnsResponse, DomainError};

/// Forwards a query to external resolvers.
///
/// Implementations return the first upstream reply unmodified, including
/// NXDOMAIN and SERVFAIL replies. An error means no upstream produced a
/// usable reply at all.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn forward(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError>;
}
