use super::query::query_endpoint;
use async_trait::async_trait;
use devdns_application::ports::UpstreamClient;
use devdns_domain::{DnsQuery, DnsResponse, DomainError, UpstreamEndpoint};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Tries each upstream in configured order and returns the first reply.
///
/// Every attempt is capped by the per-attempt timeout and by what is left of
/// the total budget for the query.
pub struct FailoverUpstreamClient {
    endpoints: Vec<UpstreamEndpoint>,
    attempt_timeout: Duration,
    total_timeout: Duration,
}

impl FailoverUpstreamClient {
    pub fn new(endpoints: Vec<UpstreamEndpoint>, attempt_timeout: Duration) -> Self {
        let total_timeout = attempt_timeout.saturating_mul(endpoints.len().max(1) as u32);
        Self {
            endpoints,
            attempt_timeout,
            total_timeout,
        }
    }

    pub fn with_total_timeout(mut self, total_timeout: Duration) -> Self {
        self.total_timeout = total_timeout;
        self
    }
}

#[async_trait]
impl UpstreamClient for FailoverUpstreamClient {
    async fn forward(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError> {
        let deadline = Instant::now() + self.total_timeout;
        debug!(
            strategy = "failover",
            servers = self.endpoints.len(),
            domain = %query.name,
            "Trying sequentially"
        );

        for (index, endpoint) in self.endpoints.iter().enumerate() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(domain = %query.name, position = index, "Upstream budget exhausted");
                break;
            }

            match query_endpoint(endpoint, query, self.attempt_timeout.min(remaining)).await {
                Ok(response) => {
                    debug!(upstream = %endpoint, position = index, "Server responded");
                    return Ok(response);
                }
                Err(e) => {
                    warn!(upstream = %endpoint, error = %e, position = index, "Failing over");
                }
            }
        }

        Err(DomainError::UpstreamUnreachable)
    }
}
