use crate::ports::UpstreamClient;
use crate::services::ZoneHandle;
use devdns_domain::{DnsQuery, DnsRecord, DnsResponse, RecordType, ResponseCode};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// TTLs applied at answer time to zone records that do not set their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlDefaults {
    pub default_ttl: u32,
    pub ns_soa_ttl: u32,
}

impl TtlDefaults {
    pub fn for_type(&self, record_type: RecordType) -> u32 {
        match record_type {
            RecordType::NS | RecordType::SOA => self.ns_soa_ttl,
            _ => self.default_ttl,
        }
    }
}

impl Default for TtlDefaults {
    fn default() -> Self {
        Self {
            default_ttl: 300,
            ns_soa_ttl: 86_400,
        }
    }
}

/// Answers from the local zone, falling back to the upstream client for
/// names the zone does not own.
pub struct Resolver {
    zone: Arc<ZoneHandle>,
    upstream: Option<Arc<dyn UpstreamClient>>,
    ttl: TtlDefaults,
}

impl Resolver {
    pub fn new(zone: Arc<ZoneHandle>, upstream: Option<Arc<dyn UpstreamClient>>) -> Self {
        Self {
            zone,
            upstream,
            ttl: TtlDefaults::default(),
        }
    }

    pub fn with_ttl_defaults(mut self, ttl: TtlDefaults) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn zone(&self) -> &Arc<ZoneHandle> {
        &self.zone
    }

    /// Never fails: every problem is turned into a response code.
    pub async fn resolve(&self, query: &DnsQuery) -> DnsResponse {
        let start = Instant::now();
        let store = self.zone.snapshot();

        if !store.has(&query.name) {
            return self.forward(query, start).await;
        }

        match store.lookup(&query.name, query.record_type) {
            Ok(records) => {
                debug!(
                    domain = %query.name,
                    record_type = %query.record_type,
                    answers = records.len(),
                    "Answered from zone"
                );
                DnsResponse::local_answer(self.with_default_ttls(records))
            }
            Err(e) => {
                warn!(
                    domain = %query.name,
                    record_type = %query.record_type,
                    error = %e,
                    "Zone lookup failed"
                );
                DnsResponse::servfail()
            }
        }
    }

    async fn forward(&self, query: &DnsQuery, start: Instant) -> DnsResponse {
        let Some(upstream) = &self.upstream else {
            debug!(domain = %query.name, "Name not in zone and no upstream configured");
            return DnsResponse::new(ResponseCode::NoError);
        };

        match upstream.forward(query).await {
            Ok(response) => {
                debug!(
                    domain = %query.name,
                    record_type = %query.record_type,
                    rcode = %response.response_code,
                    answers = response.records.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Forwarded upstream"
                );
                response
            }
            Err(e) => {
                warn!(
                    domain = %query.name,
                    record_type = %query.record_type,
                    error = %e,
                    kind = e.kind(),
                    "Upstream forwarding failed"
                );
                DnsResponse::servfail()
            }
        }
    }

    fn with_default_ttls(&self, records: Vec<DnsRecord>) -> Vec<DnsRecord> {
        records
            .into_iter()
            .map(|mut record| {
                if record.ttl.is_none() {
                    record.ttl = Some(self.ttl.for_type(record.record_type()));
                }
                record
            })
            .collect()
    }
}
