use devdns_application::ports::UpstreamClient;
use devdns_application::services::{RecordStore, ZoneHandle};
use devdns_application::use_cases::{Resolver, TtlDefaults};
use devdns_domain::Config;
use devdns_infrastructure::dns::upstream::resolve_endpoints;
use devdns_infrastructure::dns::{FailoverUpstreamClient, QueryHandler};
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub zone: Arc<ZoneHandle>,
    pub handler: QueryHandler,
}

impl DnsServices {
    pub async fn new(config: &Config, store: RecordStore) -> anyhow::Result<Self> {
        let zone = Arc::new(ZoneHandle::new(store));
        let upstream = Self::build_upstream(config).await?;

        let ttl = TtlDefaults {
            default_ttl: config.zone.default_ttl,
            ns_soa_ttl: config.zone.ns_soa_ttl,
        };
        let resolver = Resolver::new(zone.clone(), upstream).with_ttl_defaults(ttl);

        Ok(Self {
            zone,
            handler: QueryHandler::new(Arc::new(resolver)),
        })
    }

    async fn build_upstream(config: &Config) -> anyhow::Result<Option<Arc<dyn UpstreamClient>>> {
        if !config.upstream.is_enabled() {
            info!("Upstream forwarding disabled");
            return Ok(None);
        }

        let endpoints = resolve_endpoints(config.upstream.endpoints()?).await?;
        info!(
            upstreams = ?endpoints.iter().map(ToString::to_string).collect::<Vec<_>>(),
            timeout_ms = config.upstream.timeout_ms,
            "Upstream forwarding enabled"
        );

        let client = FailoverUpstreamClient::new(endpoints, config.upstream.attempt_timeout())
            .with_total_timeout(config.upstream.total_timeout());
        Ok(Some(Arc::new(client)))
    }
}
