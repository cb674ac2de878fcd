mod upstream_client;

pub use upstream_client::UpstreamClient;

// Re-export for convenience
pub use devdns_domain::DnsQuery;
