//! devdns domain layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod dns_response;
pub mod domain_name;
pub mod errors;
pub mod upstream_endpoint;
pub mod zone_file;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_query::{DnsQuery, Transport};
pub use dns_record::{DnsRecord, RecordData, RecordType};
pub use dns_response::{DnsResponse, ResponseCode};
pub use domain_name::DomainName;
pub use errors::DomainError;
pub use upstream_endpoint::{UpstreamAddr, UpstreamEndpoint, UpstreamProtocol};
pub use zone_file::{ZoneEntry, ZoneFile, ZoneFormat};
