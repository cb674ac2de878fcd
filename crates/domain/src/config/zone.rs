use crate::zone_file::ZoneFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZoneConfig {
    /// Zone file; no file means an empty zone and every query is proxied.
    #[serde(default)]
    pub file: Option<String>,

    /// Forces the zone file format instead of guessing from the extension.
    #[serde(default)]
    pub format: Option<ZoneFormat>,

    #[serde(default = "default_ttl")]
    pub default_ttl: u32,

    /// TTL for NS and SOA records that do not set one.
    #[serde(default = "default_ns_soa_ttl")]
    pub ns_soa_ttl: u32,

    #[serde(default = "default_max_cname_hops")]
    pub max_cname_hops: usize,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            file: None,
            format: None,
            default_ttl: default_ttl(),
            ns_soa_ttl: default_ns_soa_ttl(),
            max_cname_hops: default_max_cname_hops(),
        }
    }
}

fn default_ttl() -> u32 {
    300
}

fn default_ns_soa_ttl() -> u32 {
    3600 * 24
}

fn default_max_cname_hops() -> usize {
    8
}
