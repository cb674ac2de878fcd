use super::{RecordData, RecordType};
use crate::domain_name::DomainName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    pub name: DomainName,

    /// `None` when the zone entry did not set a TTL; the resolver fills in
    /// the configured default when answering.
    pub ttl: Option<u32>,

    pub data: RecordData,
}

impl DnsRecord {
    pub fn new(name: DomainName, data: RecordData) -> Self {
        Self {
            name,
            ttl: None,
            data,
        }
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }

    /// Copy of this record owned by `name`; used when a wildcard answers.
    pub fn with_owner(&self, name: DomainName) -> Self {
        Self {
            name,
            ttl: self.ttl,
            data: self.data.clone(),
        }
    }

    pub fn ttl_or(&self, default_ttl: u32) -> u32 {
        self.ttl.unwrap_or(default_ttl)
    }
}
