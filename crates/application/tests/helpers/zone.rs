#![allow(dead_code)]

use devdns_application::services::{RecordStore, ZoneHandle};
use devdns_domain::{DnsQuery, DnsRecord, DomainName, RecordData, RecordType};
use std::sync::Arc;

pub fn name(s: &str) -> DomainName {
    DomainName::new(s).unwrap()
}

pub fn query(domain: &str, record_type: RecordType) -> DnsQuery {
    DnsQuery::new(name(domain), record_type)
}

pub fn a(owner: &str, addr: &str) -> DnsRecord {
    DnsRecord::new(name(owner), RecordData::A(addr.parse().unwrap()))
}

pub fn aaaa(owner: &str, addr: &str) -> DnsRecord {
    DnsRecord::new(name(owner), RecordData::AAAA(addr.parse().unwrap()))
}

pub fn cname(owner: &str, target: &str) -> DnsRecord {
    DnsRecord::new(name(owner), RecordData::CNAME(name(target)))
}

pub fn txt(owner: &str, text: &str) -> DnsRecord {
    DnsRecord::new(name(owner), RecordData::TXT(vec![text.to_string()]))
}

pub fn store(records: Vec<DnsRecord>) -> RecordStore {
    RecordStore::new(records, 8)
}

pub fn zone(records: Vec<DnsRecord>) -> Arc<ZoneHandle> {
    Arc::new(ZoneHandle::new(store(records)))
}
