#![allow(dead_code)]
use devdns_domain::{DnsRecord, DomainName, RecordData};
use std::io::Write;
use std::net::Ipv4Addr;
use tempfile::NamedTempFile;

pub fn name(s: &str) -> DomainName {
    DomainName::new(s).unwrap()
}

pub fn a_record(owner: &str, addr: &str) -> DnsRecord {
    DnsRecord::new(name(owner), RecordData::A(addr.parse::<Ipv4Addr>().unwrap()))
}

/// Writes `contents` into a temp file ending in `suffix` (e.g. ".toml").
pub fn zone_file_with(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
