//! Conversion between zone records and hickory wire records.

use super::forwarding::RecordTypeMapper;
use devdns_domain::{DnsRecord, DomainError, DomainName, RecordData};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX, NAPTR, NS, NULL, PTR, SOA, SRV, TXT};
use hickory_proto::rr::{Name, RData, Record, RecordType as HickoryRecordType};
use hickory_proto::serialize::binary::{BinDecoder, BinEncodable, Restrict};

/// Longest single character-string in a TXT record.
pub const MAX_CHARACTER_STRING: usize = 255;

/// Labels are passed as raw bytes, so names received from the wire encode
/// back to the same labels.
pub fn to_hickory_name(name: &DomainName) -> Result<Name, DomainError> {
    let labels = name.wire_labels();
    Name::from_labels(labels.iter().map(Vec::as_slice))
        .map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", name, e)))
}

pub fn from_hickory_name(name: &Name) -> Result<DomainName, DomainError> {
    DomainName::from_wire(name.iter())
}

/// Encodes a record for the answer or authority section. Records without a
/// TTL are sent with TTL 0; the resolver fills TTLs in before encoding.
pub fn to_hickory_record(record: &DnsRecord) -> Result<Record, DomainError> {
    let name = to_hickory_name(&record.name)?;
    let rdata = to_rdata(&record.data)?;
    Ok(Record::from_rdata(name, record.ttl_or(0), rdata))
}

pub fn from_hickory_record(record: &Record) -> Result<DnsRecord, DomainError> {
    let name = from_hickory_name(record.name())?;
    let data = from_rdata(record.data())?;
    Ok(DnsRecord::new(name, data).with_ttl(record.ttl()))
}

fn to_rdata(data: &RecordData) -> Result<RData, DomainError> {
    let rdata = match data {
        RecordData::A(addr) => RData::A(A(*addr)),
        RecordData::AAAA(addr) => RData::AAAA(AAAA(*addr)),
        RecordData::CNAME(target) => RData::CNAME(CNAME(to_hickory_name(target)?)),
        RecordData::NS(target) => RData::NS(NS(to_hickory_name(target)?)),
        RecordData::PTR(target) => RData::PTR(PTR(to_hickory_name(target)?)),
        RecordData::MX {
            preference,
            exchange,
        } => RData::MX(MX::new(*preference, to_hickory_name(exchange)?)),
        RecordData::TXT(strings) => RData::TXT(TXT::from_bytes(split_character_strings(strings))),
        RecordData::SOA {
            mname,
            rname,
            serial,
            refresh,
            retry,
            expire,
            minimum,
        } => RData::SOA(SOA::new(
            to_hickory_name(mname)?,
            to_hickory_name(rname)?,
            *serial,
            // Bit-preserving; the wire fields are plain 32-bit values.
            *refresh as i32,
            *retry as i32,
            *expire as i32,
            *minimum,
        )),
        RecordData::SRV {
            priority,
            weight,
            port,
            target,
        } => RData::SRV(SRV::new(*priority, *weight, *port, to_hickory_name(target)?)),
        RecordData::CAA { flags, tag, value } => caa_rdata(*flags, tag, value)?,
        RecordData::NAPTR {
            order,
            preference,
            flags,
            services,
            regexp,
            replacement,
        } => RData::NAPTR(NAPTR::new(
            *order,
            *preference,
            Box::from(flags.as_bytes()),
            Box::from(services.as_bytes()),
            Box::from(regexp.as_bytes()),
            to_hickory_name(replacement)?,
        )),
        RecordData::Opaque { record_type, data } => RData::Unknown {
            code: RecordTypeMapper::to_hickory(record_type),
            rdata: NULL::with(data.clone()),
        },
    };
    Ok(rdata)
}

fn from_rdata(rdata: &RData) -> Result<RecordData, DomainError> {
    let data = match rdata {
        RData::A(a) => RecordData::A(a.0),
        RData::AAAA(aaaa) => RecordData::AAAA(aaaa.0),
        RData::CNAME(cname) => RecordData::CNAME(from_hickory_name(&cname.0)?),
        RData::NS(ns) => RecordData::NS(from_hickory_name(&ns.0)?),
        RData::PTR(ptr) => RecordData::PTR(from_hickory_name(&ptr.0)?),
        RData::MX(mx) => RecordData::MX {
            preference: mx.preference(),
            exchange: from_hickory_name(mx.exchange())?,
        },
        RData::TXT(txt) => match utf8_strings(txt) {
            Some(strings) => RecordData::TXT(strings),
            None => opaque(rdata)?,
        },
        RData::SOA(soa) => RecordData::SOA {
            mname: from_hickory_name(soa.mname())?,
            rname: from_hickory_name(soa.rname())?,
            serial: soa.serial(),
            refresh: soa.refresh() as u32,
            retry: soa.retry() as u32,
            expire: soa.expire() as u32,
            minimum: soa.minimum(),
        },
        RData::SRV(srv) => RecordData::SRV {
            priority: srv.priority(),
            weight: srv.weight(),
            port: srv.port(),
            target: from_hickory_name(srv.target())?,
        },
        RData::CAA(caa) => match std::str::from_utf8(caa.raw_value()) {
            Ok(value) => RecordData::CAA {
                flags: caa.flags(),
                tag: caa.tag().as_str().to_string(),
                value: value.to_string(),
            },
            Err(_) => opaque(rdata)?,
        },
        RData::NAPTR(naptr) => match naptr_strings(naptr) {
            Some([flags, services, regexp]) => RecordData::NAPTR {
                order: naptr.order(),
                preference: naptr.preference(),
                flags,
                services,
                regexp,
                replacement: from_hickory_name(naptr.replacement())?,
            },
            None => opaque(rdata)?,
        },
        other => opaque(other)?,
    };
    Ok(data)
}

/// Keeps the raw RDATA of types the zone model does not interpret.
fn opaque(rdata: &RData) -> Result<RecordData, DomainError> {
    let data = rdata.to_bytes().map_err(|e| {
        DomainError::InvalidUpstreamResponse(format!(
            "cannot re-encode {} record: {}",
            rdata.record_type(),
            e
        ))
    })?;
    Ok(RecordData::Opaque {
        record_type: RecordTypeMapper::from_hickory(rdata.record_type()),
        data,
    })
}

/// hickory only builds typed issue and iodef values, so any tag goes through
/// its RDATA decoder, which keeps the tag and value bytes as written.
fn caa_rdata(flags: u8, tag: &str, value: &str) -> Result<RData, DomainError> {
    let invalid = |reason: String| {
        DomainError::InvalidRecordValue(format!("CAA {} \"{}\": {}", tag, value, reason))
    };
    let tag_len = u8::try_from(tag.len()).map_err(|_| invalid("tag too long".to_string()))?;

    let mut bytes = Vec::with_capacity(2 + tag.len() + value.len());
    bytes.push(flags);
    bytes.push(tag_len);
    bytes.extend_from_slice(tag.as_bytes());
    bytes.extend_from_slice(value.as_bytes());

    let length = u16::try_from(bytes.len()).map_err(|_| invalid("value too long".to_string()))?;
    RData::read(
        &mut BinDecoder::new(&bytes),
        HickoryRecordType::CAA,
        Restrict::new(length),
    )
    .map_err(|e| invalid(e.to_string()))
}

fn naptr_strings(naptr: &NAPTR) -> Option<[String; 3]> {
    let text = |bytes: &[u8]| std::str::from_utf8(bytes).ok().map(String::from);
    Some([
        text(naptr.flags())?,
        text(naptr.services())?,
        text(naptr.regexp())?,
    ])
}

fn utf8_strings(txt: &TXT) -> Option<Vec<String>> {
    txt.txt_data()
        .iter()
        .map(|bytes| std::str::from_utf8(bytes).ok().map(String::from))
        .collect()
}

/// Splits every string into character-strings of at most 255 bytes.
pub fn split_character_strings(strings: &[String]) -> Vec<&[u8]> {
    let mut chunks = Vec::with_capacity(strings.len());
    for s in strings {
        if s.is_empty() {
            chunks.push(&[][..]);
        } else {
            chunks.extend(s.as_bytes().chunks(MAX_CHARACTER_STRING));
        }
    }
    chunks
}
