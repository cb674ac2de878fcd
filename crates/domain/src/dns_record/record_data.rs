use super::RecordType;
use crate::domain_name::DomainName;
use crate::errors::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr};

const SOA_DEFAULT_REFRESH: u32 = 3600;
const SOA_DEFAULT_RETRY: u32 = 3600 * 3;
const SOA_DEFAULT_EXPIRE: u32 = 3600 * 24;
const SOA_DEFAULT_MINIMUM: u32 = 3600;
const MX_DEFAULT_PREFERENCE: u16 = 10;
const MAX_CAA_TAG_LEN: usize = 15;
const MAX_CHARACTER_STRING: usize = 255;

/// Type-specific record payload. The record type is derived from the variant,
/// so a record can never carry a value that does not fit its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(DomainName),
    NS(DomainName),
    PTR(DomainName),
    MX {
        preference: u16,
        exchange: DomainName,
    },
    TXT(Vec<String>),
    SOA {
        mname: DomainName,
        rname: DomainName,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    SRV {
        priority: u16,
        weight: u16,
        port: u16,
        target: DomainName,
    },
    CAA {
        flags: u8,
        tag: String,
        value: String,
    },
    NAPTR {
        order: u16,
        preference: u16,
        flags: String,
        services: String,
        regexp: String,
        replacement: DomainName,
    },
    /// Upstream record of a type the zone model does not interpret;
    /// `data` is the raw RDATA.
    Opaque {
        record_type: RecordType,
        data: Vec<u8>,
    },
}

impl RecordData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A(_) => RecordType::A,
            RecordData::AAAA(_) => RecordType::AAAA,
            RecordData::CNAME(_) => RecordType::CNAME,
            RecordData::NS(_) => RecordType::NS,
            RecordData::PTR(_) => RecordType::PTR,
            RecordData::MX { .. } => RecordType::MX,
            RecordData::TXT(_) => RecordType::TXT,
            RecordData::SOA { .. } => RecordType::SOA,
            RecordData::SRV { .. } => RecordType::SRV,
            RecordData::CAA { .. } => RecordType::CAA,
            RecordData::NAPTR { .. } => RecordType::NAPTR,
            RecordData::Opaque { record_type, .. } => *record_type,
        }
    }

    pub fn cname_target(&self) -> Option<&DomainName> {
        match self {
            RecordData::CNAME(target) => Some(target),
            _ => None,
        }
    }

    /// Builds a payload from the textual fields of a zone entry.
    ///
    /// `soa_serial` is used when an SOA entry only names its two servers.
    /// An MX entry may give only the exchange (preference 10), or the
    /// exchange and preference in either order.
    pub fn from_fields(
        record_type: RecordType,
        fields: &[String],
        soa_serial: u32,
    ) -> Result<Self, DomainError> {
        match record_type {
            RecordType::A => {
                let [addr] = expect_fields::<1>(record_type, fields)?;
                addr.parse::<Ipv4Addr>()
                    .map(RecordData::A)
                    .map_err(|_| invalid(format!("'{}' is not an IPv4 address", addr)))
            }
            RecordType::AAAA => {
                let [addr] = expect_fields::<1>(record_type, fields)?;
                addr.parse::<Ipv6Addr>()
                    .map(RecordData::AAAA)
                    .map_err(|_| invalid(format!("'{}' is not an IPv6 address", addr)))
            }
            RecordType::CNAME => {
                let [target] = expect_fields::<1>(record_type, fields)?;
                Ok(RecordData::CNAME(DomainName::new(target)?))
            }
            RecordType::NS => {
                let [target] = expect_fields::<1>(record_type, fields)?;
                Ok(RecordData::NS(DomainName::new(target)?))
            }
            RecordType::PTR => {
                let [target] = expect_fields::<1>(record_type, fields)?;
                Ok(RecordData::PTR(DomainName::new(target)?))
            }
            RecordType::MX => match fields {
                [exchange] => Ok(RecordData::MX {
                    preference: MX_DEFAULT_PREFERENCE,
                    exchange: DomainName::new(exchange)?,
                }),
                [first, second] => {
                    let (preference, exchange) = match first.trim().parse::<u16>() {
                        Ok(preference) => (preference, second),
                        Err(_) => (parse_number(second, "MX preference")?, first),
                    };
                    Ok(RecordData::MX {
                        preference,
                        exchange: DomainName::new(exchange)?,
                    })
                }
                _ => Err(invalid(format!(
                    "MX record needs 1 or 2 values, got {}",
                    fields.len()
                ))),
            },
            RecordType::TXT => {
                if fields.is_empty() {
                    return Err(invalid("TXT record needs at least one string".to_string()));
                }
                Ok(RecordData::TXT(fields.to_vec()))
            }
            RecordType::SOA => match fields.len() {
                2 => Ok(RecordData::SOA {
                    mname: DomainName::new(&fields[0])?,
                    rname: DomainName::new(&fields[1])?,
                    serial: soa_serial,
                    refresh: SOA_DEFAULT_REFRESH,
                    retry: SOA_DEFAULT_RETRY,
                    expire: SOA_DEFAULT_EXPIRE,
                    minimum: SOA_DEFAULT_MINIMUM,
                }),
                7 => Ok(RecordData::SOA {
                    mname: DomainName::new(&fields[0])?,
                    rname: DomainName::new(&fields[1])?,
                    serial: parse_number(&fields[2], "SOA serial")?,
                    refresh: parse_number(&fields[3], "SOA refresh")?,
                    retry: parse_number(&fields[4], "SOA retry")?,
                    expire: parse_number(&fields[5], "SOA expire")?,
                    minimum: parse_number(&fields[6], "SOA minimum")?,
                }),
                n => Err(invalid(format!(
                    "SOA record needs 2 or 7 values, got {}",
                    n
                ))),
            },
            RecordType::SRV => {
                let [priority, weight, port, target] = expect_fields::<4>(record_type, fields)?;
                Ok(RecordData::SRV {
                    priority: parse_number(priority, "SRV priority")?,
                    weight: parse_number(weight, "SRV weight")?,
                    port: parse_number(port, "SRV port")?,
                    target: DomainName::new(target)?,
                })
            }
            RecordType::CAA => {
                let [flags, tag, value] = expect_fields::<3>(record_type, fields)?;
                if tag.is_empty()
                    || tag.len() > MAX_CAA_TAG_LEN
                    || !tag.bytes().all(|b| b.is_ascii_alphanumeric())
                {
                    return Err(invalid(format!(
                        "CAA tag '{}' must be 1 to {} letters or digits",
                        tag, MAX_CAA_TAG_LEN
                    )));
                }
                Ok(RecordData::CAA {
                    flags: parse_number(flags, "CAA flags")?,
                    tag: tag.to_string(),
                    value: value.to_string(),
                })
            }
            RecordType::NAPTR => {
                let [order, preference, flags, services, regexp, replacement] =
                    expect_fields::<6>(record_type, fields)?;
                for (what, text) in [("flags", flags), ("services", services), ("regexp", regexp)] {
                    if text.len() > MAX_CHARACTER_STRING {
                        return Err(invalid(format!(
                            "NAPTR {} is longer than {} bytes",
                            what, MAX_CHARACTER_STRING
                        )));
                    }
                }
                Ok(RecordData::NAPTR {
                    order: parse_number(order, "NAPTR order")?,
                    preference: parse_number(preference, "NAPTR preference")?,
                    flags: flags.to_string(),
                    services: services.to_string(),
                    regexp: regexp.to_string(),
                    replacement: DomainName::new(replacement)?,
                })
            }
            other => Err(invalid(format!(
                "record type {} cannot be declared in a zone",
                other
            ))),
        }
    }

    /// Number of value tokens a zone entry of this type takes, when fixed.
    pub fn field_count(record_type: RecordType) -> Option<usize> {
        match record_type {
            RecordType::A
            | RecordType::AAAA
            | RecordType::CNAME
            | RecordType::NS
            | RecordType::PTR
            | RecordType::TXT => Some(1),
            RecordType::MX => Some(2),
            RecordType::CAA => Some(3),
            RecordType::SRV => Some(4),
            RecordType::NAPTR => Some(6),
            _ => None,
        }
    }
}

fn expect_fields<const N: usize>(
    record_type: RecordType,
    fields: &[String],
) -> Result<[&str; N], DomainError> {
    if fields.len() != N {
        return Err(invalid(format!(
            "{} record needs {} value(s), got {}",
            record_type,
            N,
            fields.len()
        )));
    }
    Ok(std::array::from_fn(|i| fields[i].as_str()))
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, DomainError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| invalid(format!("{} '{}' is not a valid number", what, value)))
}

fn invalid(reason: String) -> DomainError {
    DomainError::InvalidRecordValue(reason)
}
