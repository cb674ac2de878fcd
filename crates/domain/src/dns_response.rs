use crate::dns_record::DnsRecord;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NXDomain,
    NotImp,
    Refused,
    Other(u16),
}

impl ResponseCode {
    pub fn to_u16(&self) -> u16 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NXDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Other(code) => *code,
        }
    }

    pub fn from_u16(code: u16) -> Self {
        match code {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NXDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::Other(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Other(code) => write!(f, "RCODE{}", code),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Outcome of resolving one query. `truncated` is only set when an upstream
/// reply carried TC; size truncation happens in the wire encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResponse {
    pub records: Vec<DnsRecord>,

    /// Authority section passed through from an upstream reply.
    pub authority: Vec<DnsRecord>,

    pub response_code: ResponseCode,

    pub truncated: bool,

    /// AA flag: set for zone answers, copied from upstream replies.
    pub authoritative: bool,
}

impl DnsResponse {
    pub fn new(response_code: ResponseCode) -> Self {
        Self {
            records: Vec::new(),
            authority: Vec::new(),
            response_code,
            truncated: false,
            authoritative: false,
        }
    }

    pub fn local_answer(records: Vec<DnsRecord>) -> Self {
        Self {
            records,
            authoritative: true,
            ..Self::new(ResponseCode::NoError)
        }
    }

    pub fn servfail() -> Self {
        Self::new(ResponseCode::ServFail)
    }
}
