//! Zone file loading.
//!
//! Two shapes are accepted: a table of records (`[[zones]]` in TOML, or the
//! same structure in YAML or JSON) and a plain line format, one record per
//! line:
//!
//! ```text
//! # name          type   value...               [ttl]
//! api.local       A      127.0.0.1
//! mail.local      MX     10 mx.local            600
//! note.local      TXT    "hello world"
//! ```

use crate::config::ConfigError;
use crate::dns_record::{DnsRecord, RecordData, RecordType};
use crate::domain_name::DomainName;
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneFormat {
    Toml,
    Yaml,
    Json,
    Lines,
}

impl ZoneFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneFormat::Toml => "toml",
            ZoneFormat::Yaml => "yaml",
            ZoneFormat::Json => "json",
            ZoneFormat::Lines => "lines",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(ZoneFormat::Toml),
            "yaml" | "yml" => Some(ZoneFormat::Yaml),
            "json" => Some(ZoneFormat::Json),
            "zone" | "txt" | "hosts" | "records" => Some(ZoneFormat::Lines),
            _ => None,
        }
    }
}

impl fmt::Display for ZoneFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(ZoneFormat::Toml),
            "yaml" | "yml" => Ok(ZoneFormat::Yaml),
            "json" => Ok(ZoneFormat::Json),
            "lines" | "line" | "text" => Ok(ZoneFormat::Lines),
            _ => Err(format!("Unknown zone format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ZoneValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for ZoneValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneValue::Number(n) => write!(f, "{}", n),
            ZoneValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ZoneAnswer {
    Text(String),
    List(Vec<ZoneValue>),
}

/// One entry of the table-of-records format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneEntry {
    pub host: String,

    #[serde(rename = "type")]
    pub record_type: String,

    pub answer: ZoneAnswer,

    #[serde(default)]
    pub ttl: Option<u32>,
}

impl ZoneEntry {
    /// Validates the entry and converts it into a record. `index` is the
    /// 1-based position used in error messages.
    pub fn to_record(&self, index: usize, soa_serial: u32) -> Result<DnsRecord, DomainError> {
        let record_type = parse_zone_type(&self.record_type).map_err(|e| at(index, e))?;

        let fields = match &self.answer {
            ZoneAnswer::Text(text) => {
                let text = join_continuation_lines(text);
                if record_type == RecordType::TXT {
                    vec![text]
                } else if record_type == RecordType::CAA {
                    split_leading_fields(&text, 3)
                } else {
                    text.split_whitespace().map(String::from).collect()
                }
            }
            ZoneAnswer::List(values) => values.iter().map(ToString::to_string).collect(),
        };

        build_record(&self.host, record_type, &fields, self.ttl, soa_serial)
            .map_err(|e| at(index, e))
    }
}

#[derive(Debug, Deserialize)]
struct ZoneDocument {
    zones: Vec<ZoneEntry>,
}

/// The parsed, validated content of a zone source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneFile {
    pub records: Vec<DnsRecord>,
}

impl ZoneFile {
    pub fn load(path: impl AsRef<Path>, format: Option<ZoneFormat>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.display().to_string(), e.to_string()))?;

        match format.or_else(|| ZoneFormat::from_path(path)) {
            Some(format) => Self::parse_str(&contents, format),
            None => Self::parse_any(&contents),
        }
    }

    pub fn parse_str(contents: &str, format: ZoneFormat) -> Result<Self, ConfigError> {
        let serial = load_serial();
        match format {
            ZoneFormat::Toml => {
                let doc: ZoneDocument =
                    toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
                Ok(Self::from_entries(&doc.zones, serial)?)
            }
            ZoneFormat::Yaml => {
                let doc: ZoneDocument = serde_yaml::from_str(contents)
                    .map_err(|e| ConfigError::Parse(e.to_string()))?;
                Ok(Self::from_entries(&doc.zones, serial)?)
            }
            ZoneFormat::Json => {
                let doc: ZoneDocument = serde_json::from_str(contents)
                    .map_err(|e| ConfigError::Parse(e.to_string()))?;
                Ok(Self::from_entries(&doc.zones, serial)?)
            }
            ZoneFormat::Lines => Ok(Self::parse_lines(contents, serial)?),
        }
    }

    /// Tries TOML, then YAML, then JSON, then the line format. A document that parses
    /// structurally but holds an invalid record is reported, not skipped.
    fn parse_any(contents: &str) -> Result<Self, ConfigError> {
        let serial = load_serial();
        if let Ok(doc) = toml::from_str::<ZoneDocument>(contents) {
            return Ok(Self::from_entries(&doc.zones, serial)?);
        }
        if let Ok(doc) = serde_yaml::from_str::<ZoneDocument>(contents) {
            return Ok(Self::from_entries(&doc.zones, serial)?);
        }
        if let Ok(doc) = serde_json::from_str::<ZoneDocument>(contents) {
            return Ok(Self::from_entries(&doc.zones, serial)?);
        }
        Ok(Self::parse_lines(contents, serial)?)
    }

    pub fn from_entries(entries: &[ZoneEntry], soa_serial: u32) -> Result<Self, DomainError> {
        let records = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| entry.to_record(i + 1, soa_serial))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    /// Parses the line format; errors carry the 1-based line number.
    pub fn parse_lines(contents: &str, soa_serial: u32) -> Result<Self, DomainError> {
        let mut records = Vec::new();

        for (line_no, line) in contents.lines().enumerate() {
            let index = line_no + 1;
            let tokens = tokenize(line).map_err(|e| at(index, e))?;
            if tokens.is_empty() {
                continue;
            }
            if tokens.len() < 3 {
                return Err(at(
                    index,
                    DomainError::InvalidRecordValue(
                        "expected 'name type value [ttl]'".to_string(),
                    ),
                ));
            }

            let record_type = parse_zone_type(&tokens[1]).map_err(|e| at(index, e))?;
            let values = &tokens[2..];
            let expected = match RecordData::field_count(record_type) {
                Some(n) => n,
                None if values.len() >= 7 => 7,
                None => 2,
            };

            let ttl = match values.len() {
                n if n == expected => None,
                n if n == expected + 1 => Some(values[expected].parse::<u32>().map_err(|_| {
                    at(
                        index,
                        DomainError::InvalidRecordValue(format!(
                            "ttl '{}' is not a non-negative integer",
                            values[expected]
                        )),
                    )
                })?),
                n => {
                    return Err(at(
                        index,
                        DomainError::InvalidRecordValue(format!(
                            "{} record takes {} value(s) and an optional ttl, got {} token(s)",
                            record_type, expected, n
                        )),
                    ))
                }
            };

            let record = build_record(&tokens[0], record_type, &values[..expected], ttl, soa_serial)
                .map_err(|e| at(index, e))?;
            records.push(record);
        }

        Ok(Self { records })
    }
}

fn build_record(
    host: &str,
    record_type: RecordType,
    fields: &[String],
    ttl: Option<u32>,
    soa_serial: u32,
) -> Result<DnsRecord, DomainError> {
    let name = DomainName::new(host)?;
    let data = RecordData::from_fields(record_type, fields, soa_serial)?;
    let record = DnsRecord::new(name, data);
    Ok(match ttl {
        Some(ttl) => record.with_ttl(ttl),
        None => record,
    })
}

fn parse_zone_type(raw: &str) -> Result<RecordType, DomainError> {
    // SPF shares the TXT wire type.
    if raw.trim().eq_ignore_ascii_case("SPF") {
        return Ok(RecordType::TXT);
    }
    match raw.parse::<RecordType>() {
        Ok(rt) if rt.is_zone_type() => Ok(rt),
        _ => Err(DomainError::InvalidRecordValue(format!(
            "\"type\" must be one of A, AAAA, CAA, CNAME, MX, NAPTR, NS, PTR, SOA, SPF, SRV, TXT, got '{}'",
            raw
        ))),
    }
}

/// Drops line breaks and the whitespace just before them, so long values
/// can be wrapped in multiline strings.
fn join_continuation_lines(text: &str) -> String {
    let mut segments = text.split('\n').peekable();
    let mut joined = String::with_capacity(text.len());
    while let Some(segment) = segments.next() {
        if segments.peek().is_some() {
            joined.push_str(segment.trim_end());
        } else {
            joined.push_str(segment);
        }
    }
    joined
}

/// Splits off `count - 1` whitespace-separated fields; the rest of the text,
/// spaces included, is the last field.
fn split_leading_fields(text: &str, count: usize) -> Vec<String> {
    let mut fields = Vec::with_capacity(count);
    let mut rest = text.trim();
    while fields.len() + 1 < count && !rest.is_empty() {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        fields.push(rest[..end].to_string());
        rest = rest[end..].trim_start();
    }
    if !rest.is_empty() {
        fields.push(rest.to_string());
    }
    fields
}

fn tokenize(line: &str) -> Result<Vec<String>, DomainError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '#' || c == ';' {
            break;
        }

        let mut token = String::new();
        if c == '"' {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            token.push(escaped);
                        }
                    }
                    '"' => {
                        closed = true;
                        break;
                    }
                    other => token.push(other),
                }
            }
            if !closed {
                return Err(DomainError::InvalidRecordValue(
                    "unterminated quoted string".to_string(),
                ));
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }

    Ok(tokens)
}

fn load_serial() -> u32 {
    u32::try_from(chrono::Utc::now().timestamp()).unwrap_or(u32::MAX)
}

fn at(index: usize, error: DomainError) -> DomainError {
    match error {
        DomainError::InvalidRecordValue(reason) | DomainError::InvalidDomainName(reason) => {
            DomainError::InvalidRecord { index, reason }
        }
        other => DomainError::InvalidRecord {
            index,
            reason: other.to_string(),
        },
    }
}
