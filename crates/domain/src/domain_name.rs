use crate::errors::DomainError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;
const MAX_WIRE_LEN: usize = 255;

/// A fully-qualified, lower-cased domain name with exactly one trailing dot.
///
/// Equality is plain string equality on the normalized form, so two names
/// that differ only in case or in the trailing dot compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainName(Arc<str>);

impl DomainName {
    pub fn new(name: &str) -> Result<Self, DomainError> {
        let trimmed = name.trim();
        let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        if trimmed.len() > MAX_NAME_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "'{}' is longer than {} characters",
                name, MAX_NAME_LEN
            )));
        }

        for (position, label) in trimmed.split('.').enumerate() {
            if label.is_empty() {
                return Err(DomainError::InvalidDomainName(format!(
                    "'{}' contains an empty label",
                    name
                )));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "label '{}' in '{}' is longer than {} characters",
                    label, name, MAX_LABEL_LEN
                )));
            }
            if label.contains('*') && (label != "*" || position != 0) {
                return Err(DomainError::InvalidDomainName(format!(
                    "'{}': '*' is only allowed as the leftmost label",
                    name
                )));
            }
            if label.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(DomainError::InvalidDomainName(format!(
                    "'{}' contains whitespace or control characters",
                    name
                )));
            }
        }

        Ok(Self(Arc::from(format!("{}.", trimmed.to_ascii_lowercase()))))
    }

    /// Builds a name from raw wire labels, as received in a DNS message.
    ///
    /// Only the wire limits apply: 1 to 63 bytes per label and 255 bytes in
    /// total. Bytes outside `[a-z0-9-_*]` are kept as `\c` or `\DDD` escapes
    /// so the name can be turned back into the same labels.
    pub fn from_wire<'a>(labels: impl IntoIterator<Item = &'a [u8]>) -> Result<Self, DomainError> {
        let mut text = String::new();
        let mut wire_len = 1;

        for label in labels {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "wire label of {} bytes, expected 1 to {}",
                    label.len(),
                    MAX_LABEL_LEN
                )));
            }
            wire_len += label.len() + 1;
            if wire_len > MAX_WIRE_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "wire name longer than {} bytes",
                    MAX_WIRE_LEN
                )));
            }
            for &byte in label {
                push_escaped(&mut text, byte.to_ascii_lowercase());
            }
            text.push('.');
        }

        if text.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self(Arc::from(text)))
    }

    pub fn root() -> Self {
        Self(Arc::from("."))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        &*self.0 == "."
    }

    pub fn is_wildcard(&self) -> bool {
        self.0.starts_with("*.")
    }

    /// Raw label bytes with escapes resolved, leftmost first.
    pub fn wire_labels(&self) -> Vec<Vec<u8>> {
        if self.is_root() {
            return Vec::new();
        }

        let mut labels = Vec::new();
        let mut label = Vec::new();
        let mut bytes = self.0.bytes().peekable();
        while let Some(byte) = bytes.next() {
            match byte {
                b'.' => labels.push(std::mem::take(&mut label)),
                b'\\' => {
                    let mut digits = 0u16;
                    let mut count = 0;
                    while count < 3 && bytes.peek().is_some_and(u8::is_ascii_digit) {
                        if let Some(d) = bytes.next() {
                            digits = digits * 10 + u16::from(d - b'0');
                        }
                        count += 1;
                    }
                    if count == 3 {
                        label.push(digits.min(255) as u8);
                    } else if let Some(escaped) = bytes.next() {
                        label.push(escaped);
                    }
                }
                other => label.push(other),
            }
        }
        if !label.is_empty() {
            labels.push(label);
        }
        labels
    }

    /// The name with its leftmost label removed; `None` for the root.
    pub fn parent(&self) -> Option<DomainName> {
        if self.is_root() {
            return None;
        }
        match first_label_end(&self.0) {
            Some(idx) if idx + 1 < self.0.len() => Some(Self(Arc::from(&self.0[idx + 1..]))),
            _ => Some(Self::root()),
        }
    }

    /// For `*.example.com.` returns `example.com.`.
    pub fn wildcard_base(&self) -> Option<DomainName> {
        if self.is_wildcard() {
            self.parent()
        } else {
            None
        }
    }
}

/// Byte offset of the first unescaped dot.
fn first_label_end(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, byte) in text.bytes().enumerate() {
        match byte {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'.' => return Some(idx),
            _ => {}
        }
    }
    None
}

fn push_escaped(text: &mut String, byte: u8) {
    match byte {
        b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'*' => text.push(char::from(byte)),
        0x21..=0x7e => {
            text.push('\\');
            text.push(char::from(byte));
        }
        _ => text.push_str(&format!("\\{:03}", byte)),
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
