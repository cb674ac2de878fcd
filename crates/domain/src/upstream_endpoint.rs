use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// Represents an upstream server address that may or may not be resolved to an IP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl UpstreamAddr {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            UpstreamAddr::Resolved(addr) => Some(*addr),
            UpstreamAddr::Unresolved { .. } => None,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            UpstreamAddr::Resolved(addr) => addr.port(),
            UpstreamAddr::Unresolved { port, .. } => *port,
        }
    }

    /// Returns (hostname, port) if this address is unresolved.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        match self {
            UpstreamAddr::Unresolved { hostname, port } => Some((hostname, *port)),
            UpstreamAddr::Resolved(_) => None,
        }
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpstreamProtocol {
    #[default]
    Udp,
    Tcp,
}

/// One configured upstream resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpstreamEndpoint {
    pub protocol: UpstreamProtocol,
    pub addr: UpstreamAddr,
}

impl UpstreamEndpoint {
    pub fn udp(addr: SocketAddr) -> Self {
        Self {
            protocol: UpstreamProtocol::Udp,
            addr: UpstreamAddr::Resolved(addr),
        }
    }

    pub fn tcp(addr: SocketAddr) -> Self {
        Self {
            protocol: UpstreamProtocol::Tcp,
            addr: UpstreamAddr::Resolved(addr),
        }
    }

    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.addr.socket_addr()
    }

    /// Creates a copy of this endpoint with the given resolved `SocketAddr`.
    pub fn with_resolved_addr(&self, resolved: SocketAddr) -> Self {
        Self {
            protocol: self.protocol,
            addr: UpstreamAddr::Resolved(resolved),
        }
    }
}

fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        let port_str = rest.strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        if host.contains(':') {
            return None;
        }
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

fn is_hostname(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|label| {
            !label.is_empty()
                && label
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        })
}

fn parse_upstream_addr(addr_str: &str) -> Result<UpstreamAddr, String> {
    if let Ok(addr) = addr_str.parse::<SocketAddr>() {
        return Ok(UpstreamAddr::Resolved(addr));
    }
    let bare = addr_str.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
    }
    if let Some((host, port)) = parse_host_port(addr_str) {
        if is_hostname(host) {
            return Ok(UpstreamAddr::Unresolved {
                hostname: host.into(),
                port,
            });
        }
    }
    if is_hostname(addr_str) {
        return Ok(UpstreamAddr::Unresolved {
            hostname: addr_str.into(),
            port: DEFAULT_DNS_PORT,
        });
    }
    Err(format!("Invalid address '{}'", addr_str))
}

impl FromStr for UpstreamEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(addr_str) = s.strip_prefix("udp://") {
            let addr = parse_upstream_addr(addr_str)
                .map_err(|_| format!("Invalid UDP address '{}'", addr_str))?;
            return Ok(Self {
                protocol: UpstreamProtocol::Udp,
                addr,
            });
        }
        if let Some(addr_str) = s.strip_prefix("tcp://") {
            let addr = parse_upstream_addr(addr_str)
                .map_err(|_| format!("Invalid TCP address '{}'", addr_str))?;
            return Ok(Self {
                protocol: UpstreamProtocol::Tcp,
                addr,
            });
        }
        parse_upstream_addr(s)
            .map(|addr| Self {
                protocol: UpstreamProtocol::Udp,
                addr,
            })
            .map_err(|_| {
                format!(
                    "Invalid upstream '{}'. Expected: HOST, HOST:PORT, udp://HOST:PORT or tcp://HOST:PORT",
                    s
                )
            })
    }
}

impl fmt::Display for UpstreamEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.protocol {
            UpstreamProtocol::Udp => write!(f, "udp://{}", self.addr),
            UpstreamProtocol::Tcp => write!(f, "tcp://{}", self.addr),
        }
    }
}
