use crate::dns_record::RecordType;
use crate::domain_name::DomainName;
use std::fmt;
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transport {
    #[default]
    Udp,
    Tcp,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Udp => "UDP",
            Transport::Tcp => "TCP",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct DnsQuery {
    pub name: DomainName,
    pub record_type: RecordType,
    pub transport: Transport,
    pub client: Option<SocketAddr>,
}

impl DnsQuery {
    pub fn new(name: DomainName, record_type: RecordType) -> Self {
        Self {
            name,
            record_type,
            transport: Transport::Udp,
            client: None,
        }
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_client(mut self, client: SocketAddr) -> Self {
        self.client = Some(client);
        self
    }
}
