use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_true")]
    pub udp: bool,

    #[serde(default = "default_true")]
    pub tcp: bool,

    /// Idle limit for reading a query from an accepted TCP connection.
    #[serde(default = "default_tcp_timeout")]
    pub tcp_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: default_dns_port(),
            bind_address: default_bind_address(),
            udp: true,
            tcp: true,
            tcp_timeout_secs: default_tcp_timeout(),
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        if self.bind_address.contains(':') && !self.bind_address.starts_with('[') {
            format!("[{}]:{}", self.bind_address, self.dns_port)
        } else {
            format!("{}:{}", self.bind_address, self.dns_port)
        }
    }
}

fn default_dns_port() -> u16 {
    53
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_tcp_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
