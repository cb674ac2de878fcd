use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid record value: {0}")]
    InvalidRecordValue(String),

    #[error("Zone {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("Invalid upstream address: {0}")]
    InvalidUpstream(String),

    #[error("CNAME chain starting at {name} exceeds {hops} hops")]
    ResolutionLoop { name: String, hops: usize },

    #[error("All upstream servers are unreachable")]
    UpstreamUnreachable,

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport error with {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("Invalid DNS response: {0}")]
    InvalidUpstreamResponse(String),

    #[error("Malformed query: {0}")]
    MalformedQuery(String),
}

impl DomainError {
    /// Stable, machine-readable error class for logging and exit codes.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::InvalidDomainName(_)
            | DomainError::InvalidRecordValue(_)
            | DomainError::InvalidRecord { .. }
            | DomainError::InvalidUpstream(_) => "config",
            DomainError::ResolutionLoop { .. } => "resolution_loop",
            DomainError::UpstreamUnreachable => "upstream_unreachable",
            DomainError::QueryTimeout => "timeout",
            DomainError::Transport { .. } => "transport",
            DomainError::InvalidUpstreamResponse(_) => "upstream_response",
            DomainError::MalformedQuery(_) => "malformed_query",
        }
    }
}
