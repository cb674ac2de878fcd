#![allow(dead_code)]

use async_trait::async_trait;
use devdns_application::ports::UpstreamClient;
use devdns_domain::{DnsQuery, DnsResponse, DomainError, RecordType};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Upstream double that records every forwarded query.
#[derive(Clone, Default)]
pub struct MockUpstreamClient {
    responses: Arc<RwLock<HashMap<String, DnsResponse>>>,
    calls: Arc<RwLock<Vec<(String, RecordType)>>>,
    error: Arc<RwLock<Option<DomainError>>>,
}

impl MockUpstreamClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_response(&self, domain: &str, response: DnsResponse) {
        self.responses
            .write()
            .await
            .insert(normalize(domain), response);
    }

    pub async fn fail_with(&self, error: DomainError) {
        *self.error.write().await = Some(error);
    }

    pub async fn calls(&self) -> Vec<(String, RecordType)> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

fn normalize(domain: &str) -> String {
    format!("{}.", domain.trim_end_matches('.').to_ascii_lowercase())
}

#[async_trait]
impl UpstreamClient for MockUpstreamClient {
    async fn forward(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError> {
        self.calls
            .write()
            .await
            .push((query.name.to_string(), query.record_type));

        if let Some(error) = self.error.read().await.clone() {
            return Err(error);
        }

        Ok(self
            .responses
            .read()
            .await
            .get(query.name.as_str())
            .cloned()
            .unwrap_or_else(|| DnsResponse::new(devdns_domain::ResponseCode::NXDomain)))
    }
}
