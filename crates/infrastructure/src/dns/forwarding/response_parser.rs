use crate::dns::wire::from_hickory_record;
use devdns_domain::{DnsResponse, DomainError, ResponseCode};
use hickory_proto::op::{Message, MessageType};
use tracing::debug;

pub struct ResponseParser;

impl ResponseParser {
    /// Decodes an upstream reply, checking it answers the query sent with
    /// `expected_id`. Answer and authority sections are carried over as-is.
    pub fn parse(response_bytes: &[u8], expected_id: u16) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidUpstreamResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidUpstreamResponse(
                "message is not a response".to_string(),
            ));
        }
        if message.id() != expected_id {
            return Err(DomainError::InvalidUpstreamResponse(format!(
                "ID mismatch: expected {}, got {}",
                expected_id,
                message.id()
            )));
        }

        let records = message
            .answers()
            .iter()
            .map(from_hickory_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::InvalidUpstreamResponse(e.to_string()))?;
        let authority = message
            .name_servers()
            .iter()
            .map(from_hickory_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::InvalidUpstreamResponse(e.to_string()))?;

        let response = DnsResponse {
            records,
            authority,
            response_code: ResponseCode::from_u16(u16::from(message.response_code())),
            truncated: message.truncated(),
            authoritative: message.authoritative(),
        };

        debug!(
            rcode = %response.response_code,
            answers = response.records.len(),
            authority = response.authority.len(),
            truncated = response.truncated,
            "DNS response parsed"
        );

        Ok(response)
    }
}
