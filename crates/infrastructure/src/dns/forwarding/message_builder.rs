//! DNS Message Builder
//!
//! Constructs upstream query messages in wire format using `hickory-proto`.

use super::record_type_map::RecordTypeMapper;
use crate::dns::wire::to_hickory_name;
use devdns_domain::{DnsQuery, DomainError};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::DNSClass;

pub struct MessageBuilder;

impl MessageBuilder {
    /// Builds a recursive query for `query` and returns its ID with the
    /// serialized bytes.
    ///
    /// The message carries a random ID, the RD flag and a single question.
    pub fn build_query_with_id(query: &DnsQuery) -> Result<(u16, Vec<u8>), DomainError> {
        let id = fastrand::u16(..);
        let message = Self::query_message(id, query)?;
        let bytes = message.to_vec().map_err(|e| {
            DomainError::MalformedQuery(format!("Failed to serialize DNS message: {}", e))
        })?;
        Ok((id, bytes))
    }

    fn query_message(id: u16, query: &DnsQuery) -> Result<Message, DomainError> {
        let mut question = Query::new();
        question.set_name(to_hickory_name(&query.name)?);
        question.set_query_type(RecordTypeMapper::to_hickory(&query.record_type));
        question.set_query_class(DNSClass::IN);

        let mut message = Message::new();
        message
            .set_id(id)
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true)
            .add_query(question);
        Ok(message)
    }
}
