use super::forwarding::RecordTypeMapper;
use super::transport::tcp::MAX_TCP_MESSAGE_SIZE;
use super::wire::{from_hickory_name, to_hickory_record};
use devdns_application::use_cases::Resolver;
use devdns_domain::{DnsQuery, DnsResponse, DomainError, Transport};
use hickory_proto::op::{Edns, Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::{DNSClass, Record};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

/// UDP payload limit for clients that do not advertise EDNS(0).
pub const MAX_UDP_SIZE_NO_EDNS: usize = 512;
/// Upper bound applied to the payload size a client advertises.
pub const MAX_UDP_SIZE_EDNS: usize = 4096;

/// Turns raw query bytes into raw reply bytes.
///
/// Stateless apart from the shared resolver, so one handler serves every
/// listener task.
pub struct QueryHandler {
    resolver: Arc<Resolver>,
}

impl QueryHandler {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Self { resolver }
    }

    /// Returns `None` when nothing should be sent back: the bytes are not a
    /// DNS message, or the message is itself a response.
    pub async fn handle(
        &self,
        raw: &[u8],
        transport: Transport,
        client: SocketAddr,
    ) -> Option<Vec<u8>> {
        let request = match Message::from_vec(raw) {
            Ok(message) => message,
            Err(e) => {
                debug!(client = %client, transport = %transport, error = %e, "Dropping undecodable query");
                return None;
            }
        };

        if request.message_type() != MessageType::Query {
            debug!(client = %client, id = request.id(), "Ignoring DNS response sent as query");
            return None;
        }

        let query = match parse_question(&request, transport, client) {
            Ok(query) => query,
            Err((rcode, e)) => {
                debug!(client = %client, id = request.id(), rcode = %rcode, error = %e, "Rejecting query");
                return encode_error(&request, rcode);
            }
        };

        let response = self.resolver.resolve(&query).await;
        let limit = size_limit(&request, transport);

        match encode_response(&request, &response, limit) {
            Ok(bytes) => {
                debug!(
                    client = %client,
                    domain = %query.name,
                    record_type = %query.record_type,
                    rcode = %response.response_code,
                    bytes = bytes.len(),
                    "Query answered"
                );
                Some(bytes)
            }
            Err(e) => {
                warn!(domain = %query.name, error = %e, "Failed to encode response");
                encode_error(&request, ResponseCode::ServFail)
            }
        }
    }
}

fn parse_question(
    request: &Message,
    transport: Transport,
    client: SocketAddr,
) -> Result<DnsQuery, (ResponseCode, DomainError)> {
    if request.op_code() != OpCode::Query {
        return Err((
            ResponseCode::NotImp,
            DomainError::MalformedQuery(format!("unsupported opcode {:?}", request.op_code())),
        ));
    }

    let [question] = request.queries() else {
        return Err((
            ResponseCode::FormErr,
            DomainError::MalformedQuery(format!(
                "expected exactly one question, got {}",
                request.queries().len()
            )),
        ));
    };

    if question.query_class() != DNSClass::IN {
        return Err((
            ResponseCode::NotImp,
            DomainError::MalformedQuery(format!("unsupported class {}", question.query_class())),
        ));
    }

    let name = from_hickory_name(question.name()).map_err(|e| (ResponseCode::FormErr, e))?;
    let record_type = RecordTypeMapper::from_hickory(question.query_type());

    Ok(DnsQuery::new(name, record_type)
        .with_transport(transport)
        .with_client(client))
}

fn size_limit(request: &Message, transport: Transport) -> usize {
    match transport {
        Transport::Tcp => MAX_TCP_MESSAGE_SIZE,
        Transport::Udp => request
            .extensions()
            .as_ref()
            .map(|edns| (edns.max_payload() as usize).clamp(MAX_UDP_SIZE_NO_EDNS, MAX_UDP_SIZE_EDNS))
            .unwrap_or(MAX_UDP_SIZE_NO_EDNS),
    }
}

/// Encodes `response` as a reply to `request`. When the full reply does not
/// fit in `limit` bytes it is re-encoded with TC set, no authority section
/// and as many leading answers as fit.
pub fn encode_response(
    request: &Message,
    response: &DnsResponse,
    limit: usize,
) -> Result<Vec<u8>, DomainError> {
    let answers = response
        .records
        .iter()
        .map(to_hickory_record)
        .collect::<Result<Vec<_>, _>>()?;
    let authority = response
        .authority
        .iter()
        .map(to_hickory_record)
        .collect::<Result<Vec<_>, _>>()?;

    let full = reply_message(request, response, &answers, &authority, response.truncated);
    let bytes = serialize(&full)?;
    if bytes.len() <= limit {
        return Ok(bytes);
    }

    debug!(
        id = request.id(),
        size = bytes.len(),
        limit,
        answers = answers.len(),
        "Response exceeds size limit, truncating"
    );

    let mut kept = answers.len();
    loop {
        kept = kept.saturating_sub(1);
        let truncated = reply_message(request, response, &answers[..kept], &[], true);
        let bytes = serialize(&truncated)?;
        if bytes.len() <= limit || kept == 0 {
            return Ok(bytes);
        }
    }
}

fn reply_message(
    request: &Message,
    response: &DnsResponse,
    answers: &[Record],
    authority: &[Record],
    truncated: bool,
) -> Message {
    let rcode: ResponseCode = response.response_code.to_u16().into();
    let mut message = reply_header(request, rcode);
    message
        .set_authoritative(response.authoritative)
        .set_truncated(truncated);
    for record in answers {
        message.add_answer(record.clone());
    }
    for record in authority {
        message.add_name_server(record.clone());
    }
    message
}

fn reply_header(request: &Message, rcode: ResponseCode) -> Message {
    let mut message = Message::new();
    message
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true)
        .set_response_code(rcode);
    for question in request.queries() {
        message.add_query(question.clone());
    }
    if request.extensions().is_some() {
        let mut edns = Edns::new();
        edns.set_max_payload(MAX_UDP_SIZE_EDNS as u16);
        message.set_edns(edns);
    }
    message
}

fn encode_error(request: &Message, rcode: ResponseCode) -> Option<Vec<u8>> {
    match reply_header(request, rcode).to_vec() {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(id = request.id(), error = %e, "Failed to serialize error response");
            None
        }
    }
}

fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
    message
        .to_vec()
        .map_err(|e| DomainError::MalformedQuery(format!("Failed to serialize response: {}", e)))
}
