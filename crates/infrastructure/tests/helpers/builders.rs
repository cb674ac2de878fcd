#![allow(dead_code)]
use devdns_application::ports::UpstreamClient;
use devdns_application::services::{RecordStore, ZoneHandle};
use devdns_application::use_cases::Resolver;
use devdns_domain::{DnsQuery, DnsRecord, DomainName, RecordData, RecordType};
use devdns_infrastructure::dns::QueryHandler;
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType as HickoryRecordType};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

pub const CLIENT: SocketAddr = SocketAddr::V4(std::net::SocketAddrV4::new(
    std::net::Ipv4Addr::new(127, 0, 0, 1),
    40000,
));

pub fn name(s: &str) -> DomainName {
    DomainName::new(s).unwrap()
}

pub fn query(domain: &str, record_type: RecordType) -> DnsQuery {
    DnsQuery::new(name(domain), record_type)
}

pub fn a(owner: &str, addr: &str) -> DnsRecord {
    DnsRecord::new(name(owner), RecordData::A(addr.parse().unwrap()))
}

pub fn txt(owner: &str, text: &str) -> DnsRecord {
    DnsRecord::new(name(owner), RecordData::TXT(vec![text.to_string()]))
}

pub fn handler(records: Vec<DnsRecord>, upstream: Option<Arc<dyn UpstreamClient>>) -> QueryHandler {
    let zone = Arc::new(ZoneHandle::new(RecordStore::new(records, 8)));
    QueryHandler::new(Arc::new(Resolver::new(zone, upstream)))
}

/// Wire-format query with RD set and an optional EDNS payload size.
pub struct WireQueryBuilder {
    id: u16,
    op_code: OpCode,
    questions: Vec<(String, HickoryRecordType)>,
    edns_payload: Option<u16>,
}

impl WireQueryBuilder {
    pub fn new(domain: &str, record_type: HickoryRecordType) -> Self {
        Self {
            id: 0x1234,
            op_code: OpCode::Query,
            questions: vec![(domain.to_string(), record_type)],
            edns_payload: None,
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn op_code(mut self, op_code: OpCode) -> Self {
        self.op_code = op_code;
        self
    }

    pub fn question(mut self, domain: &str, record_type: HickoryRecordType) -> Self {
        self.questions.push((domain.to_string(), record_type));
        self
    }

    pub fn no_questions(mut self) -> Self {
        self.questions.clear();
        self
    }

    pub fn edns(mut self, payload: u16) -> Self {
        self.edns_payload = Some(payload);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut message = Message::new();
        message
            .set_id(self.id)
            .set_message_type(MessageType::Query)
            .set_op_code(self.op_code)
            .set_recursion_desired(true);
        for (domain, record_type) in self.questions {
            let mut question = Query::new();
            question
                .set_name(Name::from_str(&domain).unwrap())
                .set_query_type(record_type)
                .set_query_class(DNSClass::IN);
            message.add_query(question);
        }
        if let Some(payload) = self.edns_payload {
            let mut edns = Edns::new();
            edns.set_max_payload(payload);
            message.set_edns(edns);
        }
        message.to_vec().unwrap()
    }
}
