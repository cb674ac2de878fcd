#![allow(dead_code)]
use devdns_infrastructure::dns::transport::tcp::{read_with_length_prefix, send_with_length_prefix};
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// How the mock upstream answers.
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// One A record with the given address.
    Answer(Ipv4Addr),
    NxDomain,
    /// Receives queries and never replies.
    Silent,
    /// Replies over UDP with TC set and no answers; TCP gets the full answer.
    Truncate(Ipv4Addr),
    /// Replies with a transaction ID that does not match the query.
    WrongId(Ipv4Addr),
}

/// Local upstream serving UDP and TCP on the same port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_hits: Arc<AtomicUsize>,
    tcp_hits: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let udp_hits = Arc::new(AtomicUsize::new(0));
        let tcp_hits = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_counter = Arc::clone(&udp_hits);
        let tcp_counter = Arc::clone(&tcp_hits);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::build_mock_response(&buf[..len], behavior, false) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            tcp_counter.fetch_add(1, Ordering::SeqCst);
                            tokio::spawn(async move {
                                if let Ok(query) = read_with_length_prefix(&mut stream).await {
                                    if let Some(response) = Self::build_mock_response(&query, behavior, true) {
                                        let _ = send_with_length_prefix(&mut stream, &response).await;
                                    }
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_hits,
            tcp_hits,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_hits(&self) -> usize {
        self.udp_hits.load(Ordering::SeqCst)
    }

    pub fn tcp_hits(&self) -> usize {
        self.tcp_hits.load(Ordering::SeqCst)
    }

    fn build_mock_response(query: &[u8], behavior: MockBehavior, over_tcp: bool) -> Option<Vec<u8>> {
        let request = Message::from_vec(query).ok()?;
        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_op_code(request.op_code())
            .set_recursion_desired(request.recursion_desired())
            .set_recursion_available(true);
        for question in request.queries() {
            response.add_query(question.clone());
        }
        let name = request.queries().first()?.name().clone();

        match behavior {
            MockBehavior::Silent => return None,
            MockBehavior::NxDomain => {
                response.set_response_code(ResponseCode::NXDomain);
            }
            MockBehavior::Answer(ip) => {
                response.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
            }
            MockBehavior::Truncate(ip) => {
                if over_tcp {
                    response.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
                } else {
                    response.set_truncated(true);
                }
            }
            MockBehavior::WrongId(ip) => {
                response.set_id(request.id().wrapping_add(1));
                response.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
            }
        }

        response.to_vec().ok()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
