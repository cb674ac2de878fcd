use devdns_domain::config::ServerConfig;
use devdns_domain::Transport;
use devdns_infrastructure::dns::transport::tcp::{read_with_length_prefix, send_with_length_prefix};
use devdns_infrastructure::dns::QueryHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const UDP_RECV_BUFFER: usize = 4096;

pub async fn start_dns_server(config: &ServerConfig, handler: Arc<QueryHandler>) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = config.listen_addr().parse()?;
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let mut join_set: JoinSet<()> = JoinSet::new();

    if config.udp {
        let socket = Arc::new(create_udp_socket(domain, socket_addr)?);
        let handler_udp = handler.clone();
        join_set.spawn(async move {
            run_udp_listener(socket, handler_udp).await;
        });
    }

    if config.tcp {
        let listener = create_tcp_listener(domain, socket_addr)?;
        let idle_timeout = Duration::from_secs(config.tcp_timeout_secs);
        let handler_tcp = handler.clone();
        join_set.spawn(async move {
            run_tcp_listener(listener, handler_tcp, idle_timeout).await;
        });
    }

    info!(
        bind_address = %socket_addr,
        udp = config.udp,
        tcp = config.tcp,
        "DNS server ready"
    );

    while join_set.join_next().await.is_some() {}
    Ok(())
}

async fn run_udp_listener(socket: Arc<UdpSocket>, handler: Arc<QueryHandler>) {
    let mut recv_buf = [0u8; UDP_RECV_BUFFER];

    loop {
        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) => {
                // ICMP port unreachable from an earlier reply surfaces here on some platforms.
                debug!(error = %e, "UDP recv error");
                continue;
            }
        };

        let query: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = handler.clone();
        let socket = socket.clone();
        tokio::spawn(async move {
            if let Some(response) = handler.handle(&query, Transport::Udp, from).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    warn!(client = %from, error = %e, "Failed to send UDP response");
                }
            }
        });
    }
}

async fn run_tcp_listener(listener: TcpListener, handler: Arc<QueryHandler>, idle_timeout: Duration) {
    loop {
        let (stream, from) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "TCP accept error");
                continue;
            }
        };

        let handler = handler.clone();
        tokio::spawn(async move {
            serve_tcp_connection(stream, from, handler, idle_timeout).await;
        });
    }
}

/// One query per connection; the connection is closed after the reply.
async fn serve_tcp_connection(
    mut stream: TcpStream,
    from: SocketAddr,
    handler: Arc<QueryHandler>,
    idle_timeout: Duration,
) {
    let query = match tokio::time::timeout(idle_timeout, read_with_length_prefix(&mut stream)).await {
        Ok(Ok(query)) => query,
        Ok(Err(e)) => {
            debug!(client = %from, error = %e, "Failed to read TCP query");
            return;
        }
        Err(_) => {
            debug!(client = %from, "TCP connection idle, closing");
            return;
        }
    };

    let Some(response) = handler.handle(&query, Transport::Tcp, from).await else {
        return;
    };

    if let Err(e) = send_with_length_prefix(&mut stream, &response).await {
        warn!(client = %from, error = %e, "Failed to send TCP response");
    }
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
