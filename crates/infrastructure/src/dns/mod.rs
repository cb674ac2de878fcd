pub mod forwarding;
pub mod handler;
pub mod transport;
pub mod upstream;
pub mod wire;

pub use handler::QueryHandler;
pub use upstream::FailoverUpstreamClient;
