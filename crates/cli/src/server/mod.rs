pub mod dns;
pub mod reload;

pub use dns::start_dns_server;
pub use reload::spawn_reload_on_sighup;
