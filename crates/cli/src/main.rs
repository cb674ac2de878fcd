use clap::Parser;
use devdns_domain::CliOverrides;
use std::sync::Arc;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "devdns")]
#[command(version)]
#[command(about = "devdns - Local DNS server for development domains")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Zone file (toml, yaml, json or one record per line)
    #[arg(short = 'z', long, value_name = "FILE")]
    zone: Option<String>,

    /// Upstream servers, tried in order (comma separated or repeated)
    #[arg(short = 'u', long, value_name = "ADDR")]
    upstream: Option<Vec<String>>,

    /// Answer only from the zone, never forward
    #[arg(long, conflicts_with = "upstream")]
    no_upstream: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind,
        zone_file: cli.zone,
        upstream: cli.upstream,
        no_upstream: cli.no_upstream,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting devdns v{}", env!("CARGO_PKG_VERSION"));

    let store = bootstrap::load_zone(&config)?;
    let dns_services = di::DnsServices::new(&config, store).await?;

    server::spawn_reload_on_sighup(config.clone(), dns_services.zone.clone());

    server::start_dns_server(&config.server, Arc::new(dns_services.handler)).await?;

    info!("Server shutdown complete");
    Ok(())
}
