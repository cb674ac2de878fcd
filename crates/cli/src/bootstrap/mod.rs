use devdns_application::services::RecordStore;
use devdns_domain::{CliOverrides, Config, ZoneFile};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}

/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Reads the configured zone file. No file configured gives an empty zone.
pub fn load_zone(config: &Config) -> anyhow::Result<RecordStore> {
    let Some(path) = config.zone.file.as_deref() else {
        info!("No zone file configured, every query is forwarded");
        return Ok(RecordStore::new(Vec::new(), config.zone.max_cname_hops));
    };

    let zone = ZoneFile::load(path, config.zone.format)?;
    info!(path, records = zone.records.len(), "Zone file loaded");
    Ok(RecordStore::new(zone.records, config.zone.max_cname_hops))
}
