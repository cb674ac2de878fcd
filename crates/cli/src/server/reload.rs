use crate::bootstrap;
use devdns_application::services::ZoneHandle;
use devdns_domain::Config;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Re-reads the zone file on every SIGHUP. A file that fails to load leaves
/// the current zone in place.
#[cfg(unix)]
pub fn spawn_reload_on_sighup(config: Config, zone: Arc<ZoneHandle>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(sig) => sig,
        Err(e) => {
            error!(error = %e, "Failed to install SIGHUP handler, zone reload disabled");
            return;
        }
    };

    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("Received SIGHUP, reloading zone");
            reload(&config, &zone);
        }
    });
}

#[cfg(not(unix))]
pub fn spawn_reload_on_sighup(_config: Config, _zone: Arc<ZoneHandle>) {
    warn!("Zone reload on SIGHUP is not available on this platform");
}

#[cfg(unix)]
fn reload(config: &Config, zone: &ZoneHandle) {
    match bootstrap::load_zone(config) {
        Ok(store) => zone.replace(store),
        Err(e) => warn!(
            error = %e,
            records = zone.len(),
            "Zone reload failed, keeping current zone"
        ),
    }
}
