use super::RecordStore;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::info;

/// Shared, atomically replaceable view of the zone.
///
/// Readers take a snapshot and keep using it for the whole query even if a
/// reload publishes a new store meanwhile.
pub struct ZoneHandle {
    store: ArcSwap<RecordStore>,
}

impl ZoneHandle {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store: ArcSwap::from_pointee(store),
        }
    }

    pub fn snapshot(&self) -> Arc<RecordStore> {
        self.store.load_full()
    }

    pub fn replace(&self, store: RecordStore) {
        let records = store.len();
        self.store.store(Arc::new(store));
        info!(records, "Zone replaced");
    }

    pub fn len(&self) -> usize {
        self.store.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.load().is_empty()
    }
}

impl Default for ZoneHandle {
    fn default() -> Self {
        Self::new(RecordStore::empty())
    }
}
