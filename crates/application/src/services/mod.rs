mod record_store;
mod zone_handle;

pub use record_store::RecordStore;
pub use zone_handle::ZoneHandle;
