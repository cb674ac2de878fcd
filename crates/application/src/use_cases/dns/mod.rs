mod resolve_query;

pub use resolve_query::{Resolver, TtlDefaults};
