//! devdns application layer: zone lookups and the resolution use case.
pub mod ports;
pub mod services;
pub mod use_cases;
