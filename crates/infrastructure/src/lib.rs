//! devdns infrastructure: DNS wire format, upstream transports and the
//! query handler used by the listeners.
pub mod dns;
