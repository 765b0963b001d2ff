//! NS1 DDNS: keeps NS1 address records pointed at this host.
//!
//! A library for discovering the host's public IPv4/IPv6 addresses and
//! reconciling A/AAAA records in an NS1 zone to match them.

pub mod config;
pub mod daemon;
pub mod reconcile;
pub mod resolver;
pub mod store;
pub mod time;
pub mod transport;
