//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Default configuration file location.
pub const CONFIG_PATH: &str = "/etc/ns1-ddns/config.toml";

/// Default output path of the `init` subcommand.
pub const INIT_OUTPUT: &str = "ns1-ddns.toml";

/// Default check interval in seconds.
pub const INTERVAL_SECS: u64 = 300;

/// Default IPv4 lookup endpoint.
pub const IPV4_QUERY: &str = "https://ipv4bot.whatismyipaddress.com/";

/// Default IPv6 lookup endpoint.
pub const IPV6_QUERY: &str = "https://ipv6bot.whatismyipaddress.com/";

/// Default NS1 API base URL.
pub const API_ENDPOINT: &str = "https://api.nsone.net/v1/";
