//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// Scalar fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Account and schedule settings
    #[serde(rename = "Basic", default)]
    pub basic: BasicSection,

    /// Public address lookup endpoints
    #[serde(rename = "QueryAddresses", default)]
    pub query_addresses: QuerySection,

    /// Managed domains, one `[[Domain]]` table each
    #[serde(rename = "Domain", default)]
    pub domains: Vec<DomainSection>,
}

/// `[Basic]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BasicSection {
    /// Check interval in seconds
    #[serde(rename = "Interval")]
    pub interval: Option<u64>,

    /// NS1 API key
    #[serde(rename = "APIKey")]
    pub api_key: Option<String>,

    /// Zone in which the records live
    #[serde(rename = "Zone")]
    pub zone: Option<String>,

    /// NS1 API base URL
    #[serde(rename = "Endpoint")]
    pub endpoint: Option<String>,
}

/// `[QueryAddresses]` section.
///
/// A missing key falls back to the built-in endpoint; an empty string
/// disables the family.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuerySection {
    /// IPv4 lookup URL
    #[serde(rename = "IPv4")]
    pub ipv4: Option<String>,

    /// IPv6 lookup URL
    #[serde(rename = "IPv6")]
    pub ipv6: Option<String>,
}

/// One `[[Domain]]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainSection {
    /// Fully qualified domain name
    #[serde(rename = "Name")]
    pub name: String,

    /// Keep an A record
    #[serde(rename = "IPv4", default)]
    pub ipv4: bool,

    /// Keep an AAAA record
    #[serde(rename = "IPv6", default)]
    pub ipv6: bool,

    /// Remove conflicting records
    #[serde(rename = "Replace", default)]
    pub replace: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# NS1 DDNS Configuration File

[Basic]
# Check interval in seconds (default: 300, can be overridden by --interval)
Interval = 300

# NS1 API key (required, can be overridden by --key)
APIKey = "your-api-key"

# Zone in which the records live (required, can be overridden by --zone)
Zone = "example.com"

# NS1 API base URL (default shown)
# Endpoint = "https://api.nsone.net/v1/"

[QueryAddresses]
# URLs answering with the bare public address.
# Leave a value empty to disable that address family.
IPv4 = "https://ipv4bot.whatismyipaddress.com/"
IPv6 = "https://ipv6bot.whatismyipaddress.com/"

# One [[Domain]] table per managed name.
# IPv4/IPv6 select which address records are kept up to date.
# Replace removes conflicting records: always CNAME, plus A or AAAA
# when that family is disabled for the domain.
[[Domain]]
Name = "home.example.com"
IPv4 = true
IPv6 = true
Replace = false

# [[Domain]]
# Name = "vpn.example.com"
# IPv4 = true
# IPv6 = false
# Replace = true
"#
    .to_string()
}
