//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::HeaderValue;
use url::Url;

use crate::reconcile::DomainSpec;
use crate::resolver::{IpFamily, QueryEndpoints};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::{DomainSection, TomlConfig};

/// NS1 API key.
///
/// Both `Debug` and `Display` print a redacted placeholder; use
/// [`ApiKey::expose`] to get the actual value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns the key itself.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// Without TOML the domains come from `--domains` (simple mode); with TOML they
/// come from the `[[Domain]]` tables.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Zone in which the records live
    pub zone: String,

    /// NS1 API key
    pub api_key: ApiKey,

    /// Interval between checks
    pub interval: Duration,

    /// NS1 API base URL
    pub api_endpoint: Url,

    /// Public address lookup endpoints
    pub query: QueryEndpoints,

    /// Managed domains, in configuration order
    pub domains: Vec<DomainSpec>,

    /// Dry-run mode (read records, log changes without writing them)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let endpoint_str = |family| {
            self.query
                .get(family)
                .map_or_else(|| "disabled".to_string(), ToString::to_string)
        };

        write!(
            f,
            "Config {{ zone: {}, api_key: {}, interval: {}s, api_endpoint: {}, \
             ipv4_query: {}, ipv6_query: {}, domains: {}, dry_run: {} }}",
            self.zone,
            self.api_key,
            self.interval.as_secs(),
            self.api_endpoint,
            endpoint_str(IpFamily::V4),
            endpoint_str(IpFamily::V6),
            self.domains.len(),
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// Explicit CLI arguments take precedence over TOML config values, which
    /// take precedence over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing (`api_key`, `zone`, `domains`)
    /// - A URL is invalid or not http(s)
    /// - The API key is not a valid HTTP header value
    /// - Both address lookups are disabled
    /// - The interval is zero
    /// - A domain name is empty
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let api_key = Self::resolve_api_key(cli, toml)?;
        let zone = Self::resolve_zone(cli, toml)?;
        let interval = Self::resolve_interval(cli, toml)?;
        let api_endpoint = Self::resolve_api_endpoint(cli, toml)?;
        let query = Self::resolve_query(cli, toml)?;

        let domains = match toml {
            Some(toml) => Self::domains_from_toml(&toml.domains)?,
            None => Self::domains_from_cli(cli, &query)?,
        };

        Ok(Self {
            zone,
            api_key,
            interval,
            api_endpoint,
            query,
            domains,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and, unless in simple mode,
    /// the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.simple {
            return Self::from_raw(cli, None);
        }

        let toml = TomlConfig::load(&cli.config)?;
        Self::from_raw(cli, Some(&toml))
    }

    /// Returns the domains wanting an address family whose lookup is disabled.
    ///
    /// Those sub-operations are never performed.
    #[must_use]
    pub fn unreachable_families(&self) -> Vec<(&str, IpFamily)> {
        let mut unreachable = Vec::new();
        for domain in &self.domains {
            if domain.want_ipv4 && self.query.ipv4.is_none() {
                unreachable.push((domain.name.as_str(), IpFamily::V4));
            }
            if domain.want_ipv6 && self.query.ipv6.is_none() {
                unreachable.push((domain.name.as_str(), IpFamily::V6));
            }
        }
        unreachable
    }

    fn resolve_api_key(cli: &Cli, toml: Option<&TomlConfig>) -> Result<ApiKey, ConfigError> {
        // CLI takes precedence
        cli.key
            .as_deref()
            .or_else(|| toml.and_then(|t| t.basic.api_key.as_deref()))
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ConfigError::missing(field::API_KEY, "Use --key or set Basic.APIKey in config file")
            })
            .and_then(|key| {
                HeaderValue::from_str(key).map_err(|_| ConfigError::InvalidApiKey)?;
                Ok(ApiKey(key.to_string()))
            })
    }

    fn resolve_zone(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        cli.zone
            .as_deref()
            .or_else(|| toml.and_then(|t| t.basic.zone.as_deref()))
            .map(str::trim)
            .filter(|zone| !zone.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| {
                ConfigError::missing(field::ZONE, "Use --zone or set Basic.Zone in config file")
            })
    }

    fn resolve_interval(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .interval
            .or_else(|| toml.and_then(|t| t.basic.interval))
            .unwrap_or(defaults::INTERVAL_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "interval",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_api_endpoint(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let endpoint = cli
            .api_endpoint
            .as_deref()
            .or_else(|| toml.and_then(|t| t.basic.endpoint.as_deref()))
            .unwrap_or(defaults::API_ENDPOINT);

        parse_http_url(endpoint)
    }

    fn resolve_query(cli: &Cli, toml: Option<&TomlConfig>) -> Result<QueryEndpoints, ConfigError> {
        let section = toml.map(|t| &t.query_addresses);

        let ipv4 = cli
            .ipv4_query
            .as_deref()
            .or_else(|| section.and_then(|s| s.ipv4.as_deref()))
            .unwrap_or(defaults::IPV4_QUERY);

        let ipv6 = cli
            .ipv6_query
            .as_deref()
            .or_else(|| section.and_then(|s| s.ipv6.as_deref()))
            .unwrap_or(defaults::IPV6_QUERY);

        let query = QueryEndpoints {
            ipv4: parse_optional_url(ipv4)?,
            ipv6: parse_optional_url(ipv6)?,
        };
        if query.ipv4.is_none() && query.ipv6.is_none() {
            return Err(ConfigError::NoAddressLookup);
        }
        Ok(query)
    }

    fn domains_from_toml(sections: &[DomainSection]) -> Result<Vec<DomainSpec>, ConfigError> {
        if sections.is_empty() {
            return Err(ConfigError::missing(
                field::DOMAINS,
                "Add at least one [[Domain]] table to the config file",
            ));
        }

        sections
            .iter()
            .map(|section| {
                let name = validate_domain_name(&section.name)?;
                Ok(DomainSpec::new(name)
                    .with_ipv4(section.ipv4)
                    .with_ipv6(section.ipv6)
                    .with_replace(section.replace))
            })
            .collect()
    }

    /// Simple mode: every domain follows the enabled lookups.
    fn domains_from_cli(
        cli: &Cli,
        query: &QueryEndpoints,
    ) -> Result<Vec<DomainSpec>, ConfigError> {
        let names = cli.domain_names();
        if names.is_empty() {
            return Err(ConfigError::missing(
                field::DOMAINS,
                "Use --domains in simple mode",
            ));
        }

        names
            .iter()
            .map(|name| {
                let name = validate_domain_name(name)?;
                Ok(DomainSpec::new(name)
                    .with_ipv4(query.ipv4.is_some())
                    .with_ipv6(query.ipv6.is_some())
                    .with_replace(cli.replace))
            })
            .collect()
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn validate_domain_name(name: &str) -> Result<String, ConfigError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidDomain {
            name: name.to_string(),
            reason: "name must not be empty",
        });
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidDomain {
            name: name.to_string(),
            reason: "name must not contain whitespace",
        });
    }
    Ok(trimmed.to_string())
}

fn parse_optional_url(s: &str) -> Result<Option<Url>, ConfigError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_http_url(trimmed).map(Some)
}

fn parse_http_url(s: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(s).map_err(|e| ConfigError::InvalidUrl {
        url: s.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::InvalidUrl {
            url: s.to_string(),
            reason: format!("unsupported scheme '{scheme}', expected http or https"),
        }),
    }
}
