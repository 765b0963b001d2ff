//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::defaults;

/// NS1 DDNS: keeps NS1 address records pointed at this host
///
/// Periodically looks up the public IPv4/IPv6 addresses and creates,
/// updates or removes A/AAAA/CNAME records in an NS1 zone to match.
#[derive(Debug, Parser)]
#[command(name = "ns1-ddns")]
#[command(version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short, default_value = defaults::CONFIG_PATH)]
    pub config: PathBuf,

    /// Simple mode: take all settings from the command line instead of a file
    #[arg(long, short)]
    pub simple: bool,

    /// NS1 API key
    #[arg(long, short)]
    pub key: Option<String>,

    /// Zone in which the records live
    #[arg(long, short)]
    pub zone: Option<String>,

    /// Domains to manage, separated by commas (simple mode)
    #[arg(long, short, value_name = "A,B")]
    pub domains: Option<String>,

    /// Check interval in seconds
    #[arg(long, short)]
    pub interval: Option<u64>,

    /// URL answering with the public IPv4 address (empty to disable)
    #[arg(long = "ipv4-query", short = '4', value_name = "URL")]
    pub ipv4_query: Option<String>,

    /// URL answering with the public IPv6 address (empty to disable)
    #[arg(long = "ipv6-query", short = '6', value_name = "URL")]
    pub ipv6_query: Option<String>,

    /// Replace conflicting records (CNAME, and A/AAAA for disabled families)
    #[arg(long, short)]
    pub replace: bool,

    /// NS1 API base URL
    #[arg(long = "api-endpoint", value_name = "URL")]
    pub api_endpoint: Option<String>,

    /// Test mode - read records and log changes without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for ns1-ddns
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::INIT_OUTPUT)]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns the domain names given with `--domains`.
    ///
    /// Whitespace is removed and empty entries are kept, so that validation
    /// can reject them.
    #[must_use]
    pub fn domain_names(&self) -> Vec<String> {
        self.domains.as_deref().map_or_else(Vec::new, |list| {
            list.split(',')
                .map(|name| name.chars().filter(|c| !c.is_whitespace()).collect())
                .collect()
        })
    }
}
