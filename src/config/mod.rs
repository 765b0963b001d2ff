//! Configuration layer for NS1 DDNS.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Modes
//!
//! In **file mode** (the default) the config file at `--config` is loaded and
//! the managed domains come from its `[[Domain]]` tables.
//!
//! In **simple mode** (`--simple`) no file is read. The domains come from
//! `--domains`; each wants IPv4 if the IPv4 lookup is enabled, IPv6 if the
//! IPv6 lookup is enabled, and replaces conflicts if `--replace` is given.
//!
//! # Priority
//!
//! Scalar values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - `--key`, `--zone`, `--interval`,
//!    `--api-endpoint`, `--ipv4-query`, `--ipv6-query`
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! An empty lookup URL, from either source, disables that address family.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ApiKey, ValidatedConfig, write_default_config};
