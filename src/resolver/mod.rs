//! Public IP address discovery.
//!
//! This module provides:
//! - The observed address pair ([`ObservedAddresses`]) and address family ([`IpFamily`])
//! - Lookup endpoint configuration ([`QueryEndpoints`])
//! - The resolver abstraction ([`AddressResolver`])
//! - The HTTP "what is my IP" implementation ([`HttpResolver`])

mod error;
mod lookup;


pub use error::ResolveError;
pub use lookup::HttpResolver;

use std::fmt;
use std::future::Future;
use std::net::{Ipv4Addr, Ipv6Addr};

use url::Url;

/// IP address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpFamily {
    /// IPv4 (A records)
    V4,
    /// IPv6 (AAAA records)
    V6,
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
        }
    }
}

/// Public addresses observed in one cycle.
///
/// A family is `None` when its lookup endpoint is disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservedAddresses {
    /// Public IPv4 address
    pub ipv4: Option<Ipv4Addr>,
    /// Public IPv6 address
    pub ipv6: Option<Ipv6Addr>,
}

impl ObservedAddresses {
    /// Creates an observation with both families present.
    #[must_use]
    pub const fn new(ipv4: Ipv4Addr, ipv6: Ipv6Addr) -> Self {
        Self {
            ipv4: Some(ipv4),
            ipv6: Some(ipv6),
        }
    }

    /// Creates an observation with only an IPv4 address.
    #[must_use]
    pub const fn v4(ipv4: Ipv4Addr) -> Self {
        Self {
            ipv4: Some(ipv4),
            ipv6: None,
        }
    }

    /// Creates an observation with only an IPv6 address.
    #[must_use]
    pub const fn v6(ipv6: Ipv6Addr) -> Self {
        Self {
            ipv4: None,
            ipv6: Some(ipv6),
        }
    }
}

impl fmt::Display for ObservedAddresses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ipv4 = self.ipv4.map_or_else(|| "-".to_string(), |ip| ip.to_string());
        let ipv6 = self.ipv6.map_or_else(|| "-".to_string(), |ip| ip.to_string());
        write!(f, "ipv4={ipv4} ipv6={ipv6}")
    }
}

/// Lookup endpoints returning the caller's address as a bare literal.
///
/// `None` disables that family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryEndpoints {
    /// Endpoint answering with the public IPv4 address
    pub ipv4: Option<Url>,
    /// Endpoint answering with the public IPv6 address
    pub ipv6: Option<Url>,
}

impl QueryEndpoints {
    /// Returns the endpoint for a family.
    #[must_use]
    pub const fn get(&self, family: IpFamily) -> Option<&Url> {
        match family {
            IpFamily::V4 => self.ipv4.as_ref(),
            IpFamily::V6 => self.ipv6.as_ref(),
        }
    }
}

/// Trait for discovering the current public addresses.
///
/// Implementations do not retry; the caller owns the retry policy.
pub trait AddressResolver: Send + Sync {
    /// Resolves the current public addresses.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if any enabled lookup fails or answers with
    /// something that is not an address of the expected family.
    fn resolve(&self) -> impl Future<Output = Result<ObservedAddresses, ResolveError>> + Send;
}
