//! Error types for address resolution.

use thiserror::Error;

use super::IpFamily;
use crate::transport::HttpError;

/// Error type for public address lookups.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The lookup request could not complete.
    #[error("{family} lookup failed: {source}")]
    Network {
        /// Family being looked up
        family: IpFamily,
        /// Underlying transport error
        #[source]
        source: HttpError,
    },

    /// The lookup endpoint answered with a non-success status.
    #[error("{family} lookup returned HTTP {status}")]
    Status {
        /// Family being looked up
        family: IpFamily,
        /// Status returned by the endpoint
        status: http::StatusCode,
    },

    /// The response body is not an address of the expected family.
    #[error("{family} lookup returned '{body}': {reason}")]
    AddressFormat {
        /// Family being looked up
        family: IpFamily,
        /// Response body (trimmed, lossily decoded)
        body: String,
        /// Why the body was rejected
        reason: &'static str,
    },
}

impl ResolveError {
    /// Returns the family whose lookup failed.
    #[must_use]
    pub const fn family(&self) -> IpFamily {
        match self {
            Self::Network { family, .. }
            | Self::Status { family, .. }
            | Self::AddressFormat { family, .. } => *family,
        }
    }
}
