//! Error types for the daemon.

use thiserror::Error;

use crate::reconcile::Operation;
use crate::resolver::ResolveError;
use crate::store::StoreError;

/// Fatal daemon errors.
///
/// These only arise during bootstrap; later failures are logged and the
/// daemon keeps running.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The public addresses could not be resolved on startup.
    #[error("Failed to resolve public addresses: {0}")]
    Resolve(#[source] ResolveError),

    /// The configured zone does not exist.
    #[error("Zone '{zone}' does not exist")]
    ZoneMissing {
        /// Configured zone
        zone: String,
    },

    /// The configured zone could not be read.
    #[error("Failed to read zone '{zone}': {source}")]
    Zone {
        /// Configured zone
        zone: String,
        /// Underlying store error
        #[source]
        source: StoreError,
    },
}

impl DaemonError {
    /// Step of the bootstrap cycle that failed.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Resolve(_) => Operation::Resolve,
            Self::ZoneMissing { .. } | Self::Zone { .. } => Operation::ZoneCheck,
        }
    }
}
