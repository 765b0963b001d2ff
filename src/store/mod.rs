//! Remote DNS record store.
//!
//! This module provides:
//! - DNS record and zone value types ([`Record`], [`RecordType`], [`ZoneInfo`])
//! - The tagged outcome of reads and deletes ([`Lookup`])
//! - The store abstraction the reconciler works against ([`RecordStore`])
//! - The NS1 REST implementation ([`Ns1Store`])

mod ns1;
mod record;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use ns1::Ns1Store;
pub use record::{Record, RecordType, ZoneInfo};

use std::future::Future;

use thiserror::Error;

use crate::transport::HttpError;

/// Outcome of reading (or deleting) something in the remote store.
///
/// "Not found" is a normal branch for the reconciler (it triggers a create,
/// or makes a delete a no-op), so it is kept apart from real failures
/// instead of being folded into an error channel.
#[derive(Debug)]
pub enum Lookup<T> {
    /// The object exists (for deletes: it existed and was removed).
    Found(T),

    /// The object does not exist.
    NotFound,

    /// The store could not answer.
    Failed(StoreError),
}

impl<T> Lookup<T> {
    /// Returns `true` for [`Lookup::Found`].
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns `true` for [`Lookup::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Maps the found value, keeping the other variants.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::NotFound => Lookup::NotFound,
            Self::Failed(e) => Lookup::Failed(e),
        }
    }
}

/// Errors returned by a [`RecordStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The HTTP request did not complete.
    #[error("HTTP request failed: {0}")]
    Http(#[from] HttpError),

    /// The API answered with an unexpected status.
    #[error("API returned {status}: {message}")]
    Api {
        /// HTTP status of the response
        status: http::StatusCode,
        /// Message from the response body, or the raw body
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Failed to decode API response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The record could not be encoded.
    #[error("Failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response carried a record type this agent does not manage.
    #[error("Unexpected record type '{0}' in response")]
    UnexpectedType(String),

    /// The API base URL cannot carry path segments.
    #[error("Invalid API endpoint '{0}'")]
    InvalidEndpoint(String),

    /// The API key is not usable as an HTTP header value.
    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidApiKey,
}

/// Abstraction over a remote DNS record store.
///
/// Records are addressed by `(zone, name, type)`. Implementations perform a
/// single remote call per method and never retry; the daemon's next cycle
/// is the retry.
pub trait RecordStore: Send + Sync {
    /// Reads zone metadata.
    fn get_zone(&self, zone: &str) -> impl Future<Output = Lookup<ZoneInfo>> + Send;

    /// Reads the record at `(zone, name, record_type)`.
    fn get_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
    ) -> impl Future<Output = Lookup<Record>> + Send;

    /// Creates a record, returning the stored version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record could not be created.
    fn create_record(
        &self,
        record: &Record,
    ) -> impl Future<Output = Result<Record, StoreError>> + Send;

    /// Overwrites an existing record identified by its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record could not be updated.
    fn update_record(
        &self,
        record: &Record,
    ) -> impl Future<Output = Result<Record, StoreError>> + Send;

    /// Deletes the record at `(zone, name, record_type)`.
    ///
    /// [`Lookup::NotFound`] means there was nothing to delete.
    fn delete_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
    ) -> impl Future<Output = Lookup<()>> + Send;
}
