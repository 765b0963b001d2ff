//! Per-cycle reconciliation results.

use std::fmt;

use thiserror::Error;

use crate::store::{RecordType, StoreError};

/// What a sub-operation did (or, in dry-run mode, would have done).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// A missing record was created.
    Created,
    /// A drifted record was rewritten in place.
    Updated,
    /// The record already matched.
    Unchanged,
    /// A conflicting record was removed.
    Deleted,
    /// There was no conflicting record to remove.
    Absent,
}

impl Action {
    /// Returns `true` if the action changes the remote store.
    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Created | Self::Updated | Self::Deleted)
    }
}

/// Operation context attached to reported failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Reading a record
    Read,
    /// Creating a record
    Create,
    /// Updating a record
    Update,
    /// Deleting a record
    Delete,
    /// Checking that the zone exists
    ZoneCheck,
    /// Resolving public addresses
    Resolve,
}

impl Operation {
    /// Returns the operation name used in log events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ZoneCheck => "zone-check",
            Self::Resolve => "resolve",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A store failure tagged with the operation that hit it.
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct OperationError {
    /// Operation that failed
    pub operation: Operation,
    /// Underlying store error
    #[source]
    pub source: StoreError,
}

impl OperationError {
    /// Creates an operation error.
    #[must_use]
    pub const fn new(operation: Operation, source: StoreError) -> Self {
        Self { operation, source }
    }
}

/// Successful sub-operation for one domain and record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Domain name
    pub domain: String,
    /// Record type handled
    pub record_type: RecordType,
    /// What happened
    pub action: Action,
}

/// Failed sub-operation for one domain and record type.
#[derive(Debug)]
pub struct Failure {
    /// Domain name
    pub domain: String,
    /// Record type handled
    pub record_type: RecordType,
    /// The failure
    pub error: OperationError,
}

/// Everything one reconciliation pass did.
#[derive(Debug, Default)]
pub struct CycleReport {
    outcomes: Vec<Outcome>,
    failures: Vec<Failure>,
    dry_run: bool,
}

impl CycleReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new(dry_run: bool) -> Self {
        Self {
            outcomes: Vec::new(),
            failures: Vec::new(),
            dry_run,
        }
    }

    /// Records the result of one sub-operation and emits its log event.
    ///
    /// Failures are emitted at ERROR level with `domain`, `record_type`,
    /// `operation` and `error` fields.
    pub fn record(
        &mut self,
        domain: &str,
        record_type: RecordType,
        result: Result<Action, OperationError>,
    ) {
        match result {
            Ok(action) => {
                self.log_action(domain, record_type, action);
                self.outcomes.push(Outcome {
                    domain: domain.to_string(),
                    record_type,
                    action,
                });
            }
            Err(error) => {
                tracing::error!(
                    domain,
                    record_type = %record_type,
                    operation = %error.operation,
                    error = %error.source,
                    "Failed to {} {record_type} record for {domain}",
                    error.operation,
                );
                self.failures.push(Failure {
                    domain: domain.to_string(),
                    record_type,
                    error,
                });
            }
        }
    }

    fn log_action(&self, domain: &str, record_type: RecordType, action: Action) {
        let prefix = if self.dry_run { "Dry-run: would have " } else { "" };
        match action {
            Action::Created => tracing::info!("{prefix}created {record_type} record for {domain}"),
            Action::Updated => tracing::info!("{prefix}updated {record_type} record for {domain}"),
            Action::Deleted => {
                tracing::info!("{prefix}removed conflicting {record_type} record for {domain}");
            }
            Action::Unchanged => tracing::debug!("{record_type} record for {domain} is up to date"),
            Action::Absent => tracing::debug!("No conflicting {record_type} record for {domain}"),
        }
    }

    /// Returns the successful sub-operations, in execution order.
    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Returns the failed sub-operations, in execution order.
    #[must_use]
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Returns `true` if this pass ran in dry-run mode.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Counts sub-operations that ended with `action`.
    #[must_use]
    pub fn count(&self, action: Action) -> usize {
        self.outcomes.iter().filter(|o| o.action == action).count()
    }

    /// Counts sub-operations that changed the store.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.action.is_write()).count()
    }

    /// Returns `true` if no sub-operation failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} deleted, {} unchanged, {} failed",
            self.count(Action::Created),
            self.count(Action::Updated),
            self.count(Action::Deleted),
            self.count(Action::Unchanged),
            self.failures.len(),
        )
    }
}
