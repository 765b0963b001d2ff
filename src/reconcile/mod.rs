//! Desired-state reconciliation of DNS records.
//!
//! This module provides:
//! - The per-domain desired state ([`DomainSpec`])
//! - The reconciliation engine ([`Reconciler`])
//! - Per-cycle results ([`CycleReport`], [`Action`], [`Failure`])

mod reconciler;
mod report;

#[cfg(test)]
mod reconciler_tests;

pub use reconciler::{MANAGED_TTL, Reconciler};
pub use report::{Action, CycleReport, Failure, Operation, OperationError, Outcome};

use crate::store::RecordType;

/// Desired state for one managed domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSpec {
    /// Fully qualified domain name
    pub name: String,
    /// Keep an A record pointing at the public IPv4 address
    pub want_ipv4: bool,
    /// Keep an AAAA record pointing at the public IPv6 address
    pub want_ipv6: bool,
    /// Remove records that conflict with the managed ones
    pub replace_conflicts: bool,
}

impl DomainSpec {
    /// Creates a domain entry wanting both families, without conflict replacement.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            want_ipv4: true,
            want_ipv6: true,
            replace_conflicts: false,
        }
    }

    /// Sets whether an A record is wanted.
    #[must_use]
    pub const fn with_ipv4(mut self, want: bool) -> Self {
        self.want_ipv4 = want;
        self
    }

    /// Sets whether an AAAA record is wanted.
    #[must_use]
    pub const fn with_ipv6(mut self, want: bool) -> Self {
        self.want_ipv6 = want;
        self
    }

    /// Sets whether conflicting records are removed.
    #[must_use]
    pub const fn with_replace(mut self, replace: bool) -> Self {
        self.replace_conflicts = replace;
        self
    }

    /// Record types removed when conflicts are replaced.
    ///
    /// An unwanted address family is a conflict; CNAME always is, since it
    /// cannot coexist with address records at the same name.
    #[must_use]
    pub fn conflicting_types(&self) -> Vec<RecordType> {
        let mut types = Vec::with_capacity(3);
        if !self.want_ipv4 {
            types.push(RecordType::A);
        }
        if !self.want_ipv6 {
            types.push(RecordType::Aaaa);
        }
        types.push(RecordType::Cname);
        types
    }
}
