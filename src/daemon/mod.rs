//! Periodic reconciliation loop.
//!
//! This module provides:
//! - The cycle phases ([`Phase`]) and their results ([`CycleOutcome`])
//! - The scheduler driving resolve and reconcile ([`Daemon`])
//! - Fatal startup errors ([`DaemonError`])

mod error;
mod scheduler;


pub use error::DaemonError;
pub use scheduler::Daemon;

use crate::reconcile::CycleReport;

/// Phase of the daemon's life a cycle runs in.
///
/// The phases differ only in how failures are treated: during
/// [`Phase::Bootstrap`] a resolution or zone failure is fatal, during
/// [`Phase::SteadyState`] a resolution failure skips the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The first cycle after startup
    Bootstrap,
    /// Every later cycle
    SteadyState,
}

/// Result of a cycle that did not fail fatally.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Records were reconciled.
    Reconciled(CycleReport),
    /// Resolution failed and the cycle was skipped.
    Skipped,
}

impl CycleOutcome {
    /// Returns the report of a reconciled cycle.
    #[must_use]
    pub const fn report(&self) -> Option<&CycleReport> {
        match self {
            Self::Reconciled(report) => Some(report),
            Self::Skipped => None,
        }
    }

    /// Returns `true` if the cycle was skipped.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}
