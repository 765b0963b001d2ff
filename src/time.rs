//! Time abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait that allows injecting instant
//! sleepers in tests while using the Tokio timer in production.

use std::future::Future;
use std::time::Duration;

/// Abstraction over waiting for a period of time.
///
/// The daemon loop waits through this trait between cycles, so tests can
/// run many cycles without real delays.
///
/// # Example
///
/// ```
/// use ns1_ddns::time::{InstantSleeper, Sleeper};
/// use std::time::Duration;
///
/// # async fn example() {
/// InstantSleeper.sleep(Duration::from_secs(300)).await;
/// # }
/// ```
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Sleeper that returns immediately, for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }
}
