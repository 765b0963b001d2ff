//! The daemon scheduler.

use std::convert::Infallible;
use std::time::Duration;

use super::{CycleOutcome, DaemonError, Phase};
use crate::reconcile::{DomainSpec, Operation, Reconciler};
use crate::resolver::AddressResolver;
use crate::store::{Lookup, RecordStore};
use crate::time::{Sleeper, TokioSleeper};

/// Resolves public addresses and reconciles records on a fixed interval.
///
/// Cycles never overlap: the interval is slept after a cycle completes.
///
/// # Type Parameters
///
/// * `R` - The [`AddressResolver`] producing the observed addresses
/// * `S` - The [`RecordStore`] holding the records
/// * `Z` - The [`Sleeper`] used between cycles (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```ignore
/// use ns1_ddns::daemon::Daemon;
/// use ns1_ddns::reconcile::Reconciler;
/// use std::time::Duration;
///
/// let daemon = Daemon::new(resolver, store, Reconciler::new("example.com"), domains, Duration::from_secs(300));
/// let error = daemon.run().await.unwrap_err();
/// eprintln!("bootstrap failed: {error}");
/// ```
#[derive(Debug)]
pub struct Daemon<R, S, Z = TokioSleeper> {
    resolver: R,
    store: S,
    reconciler: Reconciler,
    domains: Vec<DomainSpec>,
    interval: Duration,
    sleeper: Z,
}

impl<R, S> Daemon<R, S, TokioSleeper>
where
    R: AddressResolver,
    S: RecordStore,
{
    /// Creates a daemon sleeping on the Tokio timer.
    #[must_use]
    pub const fn new(
        resolver: R,
        store: S,
        reconciler: Reconciler,
        domains: Vec<DomainSpec>,
        interval: Duration,
    ) -> Self {
        Self {
            resolver,
            store,
            reconciler,
            domains,
            interval,
            sleeper: TokioSleeper,
        }
    }
}

impl<R, S, Z> Daemon<R, S, Z>
where
    R: AddressResolver,
    S: RecordStore,
    Z: Sleeper,
{
    /// Replaces the sleeper used between cycles.
    #[must_use]
    pub fn with_sleeper<Z2: Sleeper>(self, sleeper: Z2) -> Daemon<R, S, Z2> {
        Daemon {
            resolver: self.resolver,
            store: self.store,
            reconciler: self.reconciler,
            domains: self.domains,
            interval: self.interval,
            sleeper,
        }
    }

    /// Returns the interval between cycles.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the record store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the address resolver.
    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Runs the bootstrap cycle, then steady-state cycles forever.
    ///
    /// # Errors
    ///
    /// Only returns if the bootstrap cycle fails. The failure has already
    /// been logged as an error event carrying its `operation`.
    pub async fn run(&self) -> Result<Infallible, DaemonError> {
        let outcome = match self.cycle(Phase::Bootstrap).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    operation = %e.operation(),
                    error = %e,
                    "Bootstrap failed"
                );
                return Err(e);
            }
        };
        log_outcome(&outcome);

        loop {
            self.sleeper.sleep(self.interval).await;
            // Steady-state cycles cannot fail fatally.
            if let Ok(outcome) = self.cycle(Phase::SteadyState).await {
                log_outcome(&outcome);
            }
        }
    }

    /// Runs exactly one cycle in the given phase.
    ///
    /// # Errors
    ///
    /// In [`Phase::Bootstrap`], returns [`DaemonError`] if resolution fails
    /// or the zone is missing or unreadable. [`Phase::SteadyState`] cycles
    /// never fail.
    pub async fn cycle(&self, phase: Phase) -> Result<CycleOutcome, DaemonError> {
        let observed = match self.resolver.resolve().await {
            Ok(observed) => observed,
            Err(e) => match phase {
                Phase::Bootstrap => return Err(DaemonError::Resolve(e)),
                Phase::SteadyState => {
                    tracing::error!(
                        operation = %Operation::Resolve,
                        error = %e,
                        "Failed to resolve public addresses, skipping cycle"
                    );
                    return Ok(CycleOutcome::Skipped);
                }
            },
        };
        tracing::debug!("Observed addresses: {observed}");

        if phase == Phase::Bootstrap {
            self.check_zone().await?;
        }

        let report = self
            .reconciler
            .reconcile(&self.store, &self.domains, &observed)
            .await;
        Ok(CycleOutcome::Reconciled(report))
    }

    async fn check_zone(&self) -> Result<(), DaemonError> {
        let zone = self.reconciler.zone();
        match self.store.get_zone(zone).await {
            Lookup::Found(info) => {
                tracing::info!("Managing zone {}", info.zone);
                Ok(())
            }
            Lookup::NotFound => Err(DaemonError::ZoneMissing {
                zone: zone.to_string(),
            }),
            Lookup::Failed(source) => Err(DaemonError::Zone {
                zone: zone.to_string(),
                source,
            }),
        }
    }
}

fn log_outcome(outcome: &CycleOutcome) {
    let Some(report) = outcome.report() else {
        return;
    };
    if report.writes() > 0 || !report.is_clean() {
        tracing::info!("Cycle finished: {report}");
    } else {
        tracing::debug!("Cycle finished: {report}");
    }
}
