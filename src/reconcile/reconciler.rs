//! The reconciliation engine.

use super::{Action, CycleReport, DomainSpec, Operation, OperationError};
use crate::resolver::ObservedAddresses;
use crate::store::{Lookup, Record, RecordStore, RecordType};

/// TTL, in seconds, of every record this agent writes.
pub const MANAGED_TTL: u32 = 60;

/// Drives remote records toward the desired state of each domain.
///
/// Every sub-operation (A sync, AAAA sync, each conflict removal) is
/// independent: a failure is recorded in the [`CycleReport`] and the pass
/// moves on. Nothing is retried within a pass.
#[derive(Debug, Clone)]
pub struct Reconciler {
    zone: String,
    dry_run: bool,
}

impl Reconciler {
    /// Creates a reconciler for `zone`.
    #[must_use]
    pub fn new(zone: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            dry_run: false,
        }
    }

    /// In dry-run mode reads are performed but writes are only logged.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the managed zone.
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Returns `true` if writes are suppressed.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Runs one reconciliation pass over `domains`, in list order.
    pub async fn reconcile<S: RecordStore>(
        &self,
        store: &S,
        domains: &[DomainSpec],
        observed: &ObservedAddresses,
    ) -> CycleReport {
        let mut report = CycleReport::new(self.dry_run);

        for domain in domains {
            self.reconcile_domain(store, domain, observed, &mut report)
                .await;
        }

        report
    }

    async fn reconcile_domain<S: RecordStore>(
        &self,
        store: &S,
        domain: &DomainSpec,
        observed: &ObservedAddresses,
        report: &mut CycleReport,
    ) {
        let name = domain.name.as_str();

        if domain.want_ipv4 {
            match observed.ipv4 {
                Some(ip) => {
                    let result = self
                        .ensure_record(store, name, RecordType::A, &ip.to_string())
                        .await;
                    report.record(name, RecordType::A, result);
                }
                None => tracing::debug!("No IPv4 address observed, skipping A record for {name}"),
            }
        }

        if domain.want_ipv6 {
            match observed.ipv6 {
                Some(ip) => {
                    let result = self
                        .ensure_record(store, name, RecordType::Aaaa, &ip.to_string())
                        .await;
                    report.record(name, RecordType::Aaaa, result);
                }
                None => {
                    tracing::debug!("No IPv6 address observed, skipping AAAA record for {name}");
                }
            }
        }

        if domain.replace_conflicts {
            for record_type in domain.conflicting_types() {
                let result = self.remove_record(store, name, record_type).await;
                report.record(name, record_type, result);
            }
        }
    }

    /// Makes `(zone, name, record_type)` hold exactly `answer` with the
    /// managed TTL.
    ///
    /// A missing record is created. A record whose answers or TTL differ is
    /// updated in place, keeping its identity.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError`] tagged with the failing operation.
    pub async fn ensure_record<S: RecordStore>(
        &self,
        store: &S,
        name: &str,
        record_type: RecordType,
        answer: &str,
    ) -> Result<Action, OperationError> {
        let mut desired = Record::new(
            self.zone.as_str(),
            name,
            record_type,
            MANAGED_TTL,
            vec![answer.to_string()],
        );

        match store.get_record(&self.zone, name, record_type).await {
            Lookup::Failed(e) => Err(OperationError::new(Operation::Read, e)),
            Lookup::NotFound => {
                if !self.dry_run {
                    store
                        .create_record(&desired)
                        .await
                        .map_err(|e| OperationError::new(Operation::Create, e))?;
                }
                Ok(Action::Created)
            }
            Lookup::Found(existing) => {
                if matches_desired(&existing, &desired) {
                    return Ok(Action::Unchanged);
                }
                tracing::debug!(
                    "{record_type} record for {name} differs: ttl={} answers={:?}",
                    existing.ttl,
                    existing.answers
                );
                desired.id = existing.id;
                if !self.dry_run {
                    store
                        .update_record(&desired)
                        .await
                        .map_err(|e| OperationError::new(Operation::Update, e))?;
                }
                Ok(Action::Updated)
            }
        }
    }

    /// Removes `(zone, name, record_type)` if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError`] tagged with the failing operation.
    pub async fn remove_record<S: RecordStore>(
        &self,
        store: &S,
        name: &str,
        record_type: RecordType,
    ) -> Result<Action, OperationError> {
        if self.dry_run {
            return match store.get_record(&self.zone, name, record_type).await {
                Lookup::Found(_) => Ok(Action::Deleted),
                Lookup::NotFound => Ok(Action::Absent),
                Lookup::Failed(e) => Err(OperationError::new(Operation::Read, e)),
            };
        }

        match store.delete_record(&self.zone, name, record_type).await {
            Lookup::Found(()) => Ok(Action::Deleted),
            Lookup::NotFound => Ok(Action::Absent),
            Lookup::Failed(e) => Err(OperationError::new(Operation::Delete, e)),
        }
    }
}

fn matches_desired(existing: &Record, desired: &Record) -> bool {
    existing.ttl == desired.ttl && existing.answers == desired.answers
}
