//! Application execution logic.
//!
//! This module wires the validated configuration into the resolver, the NS1
//! store and the daemon, then runs the daemon until a shutdown signal.

use thiserror::Error;
use tokio::signal;

use ns1_ddns::config::ValidatedConfig;
use ns1_ddns::daemon::{Daemon, DaemonError};
use ns1_ddns::reconcile::Reconciler;
use ns1_ddns::resolver::HttpResolver;
use ns1_ddns::store::{Ns1Store, StoreError};
use ns1_ddns::transport::{HttpClient, HttpError, ReqwestClient};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to create the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] HttpError),

    /// Failed to set up the NS1 store.
    #[error("Failed to set up NS1 client: {0}")]
    Store(#[from] StoreError),

    /// The daemon failed to start.
    #[error(transparent)]
    Daemon(#[from] DaemonError),
}

/// Daemon type assembled from a configuration.
type AppDaemon<H> = Daemon<HttpResolver<H>, Ns1Store<H>>;

/// Executes the daemon until shutdown.
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP client cannot be created
/// - The API key is not usable as a header value
/// - The bootstrap cycle fails (resolution, missing or unreadable zone)
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires
/// real network access and signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let daemon = build_daemon(&config, ReqwestClient::new()?)?;

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - records will be read but not written");
    }
    for (domain, family) in config.unreachable_families() {
        tracing::warn!("{domain} wants {family} but the {family} lookup is disabled");
    }
    tracing::info!(
        "Managing {} domain(s) in zone {} (interval: {}s)",
        config.domains.len(),
        config.zone,
        config.interval.as_secs()
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    tokio::select! {
        biased;

        () = &mut shutdown => {
            tracing::info!("Shutdown signal received, stopping...");
            Ok(())
        }

        result = daemon.run() => {
            let Err(e) = result;
            Err(RunError::Daemon(e))
        }
    }
}

/// Builds the daemon for `config` on top of `client`.
fn build_daemon<H>(config: &ValidatedConfig, client: H) -> Result<AppDaemon<H>, RunError>
where
    H: HttpClient + Clone,
{
    let resolver = HttpResolver::new(client.clone(), config.query.clone());
    let store = Ns1Store::new(client, config.api_key.expose())?
        .with_endpoint(config.api_endpoint.clone());
    let reconciler = Reconciler::new(config.zone.as_str()).with_dry_run(config.dry_run);

    Ok(Daemon::new(
        resolver,
        store,
        reconciler,
        config.domains.clone(),
        config.interval,
    ))
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a handler cannot be installed, that signal source is ignored.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
