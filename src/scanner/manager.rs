//! Scan Orchestrator
//!
//! Discovers the repository set, fans it out over a fixed pool of worker
//! tasks and reduces their output into a `ScanResult` on the calling task.
//! Workers never touch the result; they only send into the result and error
//! channels, which close once every worker has exited.

use crate::core::shutdown::ShutdownCoordinator;
use crate::gitlab::client::RestClient;
use crate::gitlab::project::RepositoryDescriptor;
use crate::gitlab::transport::Transport;
use crate::scanner::aggregator::RepositoryAggregator;
use crate::scanner::discovery::discover_repositories;
use crate::scanner::error::{ScanError, ScannerError};
use crate::scanner::progress::ProgressReporter;
use crate::scanner::types::{RepositoryStatistics, ScanOptions, ScanResult};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

type WorkQueue = Arc<Mutex<mpsc::Receiver<RepositoryDescriptor>>>;

/// Drives discovery and the worker pool over one transport
pub struct ScannerManager {
    transport: Arc<dyn Transport>,
}

impl ScannerManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Manager backed by a REST client for `options.host`
    pub fn from_options(options: &ScanOptions) -> Result<Self, ScannerError> {
        let client = RestClient::new(&options.host, &options.token).map_err(|e| {
            ScannerError::Configuration {
                message: e.to_string(),
            }
        })?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Run a complete scan.
    ///
    /// Returns either the full result (which may carry per-repository errors)
    /// or a single fatal error. Cancellation through `shutdown` at any point
    /// before the reducer drains is fatal and discards everything collected.
    pub async fn scan_repositories(
        &self,
        options: &ScanOptions,
        progress: &mut dyn ProgressReporter,
        shutdown: &ShutdownCoordinator,
    ) -> Result<ScanResult, ScannerError> {
        let start = Instant::now();
        if shutdown.is_shutdown_requested() {
            return Err(ScannerError::Cancelled);
        }

        log::info!("Discovering projects");
        let descriptors = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return Err(ScannerError::Cancelled),
            found = discover_repositories(self.transport.as_ref(), options) => found?,
        };

        let total = descriptors.len();
        let mut result = ScanResult {
            total_projects: total,
            ..ScanResult::default()
        };
        progress.start(total);
        if total == 0 {
            progress.finish();
            result.duration = start.elapsed();
            return Ok(result);
        }

        let width = options.effective_workers(total);
        log::info!("Scanning {} projects with {} workers", total, width);

        let (work_tx, work_rx) = mpsc::channel(total);
        for descriptor in descriptors {
            // Capacity equals the item count, so this never waits
            if work_tx.send(descriptor).await.is_err() {
                break;
            }
        }
        drop(work_tx);

        let queue: WorkQueue = Arc::new(Mutex::new(work_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<RepositoryStatistics>(total);
        let (error_tx, mut error_rx) = mpsc::channel::<ScanError>(total);

        let aggregator = RepositoryAggregator::new(self.transport.clone())
            .with_limits(options.limits)
            .with_protected_branch_step(options.protected_branch_step);

        let workers: Vec<JoinHandle<()>> = (0..width)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    aggregator.clone(),
                    queue.clone(),
                    result_tx.clone(),
                    error_tx.clone(),
                    shutdown.clone(),
                ))
            })
            .collect();
        drop(result_tx);
        drop(error_tx);

        let mut results_open = true;
        let mut errors_open = true;
        while results_open || errors_open {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    progress.finish();
                    for worker in &workers {
                        worker.abort();
                    }
                    log::warn!(
                        "Scan cancelled after {} of {} projects",
                        result.processed_projects,
                        total
                    );
                    return Err(ScannerError::Cancelled);
                }
                stats = result_rx.recv(), if results_open => match stats {
                    Some(stats) => {
                        result.processed_projects += 1;
                        progress.describe(&stats.path_with_namespace);
                        progress.update(result.processed_projects);
                        result.repository_stats.push(stats);
                    }
                    None => results_open = false,
                },
                error = error_rx.recv(), if errors_open => match error {
                    Some(error) => {
                        log::warn!("{}", error);
                        result.errors.push(error);
                    }
                    None => errors_open = false,
                },
            }
        }

        progress.finish();
        for worker in workers {
            if let Err(e) = worker.await {
                return Err(ScannerError::Worker {
                    message: e.to_string(),
                });
            }
        }
        // Every dispatched repository must be accounted for
        let accounted = result.repository_stats.len() + result.errors.len();
        if accounted != total {
            return Err(ScannerError::Worker {
                message: format!(
                    "{} of {} projects unaccounted for",
                    total.saturating_sub(accounted),
                    total
                ),
            });
        }

        result.duration = start.elapsed();
        let summary = result.summary();
        log::info!(
            "Scan complete: {} processed, {} errors in {:?}",
            summary.processed_projects,
            summary.error_count,
            summary.duration
        );
        Ok(result)
    }
}

async fn run_worker(
    worker_id: usize,
    aggregator: RepositoryAggregator,
    queue: WorkQueue,
    results: mpsc::Sender<RepositoryStatistics>,
    errors: mpsc::Sender<ScanError>,
    shutdown: ShutdownCoordinator,
) {
    log::trace!("Worker {} started", worker_id);
    loop {
        if shutdown.is_shutdown_requested() {
            break;
        }
        let next = queue.lock().await.recv().await;
        let Some(descriptor) = next else {
            break;
        };

        // A panic inside one aggregation must surface as that repository's
        // error, so each runs in its own task
        let repository = descriptor.display_name();
        let task_aggregator = aggregator.clone();
        let mut task = tokio::spawn(async move { task_aggregator.aggregate(&descriptor).await });
        let outcome = tokio::select! {
            _ = shutdown.cancelled() => {
                task.abort();
                break;
            }
            joined = &mut task => match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::error!("Aggregation of {} failed: {}", repository, e);
                    Err(ScanError::aborted(repository, e.to_string()))
                }
            },
        };
        let sent = match outcome {
            Ok(stats) => results.send(stats).await.is_ok(),
            Err(error) => errors.send(error).await.is_ok(),
        };
        if !sent {
            break;
        }
    }
    log::trace!("Worker {} exiting", worker_id);
}

/// Scan against the REST API described by `options`
pub async fn scan_repositories(
    options: &ScanOptions,
    progress: &mut dyn ProgressReporter,
    shutdown: &ShutdownCoordinator,
) -> Result<ScanResult, ScannerError> {
    ScannerManager::from_options(options)?
        .scan_repositories(options, progress, shutdown)
        .await
}
