//! # Scan Orchestration
//!
//! Drives the per-host pipeline over a host list:
//!
//! 1. read `host.ip_v4_address`, skipping hosts without one;
//! 2. reject addresses that are not dotted quads;
//! 3. scan through the injected [`HostScanner`];
//! 4. persist the output through the injected [`ArtifactStore`].
//!
//! Every failure in these steps belongs to a single host. It is logged,
//! recorded as a [`Diagnostic`] and the loop carries on. Results come back in
//! host-list order no matter how many scans run at once.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Semaphore, watch};
use tokio::task::{self, JoinSet};
use tracing::{debug, error, warn};

use sweepr_common::address::is_valid_address;
use sweepr_common::artifacts::{ArtifactStore, artifact_name};
use sweepr_common::config::Config;
use sweepr_common::document::{HostEntry, ScanResult};
use sweepr_common::error::{ArtifactError, HostError};
use sweepr_common::scanning::HostScanner;
use sweepr_common::success;

use crate::artifacts::FileArtifactStore;
use crate::executor::CommandScanner;

type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// One per-host problem, tagged with the host's position in the list.
#[derive(Debug)]
pub struct Diagnostic {
    pub index: usize,
    pub address: Option<String>,
    pub error: HostError,
}

#[derive(Debug, Default)]
pub struct SweepReport {
    /// Number of host entries considered.
    pub total: usize,
    /// Successful scans, in host-list order.
    pub results: Vec<ScanResult>,
    /// Per-host problems, in host-list order.
    pub diagnostics: Vec<Diagnostic>,
}

impl SweepReport {
    /// Hosts that produced no result.
    pub fn skipped(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| !d.error.keeps_result())
            .count()
    }
}

struct HostOutcome {
    index: usize,
    result: Option<ScanResult>,
    diagnostics: Vec<Diagnostic>,
}

impl HostOutcome {
    fn failed(index: usize, address: Option<String>, error: HostError) -> Self {
        Self {
            index,
            result: None,
            diagnostics: vec![Diagnostic {
                index,
                address,
                error,
            }],
        }
    }
}

pub struct ScanOrchestrator {
    scanner: Arc<dyn HostScanner>,
    store: Arc<dyn ArtifactStore>,
    jobs: usize,
    cancel: Option<watch::Receiver<bool>>,
    on_host_done: Option<Arc<ProgressFn>>,
}

impl ScanOrchestrator {
    pub fn new(scanner: Arc<dyn HostScanner>, store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            scanner,
            store,
            jobs: 1,
            cancel: None,
            on_host_done: None,
        }
    }

    /// Wires the external-command scanner and file artifacts from `cfg`.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            Arc::new(CommandScanner::from_config(cfg)),
            Arc::new(FileArtifactStore::new(cfg.artifact_dir.clone())),
        )
        .with_jobs(cfg.workers())
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Once `signal` turns `true` no further scan is launched and running
    /// scans are abandoned (their child processes are killed).
    pub fn with_cancellation(mut self, signal: watch::Receiver<bool>) -> Self {
        self.cancel = Some(signal);
        self
    }

    /// Called with `(finished, total)` each time a host is done, whatever
    /// the outcome.
    pub fn on_host_done<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.on_host_done = Some(Arc::new(callback));
        self
    }

    pub async fn run(&self, hosts: &[HostEntry]) -> SweepReport {
        let total = hosts.len();
        let finished = Arc::new(AtomicUsize::new(0));
        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let mut outcomes: Vec<HostOutcome> = Vec::with_capacity(total);
        let mut tasks: JoinSet<HostOutcome> = JoinSet::new();
        let mut in_flight: HashMap<task::Id, (usize, String)> = HashMap::new();

        for (index, entry) in hosts.iter().enumerate() {
            let address = match admit(index, entry) {
                Ok(address) => address,
                Err(outcome) => {
                    outcomes.push(outcome);
                    self.host_done(&finished, total);
                    continue;
                }
            };

            let permit = tokio::select! {
                permit = semaphore.clone().acquire_owned(), if !self.is_cancelled() => permit.ok(),
                _ = cancelled(self.cancel.clone()) => None,
            };
            let Some(permit) = permit else {
                debug!(index, address = %address, "cancelled before launch");
                outcomes.push(HostOutcome::failed(index, Some(address), HostError::Cancelled));
                self.host_done(&finished, total);
                continue;
            };

            let scanner = self.scanner.clone();
            let store = self.store.clone();
            let signal = self.cancel.clone();
            let finished = finished.clone();
            let progress = self.on_host_done.clone();
            let task_address = address.clone();

            let handle = tasks.spawn(async move {
                let outcome = scan_host(index, task_address, scanner, store, signal).await;
                drop(permit);
                let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(cb) = progress {
                    cb(done, total);
                }
                outcome
            });
            in_flight.insert(handle.id(), (index, address));
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, outcome)) => outcomes.push(outcome),
                Err(e) => {
                    let Some((index, address)) = in_flight.remove(&e.id()) else {
                        error!("scan task aborted: {e}");
                        continue;
                    };
                    error!(index, address = %address, "scan task aborted: {e}");
                    outcomes.push(HostOutcome::failed(
                        index,
                        Some(address),
                        HostError::Aborted(e.to_string()),
                    ));
                    self.host_done(&finished, total);
                }
            }
        }

        outcomes.sort_by_key(|outcome| outcome.index);

        let mut report = SweepReport {
            total,
            ..SweepReport::default()
        };
        for outcome in outcomes {
            report.results.extend(outcome.result);
            report.diagnostics.extend(outcome.diagnostics);
        }
        report
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    fn host_done(&self, finished: &AtomicUsize, total: usize) {
        let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(cb) = &self.on_host_done {
            cb(done, total);
        }
    }
}

/// Reads and validates the address of one entry.
fn admit(index: usize, entry: &HostEntry) -> Result<String, HostOutcome> {
    let address = match entry.address() {
        Ok(address) => address,
        Err(error) => {
            warn!(index, "skipping host: {error}");
            return Err(HostOutcome::failed(index, None, error));
        }
    };

    if !is_valid_address(address) {
        warn!(index, address, "skipping host: malformed IPv4 address {address:?}");
        return Err(HostOutcome::failed(
            index,
            Some(address.to_string()),
            HostError::InvalidAddress(address.to_string()),
        ));
    }

    Ok(address.to_string())
}

async fn scan_host(
    index: usize,
    address: String,
    scanner: Arc<dyn HostScanner>,
    store: Arc<dyn ArtifactStore>,
    signal: Option<watch::Receiver<bool>>,
) -> HostOutcome {
    let scanned = tokio::select! {
        scanned = scanner.scan(&address) => scanned,
        _ = cancelled(signal) => Err(HostError::Cancelled),
    };

    let result = match scanned {
        Ok(result) => result,
        Err(error) => {
            error!(index, address = %address, "scan failed: {error}");
            return HostOutcome::failed(index, Some(address), error);
        }
    };

    // File IO runs on the blocking pool so slow disks do not stall other scans.
    let persisted = task::spawn_blocking({
        let result = result.clone();
        move || store.persist(&result)
    })
    .await
    .unwrap_or_else(|e| {
        Err(ArtifactError {
            path: PathBuf::from(artifact_name(&address)),
            source: io::Error::other(e),
        })
    });

    let mut diagnostics = Vec::new();
    match persisted {
        Ok(path) => success!(index, address = %address, "scan saved to {}", path.display()),
        Err(e) => {
            // The output is still merged into the document.
            warn!(index, address = %address, "{e}");
            diagnostics.push(Diagnostic {
                index,
                address: Some(address),
                error: e.into(),
            });
        }
    }

    HostOutcome {
        index,
        result: Some(result),
        diagnostics,
    }
}

/// Resolves once `signal` reads `true`. Never resolves without a signal, or
/// after the sending side is gone.
async fn cancelled(signal: Option<watch::Receiver<bool>>) {
    if let Some(mut rx) = signal {
        if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
            return;
        }
    }
    std::future::pending::<()>().await
}
