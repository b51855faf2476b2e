//! Bounded worker pool for the fetch+store stage.
//!
//! Workers are blocking tasks (curl and backoff sleeps block), each owning
//! one transport and pulling the next target from a shared cursor.

use anyhow::Result;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;

use super::report::{FailureStage, FetchOutcome, Progress};
use crate::fetch::{Fetcher, TransportFactory};
use crate::retry::RetryPolicy;
use crate::storage;
use crate::targets::AssetTarget;

struct WorkQueue {
    targets: Vec<AssetTarget>,
    next: AtomicUsize,
    completed: AtomicUsize,
}

impl WorkQueue {
    fn claim(&self) -> Option<&AssetTarget> {
        self.targets.get(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Record one finished target; returns its 1-based completion index.
    fn complete(&self) -> usize {
        self.completed.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Fetch and store every target with up to `jobs` workers. Returns one
/// outcome per target, sorted by URL.
pub async fn fetch_all<F: TransportFactory>(
    targets: Vec<AssetTarget>,
    out_dir: &Path,
    factory: Arc<F>,
    policy: RetryPolicy,
    jobs: usize,
    progress: Option<UnboundedSender<Progress>>,
) -> Result<Vec<FetchOutcome>> {
    let total = targets.len();
    if total == 0 {
        return Ok(Vec::new());
    }
    let workers = jobs.clamp(1, total);
    tracing::debug!(targets = total, workers, "starting fetch workers");

    let queue = Arc::new(WorkQueue {
        targets,
        next: AtomicUsize::new(0),
        completed: AtomicUsize::new(0),
    });

    let mut join_set = JoinSet::new();
    for worker in 0..workers {
        let queue = Arc::clone(&queue);
        let factory = Arc::clone(&factory);
        let out_dir = out_dir.to_path_buf();
        let tx = progress.clone();
        join_set.spawn_blocking(move || {
            run_worker(worker, &queue, factory.as_ref(), policy, &out_dir, tx.as_ref())
        });
    }

    let mut outcomes = Vec::with_capacity(total);
    while let Some(res) = join_set.join_next().await {
        outcomes.extend(res.map_err(|e| anyhow::anyhow!("fetch worker join: {}", e))?);
    }
    outcomes.sort_by(|a, b| a.url().as_str().cmp(b.url().as_str()));
    Ok(outcomes)
}

fn run_worker<F: TransportFactory>(
    worker: usize,
    queue: &WorkQueue,
    factory: &F,
    policy: RetryPolicy,
    out_dir: &Path,
    progress: Option<&UnboundedSender<Progress>>,
) -> Vec<FetchOutcome> {
    let mut fetcher = match factory.make_transport() {
        Ok(t) => Ok(Fetcher::new(t, policy)),
        Err(e) => {
            tracing::error!(worker, error = %e, "could not create transport");
            Err(e.to_string())
        }
    };

    let mut outcomes = Vec::new();
    while let Some(target) = queue.claim() {
        let outcome = match fetcher.as_mut() {
            Ok(f) => mirror_one(f, target, out_dir),
            Err(setup) => FetchOutcome::Failed {
                url: target.url.clone(),
                stage: FailureStage::Fetch,
                error: setup.clone(),
            },
        };
        let index = queue.complete();
        if let Some(tx) = progress {
            let _ = tx.send(Progress::Target {
                index,
                total: queue.targets.len(),
                outcome: outcome.clone(),
            });
        }
        outcomes.push(outcome);
    }
    outcomes
}

/// Fetch one target and store it at its mirrored path.
fn mirror_one<T: crate::fetch::Transport>(
    fetcher: &mut Fetcher<T>,
    target: &AssetTarget,
    out_dir: &Path,
) -> FetchOutcome {
    let url = target.url.clone();
    let data = match fetcher.fetch(url.as_str()) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "giving up on target");
            return FetchOutcome::Failed {
                url,
                stage: FailureStage::Fetch,
                error: e.to_string(),
            };
        }
    };
    let path = out_dir.join(&target.rel_path);
    match storage::write_replace(&path, &data) {
        Ok(()) => {
            tracing::debug!(url = %url, path = %path.display(), bytes = data.len(), "stored target");
            FetchOutcome::Stored {
                url,
                path,
                bytes: data.len(),
            }
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "could not store target");
            FetchOutcome::Failed {
                url,
                stage: FailureStage::Storage,
                error: e.to_string(),
            }
        }
    }
}
