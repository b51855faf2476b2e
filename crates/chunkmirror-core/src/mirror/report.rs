//! Per-target outcomes and the aggregated run report.

use std::path::PathBuf;
use url::Url;

/// Where a failed target gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Fetch,
    Storage,
}

/// Result of mirroring one target. Failures are kept, never dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Stored {
        url: Url,
        path: PathBuf,
        bytes: usize,
    },
    Failed {
        url: Url,
        stage: FailureStage,
        error: String,
    },
}

impl FetchOutcome {
    pub fn url(&self) -> &Url {
        match self {
            FetchOutcome::Stored { url, .. } | FetchOutcome::Failed { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Stored { .. })
    }
}

/// Progress events for presentation layers.
#[derive(Debug, Clone)]
pub enum Progress {
    /// Sent once, after extraction and before any chunk is fetched.
    Discovered {
        bootstrap_path: Option<PathBuf>,
        base_path: String,
        origin: Url,
        js_chunks: usize,
        css_chunks: usize,
        /// Deduplicated targets per kind.
        js_targets: usize,
        css_targets: usize,
    },
    /// Sent once per target; `index` is 1-based completion order.
    Target {
        index: usize,
        total: usize,
        outcome: FetchOutcome,
    },
}

/// Aggregate of one mirror run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub runtime_url: Url,
    /// Where the runtime script itself was saved, if that succeeded.
    pub bootstrap_path: Option<PathBuf>,
    pub base_path: String,
    pub origin: Url,
    pub js_chunks: usize,
    pub css_chunks: usize,
    /// One outcome per target, sorted by URL.
    pub outcomes: Vec<FetchOutcome>,
}

impl RunReport {
    pub fn targets(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.targets() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &FetchOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}
