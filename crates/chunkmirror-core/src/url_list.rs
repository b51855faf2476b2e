//! Mirror a fixed list of fully-qualified URLs (e.g. images the runtime
//! never references), keeping the host as the top-level directory and
//! skipping files that already exist.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::fetch::{Fetcher, Transport};
use crate::storage::{host_mirror_path, write_replace};

/// Pause between network fetches so a long list does not hammer one host.
pub const LIST_FETCH_DELAY: Duration = Duration::from_millis(100);

/// Result of mirroring one listed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Fetched { url: Url, path: PathBuf, bytes: usize },
    /// Target file was already present; nothing was requested.
    Skipped { url: Url, path: PathBuf },
    Failed { url: Url, error: String },
}

#[derive(Debug, Clone, Default)]
pub struct ListReport {
    pub outcomes: Vec<ListOutcome>,
}

impl ListReport {
    pub fn fetched(&self) -> usize {
        self.count(|o| matches!(o, ListOutcome::Fetched { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ListOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ListOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ListOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// One URL per line; blank lines and `#` comments are ignored.
pub fn parse_url_list(text: &str) -> Result<Vec<Url>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| Url::parse(line).with_context(|| format!("line {}: invalid URL {:?}", n, line)))
        .collect()
}

/// Mirror `urls` under `out_dir`, sequentially, never aborting on one failure.
/// `on_outcome` is called after each URL (for progress output).
pub fn mirror_url_list<T: Transport>(
    fetcher: &mut Fetcher<T>,
    urls: &[Url],
    out_dir: &Path,
    delay: Duration,
    mut on_outcome: impl FnMut(&ListOutcome),
) -> ListReport {
    let mut report = ListReport::default();
    for url in urls {
        let outcome = mirror_listed(fetcher, url, out_dir);
        let fetched = !matches!(outcome, ListOutcome::Skipped { .. });
        on_outcome(&outcome);
        report.outcomes.push(outcome);
        if fetched && !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
    tracing::info!(
        fetched = report.fetched(),
        skipped = report.skipped(),
        failed = report.failed(),
        "url list mirrored"
    );
    report
}

fn mirror_listed<T: Transport>(fetcher: &mut Fetcher<T>, url: &Url, out_dir: &Path) -> ListOutcome {
    let failed = |error: String| ListOutcome::Failed {
        url: url.clone(),
        error,
    };
    let path = match host_mirror_path(out_dir, url) {
        Ok(p) => p,
        Err(e) => return failed(e.to_string()),
    };
    if path.exists() {
        tracing::debug!(url = %url, "already mirrored");
        return ListOutcome::Skipped {
            url: url.clone(),
            path,
        };
    }
    let data = match fetcher.fetch(url.as_str()) {
        Ok(d) => d,
        Err(e) => return failed(e.to_string()),
    };
    match write_replace(&path, &data) {
        Ok(()) => ListOutcome::Fetched {
            url: url.clone(),
            path,
            bytes: data.len(),
        },
        Err(e) => failed(e.to_string()),
    }
}
