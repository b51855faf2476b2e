//! Run orchestration: runtime → base path → tables → targets → mirror.
//!
//! Extraction failures abort the run before any chunk is requested;
//! per-target failures become [`FetchOutcome::Failed`] and the batch goes on.

mod bootstrap;
mod pool;
mod report;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

pub use bootstrap::{fetch_bootstrap, save_bootstrap, BootstrapDocument};
pub use pool::fetch_all;
pub use report::{FailureStage, FetchOutcome, Progress, RunReport};

use crate::base_path::resolve_base_path;
use crate::extract::extract_tables;
use crate::fetch::{HttpOptions, TransportFactory};
use crate::retry::RetryPolicy;
use crate::targets::{build_targets, resolve_origin, AssetKind};

/// Everything one mirror run needs; built by the CLI from args and config.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub runtime_url: Url,
    pub out_dir: PathBuf,
    /// Replaces the runtime URL's origin for chunk URLs.
    pub origin_override: Option<String>,
    /// Replaces the detected public path.
    pub base_path_override: Option<String>,
    pub http: HttpOptions,
    pub retry: RetryPolicy,
    /// Fetch worker count (at least 1).
    pub jobs: usize,
}

impl RunConfig {
    pub fn new(runtime_url: Url, out_dir: PathBuf) -> Self {
        Self {
            runtime_url,
            out_dir,
            origin_override: None,
            base_path_override: None,
            http: HttpOptions::default(),
            retry: RetryPolicy::default(),
            jobs: 1,
        }
    }
}

/// Mirror the runtime at `cfg.runtime_url` and every chunk it references, over curl.
pub async fn run_mirror(
    cfg: &RunConfig,
    progress: Option<UnboundedSender<Progress>>,
) -> Result<RunReport> {
    run_mirror_with(cfg, Arc::new(cfg.http.clone()), progress).await
}

/// Like [`run_mirror`] with a caller-supplied transport factory.
pub async fn run_mirror_with<F: TransportFactory>(
    cfg: &RunConfig,
    factory: Arc<F>,
    progress: Option<UnboundedSender<Progress>>,
) -> Result<RunReport> {
    let origin = resolve_origin(&cfg.runtime_url, cfg.origin_override.as_deref())?;

    let (doc, bootstrap_path) = {
        let factory = Arc::clone(&factory);
        let policy = cfg.retry;
        let url = cfg.runtime_url.clone();
        let out_dir = cfg.out_dir.clone();
        tokio::task::spawn_blocking(move || -> Result<_> {
            let doc = fetch_bootstrap(factory.as_ref(), policy, &url)?;
            let saved = save_bootstrap(&out_dir, &doc);
            Ok((doc, saved))
        })
        .await
        .context("runtime fetch task")??
    };

    let base_path = resolve_base_path(&doc.text, cfg.base_path_override.as_deref());
    let tables = extract_tables(&doc.text)?;
    let targets = build_targets(&base_path, &origin, &tables);
    tracing::info!(
        base_path = %base_path,
        origin = %origin,
        js = tables.js.len(),
        css = tables.css.len(),
        targets = targets.len(),
        "built chunk targets"
    );

    if let Some(tx) = &progress {
        let js_targets = targets.iter().filter(|t| t.kind == AssetKind::Js).count();
        let _ = tx.send(Progress::Discovered {
            bootstrap_path: bootstrap_path.clone(),
            base_path: base_path.clone(),
            origin: origin.clone(),
            js_chunks: tables.js.len(),
            css_chunks: tables.css.len(),
            js_targets,
            css_targets: targets.len() - js_targets,
        });
    }

    let total = targets.len();
    let outcomes = fetch_all(targets, &cfg.out_dir, factory, cfg.retry, cfg.jobs, progress).await?;
    debug_assert_eq!(outcomes.len(), total);

    let report = RunReport {
        runtime_url: cfg.runtime_url.clone(),
        bootstrap_path,
        base_path,
        origin,
        js_chunks: tables.js.len(),
        css_chunks: tables.css.len(),
        outcomes,
    };
    tracing::info!(
        runtime = %report.runtime_url,
        ok = report.succeeded(),
        failed = report.failed(),
        "mirror run finished"
    );
    Ok(report)
}
