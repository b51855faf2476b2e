//! Runtime ("bootstrap") script retrieval.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use url::Url;

use crate::fetch::{Fetcher, TransportFactory};
use crate::retry::RetryPolicy;
use crate::storage;

/// The fetched runtime script. Held in memory for the duration of a run.
#[derive(Debug, Clone)]
pub struct BootstrapDocument {
    pub url: Url,
    pub bytes: Vec<u8>,
    /// Lossy UTF-8 decoding of `bytes`.
    pub text: String,
}

impl BootstrapDocument {
    pub fn new(url: Url, bytes: Vec<u8>) -> Self {
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Self { url, bytes, text }
    }
}

/// Fetch the runtime script with retry. Blocking.
pub fn fetch_bootstrap<F: TransportFactory>(
    factory: &F,
    policy: RetryPolicy,
    url: &Url,
) -> Result<BootstrapDocument> {
    let transport = factory
        .make_transport()
        .context("failed to set up HTTP transport")?;
    let bytes = Fetcher::new(transport, policy)
        .fetch(url.as_str())
        .with_context(|| format!("failed to fetch runtime {}", url))?;
    tracing::info!(url = %url, bytes = bytes.len(), "fetched runtime");
    Ok(BootstrapDocument::new(url.clone(), bytes))
}

/// Save the runtime itself into the mirror. Failure is logged, not fatal.
pub fn save_bootstrap(out_dir: &Path, doc: &BootstrapDocument) -> Option<PathBuf> {
    match storage::store(out_dir, doc.url.path(), &doc.bytes) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(url = %doc.url, error = %e, "could not save runtime script");
            None
        }
    }
}
