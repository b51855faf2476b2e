//! `chunkmirror mirror-list <file>` – mirror a fixed URL list.

use anyhow::{Context, Result};
use chunkmirror_core::config::MirrorConfig;
use chunkmirror_core::fetch::Fetcher;
use chunkmirror_core::url_list::{self, ListOutcome, LIST_FETCH_DELAY};
use std::path::Path;

use crate::cli::{EXIT_OK, EXIT_PARTIAL};

pub async fn run_mirror_list(
    cfg: &MirrorConfig,
    list: &Path,
    out: &Path,
    user_agent: Option<&str>,
) -> Result<i32> {
    let text = std::fs::read_to_string(list)
        .with_context(|| format!("failed to read URL list {}", list.display()))?;
    let urls = url_list::parse_url_list(&text)?;
    let http = cfg.http_options(user_agent);
    let policy = cfg.retry_policy();
    let out_dir = out.to_path_buf();

    let report = tokio::task::spawn_blocking(move || -> Result<_> {
        let mut fetcher = Fetcher::curl(&http, policy)?;
        Ok(url_list::mirror_url_list(
            &mut fetcher,
            &urls,
            &out_dir,
            LIST_FETCH_DELAY,
            print_outcome,
        ))
    })
    .await
    .context("url list task")??;

    println!();
    println!(
        "Done. OK={}, SKIP={}, FAIL={}",
        report.fetched(),
        report.skipped(),
        report.failed()
    );
    println!("Saved under: {}/", out.display());
    Ok(if report.failed() == 0 {
        EXIT_OK
    } else {
        EXIT_PARTIAL
    })
}

fn print_outcome(outcome: &ListOutcome) {
    match outcome {
        ListOutcome::Fetched { url, path, .. } => {
            println!("[GET ] {}", url);
            println!("      -> {}", path.display());
        }
        ListOutcome::Skipped { url, .. } => println!("[SKIP] {}", url),
        ListOutcome::Failed { url, error } => println!("[FAIL] {}: {}", url, error),
    }
}
