//! `chunkmirror fetch` – mirror a runtime script and its chunks.

use anyhow::{Context, Result};
use chunkmirror_core::config::MirrorConfig;
use chunkmirror_core::mirror::{self, FetchOutcome, Progress, RunConfig};
use chunkmirror_core::targets::resolve_origin;
use std::path::PathBuf;
use url::Url;

use crate::cli::{EXIT_OK, EXIT_PARTIAL};

/// Print an OK line every this many completed targets (failures always print).
const PROGRESS_EVERY: usize = 25;

#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub runtime_url: String,
    pub out: PathBuf,
    pub origin: Option<String>,
    pub public_path: Option<String>,
    pub user_agent: Option<String>,
    pub jobs: Option<usize>,
}

/// Build the orchestrator input from CLI args layered over config.
pub fn build_run_config(cfg: &MirrorConfig, args: FetchArgs) -> Result<RunConfig> {
    let runtime_url = Url::parse(args.runtime_url.trim())
        .with_context(|| format!("invalid --runtime-url {:?}", args.runtime_url))?;
    if !matches!(runtime_url.scheme(), "http" | "https") {
        anyhow::bail!("--runtime-url must be http or https: {}", runtime_url);
    }
    resolve_origin(&runtime_url, args.origin.as_deref())?;
    let mut run = RunConfig::new(runtime_url, args.out);
    run.origin_override = args.origin;
    run.base_path_override = args.public_path;
    run.http = cfg.http_options(args.user_agent.as_deref());
    run.retry = cfg.retry_policy();
    run.jobs = args.jobs.unwrap_or(cfg.max_concurrent_fetches).max(1);
    Ok(run)
}

pub async fn run_fetch(cfg: &MirrorConfig, args: FetchArgs) -> Result<i32> {
    let run = build_run_config(cfg, args)?;
    println!("[+] Fetch runtime: {}", run.runtime_url);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Progress>();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_progress(&event);
        }
    });

    let result = mirror::run_mirror(&run, Some(tx)).await;
    let _ = printer.await;
    let report = result?;

    println!(
        "[+] Done. OK={}, FAIL={}, out={}",
        report.succeeded(),
        report.failed(),
        run.out_dir.display()
    );
    Ok(if report.all_succeeded() {
        EXIT_OK
    } else {
        EXIT_PARTIAL
    })
}

fn print_progress(event: &Progress) {
    match event {
        Progress::Discovered {
            bootstrap_path,
            base_path,
            origin,
            js_chunks,
            css_chunks,
            js_targets,
            css_targets,
        } => {
            if let Some(p) = bootstrap_path {
                println!("    saved -> {}", p.display());
            }
            println!("[+] Using publicPath: {}", base_path);
            println!("[+] Using origin: {}", origin);
            println!("[+] JS chunks: {}", js_chunks);
            println!("[+] CSS chunks: {}", css_chunks);
            println!(
                "[+] Total targets (js+css): {} ({} js, {} css)",
                js_targets + css_targets,
                js_targets,
                css_targets
            );
        }
        Progress::Target {
            index,
            total,
            outcome,
        } => match outcome {
            FetchOutcome::Stored { path, .. } => {
                if index % PROGRESS_EVERY == 0 || index == total {
                    println!("    [{}/{}] OK -> {}", index, total, path.display());
                }
            }
            FetchOutcome::Failed { url, error, .. } => {
                println!("    [{}/{}] FAIL {}: {}", index, total, url, error);
            }
        },
    }
}
