//! CLI for chunkmirror.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use chunkmirror_core::config;
use std::path::PathBuf;

use commands::{run_fetch, run_mirror_list, FetchArgs};

/// Every target succeeded.
pub const EXIT_OK: i32 = 0;
/// Bad input, unreachable runtime, or no chunk tables found.
pub const EXIT_FATAL: i32 = 1;
/// The run finished but at least one target failed.
pub const EXIT_PARTIAL: i32 = 2;

/// Top-level CLI for chunkmirror.
#[derive(Debug, Parser)]
#[command(name = "chunkmirror")]
#[command(about = "Mirror the JS/CSS chunks referenced by a bundler runtime script", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a runtime.*.js and mirror every JS/CSS chunk it references.
    Fetch {
        /// Full URL of the runtime script, e.g. https://host/wap/static/js/runtime.<hash>.js
        #[arg(long)]
        runtime_url: String,
        /// Output folder; files are saved under their URL path.
        #[arg(long, default_value = "mirror", value_name = "DIR")]
        out: PathBuf,
        /// Override origin (scheme+host) used for chunk URLs. Default: the runtime URL's origin.
        #[arg(long, value_name = "URL")]
        origin: Option<String>,
        /// Override the public path (e.g. /jsb-wap/). Default: parsed from the runtime.
        #[arg(long, value_name = "PATH")]
        public_path: Option<String>,
        /// User-Agent header. Default: from config.
        #[arg(long)]
        user_agent: Option<String>,
        /// Number of concurrent chunk downloads. Default: from config.
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Mirror a list of URLs (one per line) keeping host and path, skipping existing files.
    MirrorList {
        /// File with one URL per line; `#` starts a comment.
        list: PathBuf,
        /// Output folder; files are saved under <host>/<path>.
        #[arg(long, default_value = "images_out", value_name = "DIR")]
        out: PathBuf,
        /// User-Agent header. Default: from config.
        #[arg(long)]
        user_agent: Option<String>,
    },
}

impl CliCommand {
    /// Parse args, run the command, and return the process exit status.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                runtime_url,
                out,
                origin,
                public_path,
                user_agent,
                jobs,
            } => {
                let args = FetchArgs {
                    runtime_url,
                    out,
                    origin,
                    public_path,
                    user_agent,
                    jobs,
                };
                run_fetch(&cfg, args).await
            }
            CliCommand::MirrorList {
                list,
                out,
                user_agent,
            } => run_mirror_list(&cfg, &list, &out, user_agent.as_deref()).await,
        }
    }
}

#[cfg(test)]
mod tests;
