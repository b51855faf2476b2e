//! CLI command handlers. Each command is in its own file.

mod fetch;
mod mirror_list;

pub use fetch::{build_run_config, run_fetch, FetchArgs};
pub use mirror_list::run_mirror_list;
