pub mod config;
pub mod logging;

pub mod base_path;
pub mod extract;
pub mod fetch;
pub mod mirror;
pub mod retry;
pub mod storage;
pub mod targets;
pub mod url_list;
