//! Chunk-table extraction from bundler runtime scripts.
//!
//! The runtime computes chunk URLs with expressions such as
//! `r.p+"static/js/"+e+"."+{0:"963a5d1c",...}[e]+".js"`. Each table is
//! located by an ordered list of anchored patterns (first hit that yields
//! entries wins); the object literal body is then scanned as flat
//! `digits:"value"` pairs rather than parsed as JavaScript.

mod entries;
mod patterns;

use std::collections::BTreeMap;
use thiserror::Error;

pub use entries::{scan_hash_entries, scan_name_entries};

/// Numeric chunk id as emitted by the bundler.
pub type ChunkId = u32;

/// Chunk id → content hash (or friendly name, for overrides).
pub type ChunkTable = BTreeMap<ChunkId, String>;

/// Fatal extraction failure: nothing can be mirrored without both hash tables.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("could not find JS chunk hash map in runtime")]
    JsTableNotFound,
    #[error("could not find CSS chunk hash map in runtime")]
    CssTableNotFound,
}

/// Tables recovered from one runtime script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkTables {
    /// JS chunk id → hash.
    pub js: ChunkTable,
    /// CSS chunk id → hash.
    pub css: ChunkTable,
    /// CSS chunk id → friendly file name; may be empty.
    pub css_names: ChunkTable,
}

/// Extract the JS table, CSS name overrides and CSS table from `runtime`.
pub fn extract_tables(runtime: &str) -> Result<ChunkTables, ExtractError> {
    let js = extract_js_table(runtime)?;
    let css = extract_css_table(runtime)?;
    let css_names = extract_css_names(runtime);
    tracing::debug!(
        js = js.len(),
        css = css.len(),
        css_names = css_names.len(),
        "extracted chunk tables"
    );
    Ok(ChunkTables { js, css, css_names })
}

pub fn extract_js_table(runtime: &str) -> Result<ChunkTable, ExtractError> {
    first_hash_table(runtime, patterns::JS_HASH.as_slice()).ok_or(ExtractError::JsTableNotFound)
}

pub fn extract_css_table(runtime: &str) -> Result<ChunkTable, ExtractError> {
    first_hash_table(runtime, patterns::CSS_HASH.as_slice()).ok_or(ExtractError::CssTableNotFound)
}

/// CSS name overrides, e.g. `({10:"Vote"}[e]||e)`. Missing ⇒ empty.
pub fn extract_css_names(runtime: &str) -> ChunkTable {
    patterns::CSS_NAMES
        .iter()
        .filter_map(|re| re.captures(runtime))
        .filter_map(|caps| caps.get(1))
        .map(|body| scan_name_entries(body.as_str()))
        .next()
        .unwrap_or_default()
}

fn first_hash_table(runtime: &str, locators: &[regex::Regex]) -> Option<ChunkTable> {
    for (i, re) in locators.iter().enumerate() {
        let Some(body) = re.captures(runtime).and_then(|caps| caps.get(1)) else {
            continue;
        };
        let table = scan_hash_entries(body.as_str());
        if table.is_empty() {
            tracing::debug!(pattern = i, "table span matched but held no hash entries");
            continue;
        }
        tracing::debug!(pattern = i, entries = table.len(), "located chunk table");
        return Some(table);
    }
    None
}
