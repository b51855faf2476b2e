//! Mirrored store: persist fetched bytes under an output root at the
//! location given by the remote URL's path.
//!
//! Writes go to a `.part` sibling first and are renamed onto the final
//! name, so a completed run never leaves half-written assets behind.

mod path;
mod writer;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use path::{host_mirror_path, mirror_path, relative_mirror_path};
pub use writer::write_replace;

/// Temporary file suffix used before the rename onto the final name.
pub const TEMP_SUFFIX: &str = ".part";

#[derive(Debug, Error)]
pub enum StorageError {
    /// URL path that cannot be mapped under the output root.
    #[error("unsafe mirror path {path:?}: {reason}")]
    UnsafePath { path: String, reason: &'static str },
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Path for the temp file: appends `.part` to the final path (e.g. `a.js` → `a.js.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Store `data` at `out_root` + `url_path`, creating directories as needed and
/// replacing any existing file. Returns the written path.
pub fn store(out_root: &Path, url_path: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
    let local = mirror_path(out_root, url_path)?;
    write_replace(&local, data)?;
    tracing::debug!(path = %local.display(), bytes = data.len(), "stored");
    Ok(local)
}
