//! URL path → local path mapping.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use url::Url;

use super::StorageError;

fn unsafe_path(path: &str, reason: &'static str) -> StorageError {
    StorageError::UnsafePath {
        path: path.to_string(),
        reason,
    }
}

/// Map a URL path (e.g. `/wap/static/js/0.abc.js`) to a relative path,
/// keeping every directory segment. Segments are percent-decoded so the file
/// lands under the name a static server would look up. Empty segments are
/// dropped; `.`/`..`, `/`, NUL, backslash and control characters are rejected
/// after decoding.
pub fn relative_mirror_path(url_path: &str) -> Result<PathBuf, StorageError> {
    let mut rel = PathBuf::new();
    for raw in url_path.split('/').filter(|s| !s.is_empty()) {
        let segment = percent_decode_str(raw)
            .decode_utf8()
            .map_err(|_| unsafe_path(url_path, "segment is not UTF-8 after decoding"))?;
        if segment == "." || segment == ".." {
            return Err(unsafe_path(url_path, "dot segment"));
        }
        if segment
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
        {
            return Err(unsafe_path(url_path, "separator or control character"));
        }
        rel.push(segment.as_ref());
    }
    if rel.as_os_str().is_empty() {
        return Err(unsafe_path(url_path, "no path segments"));
    }
    Ok(rel)
}

/// `out_root` joined with the mirrored form of `url_path`.
pub fn mirror_path(out_root: &Path, url_path: &str) -> Result<PathBuf, StorageError> {
    Ok(out_root.join(relative_mirror_path(url_path)?))
}

/// Like [`mirror_path`] but keeps the host as the top-level directory:
/// `https://img.example.com/a/b.png` → `out_root/img.example.com/a/b.png`.
pub fn host_mirror_path(out_root: &Path, url: &Url) -> Result<PathBuf, StorageError> {
    let host = url
        .host_str()
        .ok_or_else(|| unsafe_path(url.as_str(), "URL has no host"))?;
    let host_dir = match url.port() {
        Some(port) => format!("{}_{}", host, port),
        None => host.to_string(),
    };
    let host_dir = relative_mirror_path(&host_dir)?;
    Ok(out_root.join(host_dir).join(relative_mirror_path(url.path())?))
}
