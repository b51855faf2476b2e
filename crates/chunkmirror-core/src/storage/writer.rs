//! Replace-on-rename file writer.

use std::fs;
use std::io::Write;
use std::path::Path;

use super::{temp_path, StorageError};

fn io_err<'a>(
    op: &'static str,
    path: &'a Path,
) -> impl FnOnce(std::io::Error) -> StorageError + 'a {
    move |source| StorageError::Io {
        op,
        path: path.to_path_buf(),
        source,
    }
}

/// Write `data` to `final_path` via a `.part` temp file and rename.
/// Missing parent directories are created; concurrent creation of the same
/// directory by another worker is not an error.
pub fn write_replace(final_path: &Path, data: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = final_path.parent() {
        fs::create_dir_all(parent).map_err(io_err("create dir", parent))?;
    }

    let tmp = temp_path(final_path);
    let result = (|| -> Result<(), StorageError> {
        let mut file = fs::File::create(&tmp).map_err(io_err("create", &tmp))?;
        file.write_all(data).map_err(io_err("write", &tmp))?;
        file.flush().map_err(io_err("flush", &tmp))?;
        drop(file);
        fs::rename(&tmp, final_path).map_err(io_err("rename", final_path))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
