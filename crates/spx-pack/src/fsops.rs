//! File staging helpers used by export actions

use crate::{PackError, PackResult};
use std::path::Path;

/// Recursively copy a directory tree.
pub fn copy_dir_all(src: &Path, dst: &Path) -> PackResult<()> {
    std::fs::create_dir_all(dst).map_err(|e| PackError::io(dst, e))?;

    let entries = std::fs::read_dir(src).map_err(|e| PackError::io(src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| PackError::io(src, e))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| PackError::io(&src_path, e))?;

        if file_type.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            copy_file(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Copy a single file, creating the destination's parent directory.
pub fn copy_file(src: &Path, dst: &Path) -> PackResult<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PackError::io(parent, e))?;
    }
    std::fs::copy(src, dst).map_err(|e| PackError::io(src, e))?;
    Ok(())
}

/// Move every file in `src_dir` whose name ends with `suffix` into
/// `dst_dir`. Returns the number of files moved.
pub fn move_files_by_suffix(src_dir: &Path, dst_dir: &Path, suffix: &str) -> PackResult<usize> {
    std::fs::create_dir_all(dst_dir).map_err(|e| PackError::io(dst_dir, e))?;

    let mut moved = 0;
    let entries = std::fs::read_dir(src_dir).map_err(|e| PackError::io(src_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| PackError::io(src_dir, e))?;
        let name = entry.file_name();
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && name.to_string_lossy().ends_with(suffix) {
            let dst = dst_dir.join(&name);
            std::fs::rename(entry.path(), &dst).map_err(|e| PackError::io(entry.path(), e))?;
            moved += 1;
        }
    }
    Ok(moved)
}
