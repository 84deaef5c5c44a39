//! spx packaging and archive engine
//!
//! Turns project trees into reproducible distribution artifacts:
//! - Deterministic zip archives (sorted entries, pinned timestamps and
//!   permissions — output bytes depend only on file content and paths)
//! - Engine resource archives staged from a template tree
//! - A content-hash manifest appended to the web bootstrap script so
//!   clients can detect stale cached binaries

pub mod archive;
pub mod fsops;
pub mod manifest;

use std::path::PathBuf;
use thiserror::Error;

/// Packaging errors
#[derive(Error, Debug)]
pub enum PackError {
    #[error("Archive error at {path}: {error}")]
    Archive { path: PathBuf, error: String },

    #[error("I/O error at {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Environment error: {0}")]
    Env(#[from] spx_env::EnvError),
}

impl PackError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            error,
        }
    }

    /// Create an archive error with path context
    pub fn archive(path: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self::Archive {
            path: path.into(),
            error: error.to_string(),
        }
    }
}

/// Result type for packaging operations
pub type PackResult<T> = Result<T, PackError>;

// Re-export main operations
pub use archive::{pack_dir_files, pack_engine_res, pack_project, IMPORT_SUFFIX};
pub use fsops::{copy_dir_all, copy_file, move_files_by_suffix};
pub use manifest::{compute_file_hash, save_engine_hash, BOOTSTRAP_SCRIPT, ENGINE_ARTIFACTS};
