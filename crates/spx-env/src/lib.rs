//! spx environment and path resolution
//!
//! Provides the project-layout model shared by the build and packaging
//! crates:
//! - Project path derivation (target / project / generated-source / web)
//! - Host engine binary discovery and validation
//! - Generated-module dependency descriptor adaptation
//! - Reimport cache gate
//! - Read-only template trees for project scaffolding
//!
//! # Path Derivation
//!
//! All paths derive from a single target directory, resolved against the
//! invocation working directory exactly once:
//!
//! ```no_run
//! use spx_env::ProjectContext;
//!
//! let ctx = ProjectContext::resolve(".", "project", "0.3.0").unwrap();
//! assert!(ctx.go_dir.ends_with("project/go"));
//! ```

pub mod context;
pub mod engine;
pub mod modgraph;
pub mod reimport;
pub mod templates;

use std::path::PathBuf;
use thiserror::Error;

/// Environment and path resolution errors
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Failed to resolve path {path}: {error}")]
    PathResolution { path: PathBuf, error: String },

    #[error("Invalid server address '{0}': expected host:port")]
    InvalidServerAddress(String),

    #[error(
        "Engine binary '{name}' not found on PATH or in {search_dir}; \
         install it or build the engine from source"
    )]
    EngineBinaryNotFound { name: String, search_dir: PathBuf },

    #[error("No *{suffix} file found in {dir}: not a valid project directory")]
    ProjectMarkerMissing { suffix: String, dir: PathBuf },

    #[error("I/O error at {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl EnvError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            error,
        }
    }
}

/// Result type for environment operations
pub type EnvResult<T> = Result<T, EnvError>;

// Re-export main types
pub use context::{check_env, parse_server_addr, ProjectContext, FILE_SUFFIX, PROJECT_REL_DIR};
pub use engine::{find_in_path, resolve_engine_binary, ResolvedEngine, ENGINE_NAME};
pub use modgraph::{adapt_module_graph, MODULE_PATH};
pub use reimport::{marker_path, should_reimport, ENGINE_CACHE_DIR};
pub use templates::{ProjectTemplates, TemplateEntry, TemplateProvider};
