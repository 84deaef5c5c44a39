//! Reimport cache gate
//!
//! The host engine maintains its own asset cache inside the project. A
//! single marker file stands in for "the import pass has run at least once";
//! this is a presence check, not a content hash, so edits after a successful
//! import are not detected until the project is cleared.

use std::path::{Path, PathBuf};

/// Engine-internal cache directory inside the project
pub const ENGINE_CACHE_DIR: &str = ".spxhost";

/// Marker file the engine writes on a completed import pass
pub const REIMPORT_MARKER: &str = "uid_cache.bin";

/// Path of the reimport marker for a project
pub fn marker_path(project_dir: &Path) -> PathBuf {
    project_dir.join(ENGINE_CACHE_DIR).join(REIMPORT_MARKER)
}

/// Whether the engine's headless import pass must run.
///
/// True exactly when the marker is absent and the tool is not in runtime
/// mode (runtime mode never re-imports).
pub fn should_reimport(project_dir: &Path, runtime_mode: bool) -> bool {
    !runtime_mode && !marker_path(project_dir).exists()
}
