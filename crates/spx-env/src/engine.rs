//! Host engine binary discovery
//!
//! The engine is an external executable driven only through its documented
//! CLI flags. It is never downloaded by this tool: when it cannot be found,
//! resolution fails with an "install or build" diagnostic.

use crate::{EnvError, EnvResult};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Base name of the host engine binary; the versioned binary is
/// `<ENGINE_NAME><version><postfix>`.
pub const ENGINE_NAME: &str = "spxhost";

/// A located, runnable engine binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEngine {
    /// Absolute path to the engine executable
    pub path: PathBuf,
    /// Platform executable postfix (`.exe` on Windows, empty elsewhere)
    pub postfix: &'static str,
}

/// Platform executable postfix
pub fn bin_postfix() -> &'static str {
    if cfg!(windows) {
        ".exe"
    } else {
        ""
    }
}

/// Directory where engine binaries and web runtime templates are installed:
/// `$GOPATH/bin`, falling back to `~/go/bin`.
pub fn go_bin_dir() -> PathBuf {
    let gopath = std::env::var_os("GOPATH")
        .and_then(|v| std::env::split_paths(&v).next())
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("go")
        });
    gopath.join("bin")
}

/// Search the execution PATH for a file with the given name.
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Locate the versioned engine binary.
///
/// The PATH is searched first; a hit counts only if the binary answers a
/// `--version` probe. Otherwise the Go bin directory is checked, repairing
/// missing executable permission bits if needed. Absent everywhere, the
/// caller gets [`EnvError::EngineBinaryNotFound`].
pub fn resolve_engine_binary(name: &str, version: &str) -> EnvResult<ResolvedEngine> {
    let postfix = bin_postfix();
    let file_name = format!("{name}{version}{postfix}");

    if let Some(path) = find_in_path(&file_name) {
        if version_probe_ok(&path) {
            return Ok(ResolvedEngine { path, postfix });
        }
    }

    let bin_dir = go_bin_dir();
    let candidate = bin_dir.join(&file_name);
    match std::fs::metadata(&candidate) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(EnvError::EngineBinaryNotFound {
            name: file_name,
            search_dir: bin_dir,
        }),
        Err(e) => Err(EnvError::io(&candidate, e)),
        Ok(metadata) => {
            ensure_executable(&candidate, &metadata)?;
            Ok(ResolvedEngine {
                path: candidate,
                postfix,
            })
        }
    }
}

/// Check the binary responds to `--version`
fn version_probe_ok(path: &Path) -> bool {
    Command::new(path)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

#[cfg(unix)]
fn ensure_executable(path: &Path, metadata: &std::fs::Metadata) -> EnvResult<()> {
    use std::os::unix::fs::PermissionsExt;

    if metadata.permissions().mode() & 0o111 == 0 {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .map_err(|e| EnvError::io(path, e))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_executable(_path: &Path, _metadata: &std::fs::Metadata) -> EnvResult<()> {
    Ok(())
}
