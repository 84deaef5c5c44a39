//! Project path derivation and environment checks

use crate::{EnvError, EnvResult};
use std::path::{Component, Path, PathBuf};

/// Relative directory of the engine project inside the target directory
pub const PROJECT_REL_DIR: &str = "project";

/// File suffix identifying an spx project
pub const FILE_SUFFIX: &str = ".spx";

/// Resolved project layout for one command invocation.
///
/// Every field is derived from the target directory; none is independently
/// settable. Resolution happens against the invocation working directory
/// exactly once, so later subprocess work never shifts these paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    /// User-facing project root (where the `.spx` sources live)
    pub target_dir: PathBuf,
    /// Engine project directory: `<target>/<rel_dir>`
    pub project_dir: PathBuf,
    /// Generated Go module directory: `<project>/go`
    pub go_dir: PathBuf,
    /// Web export directory: `<project>/.builds/web`
    pub web_dir: PathBuf,
    /// Native library output directory: `<project>/lib`
    pub lib_dir: PathBuf,
    /// Tool version, used for engine binary and template lookups
    pub version: String,
}

impl ProjectContext {
    /// Resolve all project paths from a target path and relative project dir.
    pub fn resolve(
        target_path: impl AsRef<Path>,
        rel_dir: &str,
        version: &str,
    ) -> EnvResult<Self> {
        let target_dir = absolutize(target_path.as_ref())?;
        let project_dir = normalize(&target_dir.join(rel_dir));
        let go_dir = project_dir.join("go");
        let web_dir = project_dir.join(".builds").join("web");
        let lib_dir = project_dir.join("lib");

        Ok(Self {
            target_dir,
            project_dir,
            go_dir,
            web_dir,
            lib_dir,
            version: version.to_string(),
        })
    }

    /// Export directory for a platform: `<project>/.builds/<platform>`
    pub fn builds_dir(&self, platform: &str) -> PathBuf {
        self.project_dir.join(".builds").join(platform)
    }

    /// Scratch directory adjacent to the project: `<target>/.temp`
    pub fn temp_dir(&self) -> PathBuf {
        self.target_dir.join(".temp")
    }
}

/// Parse a `host:port` server address.
///
/// Fails when there is no `:` separator or the port is not numeric.
pub fn parse_server_addr(addr: &str) -> EnvResult<(String, u16)> {
    let (host, port) = addr
        .split_once(':')
        .ok_or_else(|| EnvError::InvalidServerAddress(addr.to_string()))?;
    let port = port
        .parse::<u16>()
        .map_err(|_| EnvError::InvalidServerAddress(addr.to_string()))?;
    Ok((host.to_string(), port))
}

/// Verify the target directory holds a project marker file.
///
/// A file with the given suffix must exist at the top level of `dir`.
pub fn check_env(dir: &Path, suffix: &str) -> EnvResult<()> {
    let missing = || EnvError::ProjectMarkerMissing {
        suffix: suffix.to_string(),
        dir: dir.to_path_buf(),
    };

    let entries = std::fs::read_dir(dir).map_err(|_| missing())?;
    for entry in entries.flatten() {
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && entry.file_name().to_string_lossy().ends_with(suffix) {
            return Ok(());
        }
    }
    Err(missing())
}

/// Make a path absolute against the current working directory, without
/// touching the filesystem.
fn absolutize(path: &Path) -> EnvResult<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| EnvError::PathResolution {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        cwd.join(path)
    };
    Ok(normalize(&joined))
}

/// Lexically normalize a path: drop `.` components, resolve `..` against
/// preceding normal components.
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                } else if !matches!(
                    parts.last(),
                    Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    parts.push(component);
                }
            }
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_derives_all_paths() {
        let ctx = ProjectContext::resolve("/tmp/demo", PROJECT_REL_DIR, "0.3.0").unwrap();
        assert_eq!(ctx.target_dir, PathBuf::from("/tmp/demo"));
        assert_eq!(ctx.project_dir, PathBuf::from("/tmp/demo/project"));
        assert_eq!(ctx.go_dir, PathBuf::from("/tmp/demo/project/go"));
        assert_eq!(ctx.web_dir, PathBuf::from("/tmp/demo/project/.builds/web"));
        assert_eq!(ctx.lib_dir, PathBuf::from("/tmp/demo/project/lib"));
    }

    #[test]
    fn test_resolve_relative_target_is_absolutized() {
        let ctx = ProjectContext::resolve("demo", PROJECT_REL_DIR, "0.3.0").unwrap();
        assert!(ctx.target_dir.is_absolute());
        assert!(ctx.project_dir.ends_with("demo/project"));
    }

    #[test]
    fn test_normalize_collapses_dots() {
        assert_eq!(
            normalize(Path::new("/a/b/../c/./d")),
            PathBuf::from("/a/c/d")
        );
        assert_eq!(normalize(Path::new("/a/../../b")), PathBuf::from("/b"));
    }

    #[test]
    fn test_builds_and_temp_dirs() {
        let ctx = ProjectContext::resolve("/tmp/demo", PROJECT_REL_DIR, "0.3.0").unwrap();
        assert_eq!(
            ctx.builds_dir("android"),
            PathBuf::from("/tmp/demo/project/.builds/android")
        );
        assert_eq!(ctx.temp_dir(), PathBuf::from("/tmp/demo/.temp"));
    }

    #[test]
    fn test_parse_server_addr_valid() {
        let (host, port) = parse_server_addr("127.0.0.1:8005").unwrap();
        assert_eq!(host, "127.0.0.1");
        assert_eq!(port, 8005);
    }

    #[test]
    fn test_parse_server_addr_missing_colon() {
        let err = parse_server_addr("localhost").unwrap_err();
        assert!(matches!(err, EnvError::InvalidServerAddress(_)));
    }

    #[test]
    fn test_parse_server_addr_bad_port() {
        let err = parse_server_addr("localhost:http").unwrap_err();
        assert!(matches!(err, EnvError::InvalidServerAddress(_)));
    }

    #[test]
    fn test_check_env_finds_marker() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.spx"), "onStart => {}").unwrap();
        assert!(check_env(dir.path(), FILE_SUFFIX).is_ok());
    }

    #[test]
    fn test_check_env_rejects_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_env(dir.path(), FILE_SUFFIX).unwrap_err();
        assert!(matches!(err, EnvError::ProjectMarkerMissing { .. }));
    }

    #[test]
    fn test_check_env_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub.spx")).unwrap();
        assert!(check_env(dir.path(), FILE_SUFFIX).is_err());
    }
}
