//! Project cleanup commands (spx clear / clearbuild)

use anyhow::{Context, Result};
use spx_env::ProjectContext;
use std::io::ErrorKind;
use std::path::Path;

/// Remove the generated project, the scratch directory, and the adjacent
/// ignore-file. "Already absent" is tolerated; any other removal error is
/// reported.
pub fn clear(ctx: &ProjectContext) -> Result<()> {
    remove_dir_tolerant(&ctx.project_dir).context("Failed to remove project directory")?;
    remove_dir_tolerant(&ctx.temp_dir()).context("Failed to remove scratch directory")?;

    let gitignore = ctx.target_dir.join(".gitignore");
    match std::fs::remove_file(&gitignore) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove gitignore file"),
    }
}

/// Remove export artifacts only, keeping the generated project.
pub fn clearbuild(ctx: &ProjectContext) -> Result<()> {
    crate::commands::run::stop_web();
    remove_dir_tolerant(&ctx.project_dir.join(".builds"))
        .context("Failed to remove build artifacts")
}

fn remove_dir_tolerant(dir: &Path) -> std::io::Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_for(tmp: &Path) -> ProjectContext {
        ProjectContext::resolve(tmp, "project", "0.3.0").unwrap()
    }

    #[test]
    fn test_clear_removes_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context_for(tmp.path());
        std::fs::create_dir_all(&ctx.project_dir).unwrap();
        std::fs::create_dir_all(ctx.temp_dir()).unwrap();
        std::fs::write(ctx.target_dir.join(".gitignore"), "project/").unwrap();

        clear(&ctx).unwrap();

        assert!(!ctx.project_dir.exists());
        assert!(!ctx.temp_dir().exists());
        assert!(!ctx.target_dir.join(".gitignore").exists());
    }

    #[test]
    fn test_clear_tolerates_absent_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context_for(tmp.path());
        assert!(clear(&ctx).is_ok());
    }

    #[test]
    fn test_clearbuild_keeps_project() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context_for(tmp.path());
        std::fs::create_dir_all(ctx.project_dir.join(".builds/web")).unwrap();
        std::fs::write(ctx.project_dir.join("project.engine"), "cfg").unwrap();

        clearbuild(&ctx).unwrap();

        assert!(!ctx.project_dir.join(".builds").exists());
        assert!(ctx.project_dir.join("project.engine").is_file());
    }
}
