//! Environment resolver integration tests

use pretty_assertions::assert_eq;
use spx_env::{check_env, ProjectContext, FILE_SUFFIX, PROJECT_REL_DIR};
use tempfile::TempDir;

#[test]
fn derived_paths_are_independent_of_later_cwd_changes() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().canonicalize().unwrap();

    let ctx = ProjectContext::resolve(&target, PROJECT_REL_DIR, "0.3.0").unwrap();
    let expected_project = target.join(PROJECT_REL_DIR);

    // Paths were fixed at resolution time; nothing recomputes them against
    // the (possibly different) current directory afterwards.
    assert_eq!(ctx.project_dir, expected_project);
    assert_eq!(ctx.go_dir, expected_project.join("go"));
    assert_eq!(ctx.web_dir, expected_project.join(".builds/web"));

    let clone = ctx.clone();
    assert_eq!(clone, ctx);
}

#[test]
fn resolution_never_requires_the_directories_to_exist() {
    let ctx = ProjectContext::resolve("/nonexistent/anywhere", PROJECT_REL_DIR, "0.3.0").unwrap();
    assert_eq!(
        ctx.go_dir,
        std::path::PathBuf::from("/nonexistent/anywhere/project/go")
    );
}

#[test]
fn marker_check_sees_top_level_files_only() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("nested")).unwrap();
    std::fs::write(tmp.path().join("nested/deep.spx"), "onStart => {}").unwrap();

    // Marker must be at the top level of the target directory
    assert!(check_env(tmp.path(), FILE_SUFFIX).is_err());

    std::fs::write(tmp.path().join("main.spx"), "onStart => {}").unwrap();
    assert!(check_env(tmp.path(), FILE_SUFFIX).is_ok());
}
