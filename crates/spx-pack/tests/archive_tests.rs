//! Packaging engine integration tests
//!
//! Covers the reproducibility guarantee end to end: identical trees must
//! produce byte-identical archives, and the exclusion rules must hold.

use spx_env::ProjectTemplates;
use spx_pack::{pack_dir_files, pack_engine_res, pack_project, save_engine_hash};
use std::fs::File;
use std::path::Path;
use tempfile::TempDir;

/// A project tree with version-control metadata, a nested engine project,
/// an import-cache file, and a real asset.
fn create_project_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path();

    std::fs::create_dir_all(base.join(".git")).unwrap();
    std::fs::write(base.join(".git/HEAD"), "ref: refs/heads/main").unwrap();
    std::fs::create_dir_all(base.join("project")).unwrap();
    std::fs::write(base.join("project/project.engine"), "config").unwrap();
    std::fs::write(base.join("keep.import"), "cache").unwrap();
    std::fs::write(base.join("keep.txt"), "asset").unwrap();

    tmp
}

fn archive_names(zip_path: &Path) -> Vec<String> {
    let file = File::open(zip_path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

#[test]
fn packing_twice_is_byte_identical() {
    let tree = TempDir::new().unwrap();
    let base = tree.path();
    std::fs::create_dir_all(base.join("assets/sprites")).unwrap();
    std::fs::write(base.join("main.spx"), "onStart => {}").unwrap();
    std::fs::write(base.join("assets/index.json"), "{}").unwrap();
    std::fs::write(base.join("assets/sprites/hero.png"), [0u8, 1, 2, 3]).unwrap();

    let out = TempDir::new().unwrap();
    let first = out.path().join("first.zip");
    let second = out.path().join("second.zip");
    pack_project(base, &first).unwrap();
    // Touch mtimes between runs; the archive must not notice.
    std::fs::write(base.join("main.spx"), "onStart => {}").unwrap();
    pack_project(base, &second).unwrap();

    let a = std::fs::read(&first).unwrap();
    let b = std::fs::read(&second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn exclusion_rules_leave_only_assets() {
    let tree = create_project_tree();
    let out = TempDir::new().unwrap();

    let zip_path = out.path().join("game.zip");
    pack_project(tree.path(), &zip_path).unwrap();

    assert_eq!(archive_names(&zip_path), vec!["keep.txt".to_string()]);
}

#[test]
fn pack_dir_files_stages_only_named_entries() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path();
    std::fs::create_dir_all(base.join("engine")).unwrap();
    std::fs::write(base.join("engine/boot.cfg"), "cfg").unwrap();
    std::fs::write(base.join("main.scene"), "scene").unwrap();
    std::fs::write(base.join("project.engine"), "descriptor").unwrap();
    std::fs::write(base.join("unrelated.txt"), "skip me").unwrap();

    let zip_path = base.join("engineres.zip");
    pack_dir_files(&zip_path, base, &["engine"], &["main.scene", "project.engine"]).unwrap();

    let names = archive_names(&zip_path);
    assert!(names.contains(&"engine/boot.cfg".to_string()));
    assert!(names.contains(&"main.scene".to_string()));
    assert!(names.contains(&"project.engine".to_string()));
    assert!(!names.contains(&"unrelated.txt".to_string()));
}

#[test]
fn engine_res_archive_cleans_its_staging_dir() {
    let tmp = TempDir::new().unwrap();
    let web_dir = tmp.path().join("web");
    std::fs::create_dir_all(&web_dir).unwrap();

    pack_engine_res(&ProjectTemplates, &web_dir).unwrap();

    assert!(web_dir.join("engineres.zip").is_file());
    assert!(!web_dir.join("project").exists());
}

#[test]
fn hash_manifest_covers_exactly_the_present_artifacts() {
    let tmp = TempDir::new().unwrap();
    let web_dir = tmp.path();
    std::fs::write(web_dir.join("spx.wasm"), b"engine core bytes").unwrap();
    std::fs::write(web_dir.join("engine.editor.wasm"), b"editor bytes").unwrap();
    std::fs::write(web_dir.join("spxgame.js"), "// bootstrap\n").unwrap();

    save_engine_hash(web_dir).unwrap();

    let script = std::fs::read_to_string(web_dir.join("spxgame.js")).unwrap();
    assert_eq!(script.matches("\"spx.wasm\"").count(), 1);
    assert_eq!(script.matches("\"engine.editor.wasm\"").count(), 1);

    // Every digest is 64 hex chars
    for line in script.lines().filter(|l| l.contains(".wasm")) {
        let hash = line.split('"').nth(3).unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
