//! Deterministic zip archive writer
//!
//! Archive bytes must depend only on file content and relative paths, never
//! on timestamps, traversal order, or host umask. Entries are sorted
//! lexicographically, every timestamp is pinned to the zip epoch, and unix
//! permission bits are normalized before writing.

use crate::{PackError, PackResult};
use spx_env::TemplateProvider;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Entries with this suffix are the host engine's import cache and never
/// belong in a package.
pub const IMPORT_SUFFIX: &str = ".import";

/// Names excluded when they occur at the top two path levels of a project
/// tree: version-control metadata and the nested engine project.
const SKIP_NAMES: [&str; 2] = [".git", "project"];

/// One archive entry, unique by relative path
#[derive(Debug, Clone)]
struct ArchiveEntry {
    abs: PathBuf,
    rel: String,
    is_dir: bool,
}

/// Pack a project tree into a deterministic zip archive.
///
/// `.git` and `project` are excluded at the top two path levels, and any
/// entry whose name carries the import-cache suffix is dropped. A stale
/// archive at `dst_zip` is replaced.
pub fn pack_project(base_dir: &Path, dst_zip: &Path) -> PackResult<()> {
    if dst_zip.exists() {
        std::fs::remove_file(dst_zip).map_err(|e| PackError::io(dst_zip, e))?;
    }

    let mut entries = Vec::new();
    let walker = WalkDir::new(base_dir)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_pruned(e));

    for entry in walker {
        let entry = entry.map_err(|e| PackError::archive(base_dir, e))?;
        let rel = rel_name(base_dir, entry.path())?;
        if rel.ends_with(IMPORT_SUFFIX) {
            continue;
        }
        entries.push(ArchiveEntry {
            abs: entry.path().to_path_buf(),
            rel,
            is_dir: entry.file_type().is_dir(),
        });
    }

    write_archive(dst_zip, entries)
}

/// Pack only the named subdirectories and files of `target_dir`.
///
/// Used for the engine resources archive, with the same sort/normalize
/// core as [`pack_project`].
pub fn pack_dir_files(
    zip_path: &Path,
    target_dir: &Path,
    directories: &[&str],
    files: &[&str],
) -> PackResult<()> {
    let mut entries = Vec::new();

    for dir in directories {
        let dir_path = target_dir.join(dir);
        for entry in WalkDir::new(&dir_path).follow_links(false) {
            let entry = entry.map_err(|e| PackError::archive(&dir_path, e))?;
            entries.push(ArchiveEntry {
                abs: entry.path().to_path_buf(),
                rel: rel_name(target_dir, entry.path())?,
                is_dir: entry.file_type().is_dir(),
            });
        }
    }

    for file in files {
        let file_path = target_dir.join(file);
        if !file_path.is_file() {
            return Err(PackError::io(
                &file_path,
                io::Error::new(io::ErrorKind::NotFound, "staged file missing"),
            ));
        }
        entries.push(ArchiveEntry {
            abs: file_path.clone(),
            rel: rel_name(target_dir, &file_path)?,
            is_dir: false,
        });
    }

    write_archive(zip_path, entries)
}

/// Stage the engine project template and archive its resources.
pub fn pack_engine_res(provider: &dyn TemplateProvider, web_dir: &Path) -> PackResult<()> {
    let stage_dir = web_dir.join("project");
    provider.write_to(&stage_dir, true)?;

    pack_dir_files(
        &web_dir.join("engineres.zip"),
        &stage_dir,
        &["engine"],
        &["main.scene", "project.engine"],
    )?;

    std::fs::remove_dir_all(&stage_dir).map_err(|e| PackError::io(&stage_dir, e))?;
    Ok(())
}

/// Whether a walk entry (and its subtree) is on the deny-list.
///
/// The deny-list applies to any name at depth 1 and to directories at
/// depth 2; deeper occurrences are packaged normally.
fn is_pruned(entry: &walkdir::DirEntry) -> bool {
    let denied = entry
        .file_name()
        .to_str()
        .map(|name| SKIP_NAMES.contains(&name))
        .unwrap_or(false);
    denied && (entry.depth() == 1 || (entry.depth() == 2 && entry.file_type().is_dir()))
}

/// Forward-slash relative path of `path` under `base`.
fn rel_name(base: &Path, path: &Path) -> PackResult<String> {
    let rel = path
        .strip_prefix(base)
        .map_err(|e| PackError::archive(path, e))?;
    Ok(rel.to_string_lossy().replace('\\', "/"))
}

/// Sort entries and write the archive with normalized metadata.
fn write_archive(zip_path: &Path, mut entries: Vec<ArchiveEntry>) -> PackResult<()> {
    entries.sort_by(|a, b| a.rel.cmp(&b.rel));
    entries.dedup_by(|a, b| a.rel == b.rel);

    if let Some(parent) = zip_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PackError::io(parent, e))?;
    }
    let file = File::create(zip_path).map_err(|e| PackError::io(zip_path, e))?;
    let mut zip = ZipWriter::new(file);

    for entry in &entries {
        if entry.is_dir {
            let name = format!("{}/", entry.rel);
            zip.add_directory(&name, dir_options())
                .map_err(|e| PackError::archive(zip_path, e))?;
        } else {
            zip.start_file(&entry.rel, file_options())
                .map_err(|e| PackError::archive(zip_path, e))?;
            let mut src = File::open(&entry.abs).map_err(|e| PackError::io(&entry.abs, e))?;
            io::copy(&mut src, &mut zip).map_err(|e| PackError::io(&entry.abs, e))?;
        }
    }

    zip.finish().map_err(|e| PackError::archive(zip_path, e))?;
    Ok(())
}

// Timestamps are pinned to the zip epoch and permissions to fixed modes so
// identical trees produce identical bytes on every machine.
fn file_options() -> FileOptions {
    FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644)
}

fn dir_options() -> FileOptions {
    FileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o755)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_names(zip_path: &Path) -> Vec<String> {
        let file = File::open(zip_path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_entries_are_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("tree");
        std::fs::create_dir_all(base.join("b")).unwrap();
        std::fs::write(base.join("z.txt"), "z").unwrap();
        std::fs::write(base.join("a.txt"), "a").unwrap();
        std::fs::write(base.join("b/c.txt"), "c").unwrap();

        let zip_path = tmp.path().join("out.zip");
        pack_project(&base, &zip_path).unwrap();

        let names = read_names(&zip_path);
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_deny_list_applies_to_top_levels_only() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("tree");
        std::fs::create_dir_all(base.join(".git/objects")).unwrap();
        std::fs::create_dir_all(base.join("sub/project")).unwrap();
        std::fs::create_dir_all(base.join("sub/deep/project")).unwrap();
        std::fs::write(base.join("sub/deep/project/kept.txt"), "kept").unwrap();
        std::fs::write(base.join("top.txt"), "top").unwrap();

        let zip_path = tmp.path().join("out.zip");
        pack_project(&base, &zip_path).unwrap();

        let names = read_names(&zip_path);
        assert!(!names.iter().any(|n| n.starts_with(".git")));
        assert!(!names.contains(&"sub/project/".to_string()));
        // depth-3 occurrence of a denied name is packaged normally
        assert!(names.contains(&"sub/deep/project/kept.txt".to_string()));
    }

    #[test]
    fn test_stale_archive_is_replaced() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("tree");
        std::fs::create_dir_all(&base).unwrap();
        std::fs::write(base.join("a.txt"), "a").unwrap();

        let zip_path = tmp.path().join("out.zip");
        std::fs::write(&zip_path, "not a zip").unwrap();
        pack_project(&base, &zip_path).unwrap();

        assert_eq!(read_names(&zip_path), vec!["a.txt".to_string()]);
    }

    #[test]
    fn test_pack_dir_files_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = pack_dir_files(&tmp.path().join("out.zip"), tmp.path(), &[], &["absent.txt"]);
        assert!(err.is_err());
    }
}
