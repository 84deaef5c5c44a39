//! Generated-module dependency descriptor adaptation
//!
//! The generated Go module depends on this system's engine bindings. When a
//! project is nested inside a checkout of the bindings themselves, the
//! descriptor's replace directive must point at that checkout; a standalone
//! project gets the default descriptor instead. Both layouts have to build
//! without manual edits.

use crate::templates::DEFAULT_GO_MOD;
use crate::{EnvError, EnvResult};
use std::path::{Path, PathBuf};

/// Module path of the engine bindings the generated module depends on
pub const MODULE_PATH: &str = "github.com/spx-lang/spx";

/// Adapt the generated module's dependency descriptor.
///
/// With a descriptor present in the generated source dir, ancestors of the
/// project directory are searched (up to the filesystem root) for a module
/// root whose `go.mod` declares [`MODULE_PATH`]; the replace directive is
/// rewritten to that root's relative path. Without such a root, or without
/// any descriptor, the default descriptor is synthesized in place.
pub fn adapt_module_graph(project_dir: &Path, go_dir: &Path) -> EnvResult<()> {
    let descriptor = go_dir.join("go.mod");
    if !descriptor.is_file() {
        return write_default_descriptor(go_dir);
    }

    match find_module_root(project_dir) {
        Some(root) => {
            let rel = relative_path(go_dir, &root);
            rewrite_replace_directive(&descriptor, &rel)
        }
        None => write_default_descriptor(go_dir),
    }
}

/// Walk ancestors looking for a `go.mod` that declares [`MODULE_PATH`].
fn find_module_root(start: &Path) -> Option<PathBuf> {
    let module_line = format!("module {MODULE_PATH}");
    for dir in start.ancestors().skip(1) {
        let candidate = dir.join("go.mod");
        if let Ok(content) = std::fs::read_to_string(&candidate) {
            if content.lines().any(|l| l.trim() == module_line) {
                return Some(dir.to_path_buf());
            }
        }
    }
    None
}

/// Rewrite (or append) the replace directive for [`MODULE_PATH`].
fn rewrite_replace_directive(descriptor: &Path, rel: &Path) -> EnvResult<()> {
    let content =
        std::fs::read_to_string(descriptor).map_err(|e| EnvError::io(descriptor, e))?;

    let tag = format!("replace {MODULE_PATH}");
    let directive = format!("{tag} => {}", rel.display());

    let mut lines: Vec<String> = Vec::new();
    let mut replaced = false;
    for line in content.lines() {
        if line.trim_start().starts_with(&tag) {
            lines.push(directive.clone());
            replaced = true;
        } else {
            lines.push(line.to_string());
        }
    }
    if !replaced {
        lines.push(String::new());
        lines.push(directive);
    }

    let mut output = lines.join("\n");
    output.push('\n');
    std::fs::write(descriptor, output).map_err(|e| EnvError::io(descriptor, e))
}

/// Synthesize the default descriptor for a standalone project.
fn write_default_descriptor(go_dir: &Path) -> EnvResult<()> {
    std::fs::create_dir_all(go_dir).map_err(|e| EnvError::io(go_dir, e))?;
    let descriptor = go_dir.join("go.mod");
    std::fs::write(&descriptor, DEFAULT_GO_MOD).map_err(|e| EnvError::io(&descriptor, e))
}

/// Lexical relative path from one absolute directory to another.
fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from_parts: Vec<_> = from.components().collect();
    let to_parts: Vec<_> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..from_parts.len() {
        rel.push("..");
    }
    for part in &to_parts[common..] {
        rel.push(part.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}
