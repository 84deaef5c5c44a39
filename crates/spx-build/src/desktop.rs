//! Desktop shared library builds
//!
//! Builds one `c-shared` library per requested architecture, cross-compiled
//! with the Go toolchain. The architecture request is validated against the
//! host OS's supported set before anything runs.

use crate::error::{BuildError, BuildResult};
use crate::{codegen, command, toolchain};
use spx_env::ProjectContext;
use std::path::{Path, PathBuf};

// Signal-handler interaction between the Go runtime and the engine; must be
// set for every desktop build.
const GODEBUG_DESKTOP: &str = "asyncpreemptoff=1";

/// Build desktop shared libraries for the requested architectures.
///
/// An invalid explicit architecture fails before the code generator or any
/// compiler runs, so no output file is written.
pub fn build(ctx: &ProjectContext, arch_request: &str, tags: &str) -> BuildResult<Vec<PathBuf>> {
    let os = toolchain::host_os();
    let archs = toolchain::expand_archs(arch_request, os, toolchain::host_go_arch())?;

    park_ios_sources(&ctx.go_dir)?;
    codegen::generate(ctx, tags)?;

    std::fs::create_dir_all(&ctx.lib_dir).map_err(|e| BuildError::io(&ctx.lib_dir, e))?;

    let tag_arg = format!("-tags={tags}");
    let mut outputs = Vec::with_capacity(archs.len());
    for arch in archs {
        let output = ctx.lib_dir.join(toolchain::lib_file_name(os, arch));
        println!("building shared library: arch={arch} tags={tags}");

        let output_str = output.display().to_string();
        let mut args = vec!["build"];
        if !tags.is_empty() {
            args.push(&tag_arg);
        }
        args.extend(["-buildmode=c-shared", "-o", output_str.as_str()]);

        let envs = [
            ("CGO_ENABLED", "1".to_string()),
            ("GOARCH", arch.to_string()),
            ("GODEBUG", GODEBUG_DESKTOP.to_string()),
        ];
        command::run(&ctx.go_dir, &envs, "go", &args)?;
        outputs.push(output);
    }

    Ok(outputs)
}

/// Park iOS-only sources out of the compilation set by giving them a `.txt`
/// suffix. They are restored by the iOS build.
pub fn park_ios_sources(go_dir: &Path) -> BuildResult<()> {
    let entries = match std::fs::read_dir(go_dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(()), // nothing generated yet
    };

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with("ios") && !name.ends_with(".txt") {
            let parked = go_dir.join(format!("{name}.txt"));
            std::fs::rename(entry.path(), &parked).map_err(|e| BuildError::io(entry.path(), e))?;
        }
    }
    Ok(())
}
