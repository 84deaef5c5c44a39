//! WebAssembly module build

use crate::error::{BuildError, BuildResult};
use crate::{codegen, command};
use spx_env::ProjectContext;
use std::path::PathBuf;

/// Filename of the engine core wasm module
pub const WASM_OUTPUT: &str = "spx.wasm";

/// Build the single wasm binary into the web export directory.
pub fn build(ctx: &ProjectContext, tags: &str) -> BuildResult<PathBuf> {
    codegen::generate(ctx, tags)?;

    std::fs::create_dir_all(&ctx.web_dir).map_err(|e| BuildError::io(&ctx.web_dir, e))?;
    let output = ctx.web_dir.join(WASM_OUTPUT);
    let output_str = output.display().to_string();

    let tag_arg = format!("-tags={tags}");
    let mut args = vec!["build"];
    if !tags.is_empty() {
        args.push(&tag_arg);
    }
    args.extend(["-o", output_str.as_str()]);

    let envs = [
        ("GOOS", "js".to_string()),
        ("GOARCH", "wasm".to_string()),
    ];
    command::run(&ctx.go_dir, &envs, "go", &args)?;
    Ok(output)
}
