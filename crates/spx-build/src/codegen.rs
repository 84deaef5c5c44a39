//! Code generation trigger
//!
//! The scripting-to-Go code generator is an opaque external process: run
//! once against the project's scripting sources, it emits exactly one
//! generated source file, which becomes the build engine's compilation
//! entry point. Any failure here is fatal to the whole build stage.

use crate::command;
use crate::error::{BuildError, BuildResult};
use spx_env::ProjectContext;

/// External code generator binary
pub const GENERATOR: &str = "spxgen";

/// The generator's single output file
pub const GENERATED_FILE: &str = "spx_autogen.go";

/// Run the code generator and install its output as `go/main.go`, then
/// reconcile the generated module's dependencies.
pub fn generate(ctx: &ProjectContext, tags: &str) -> BuildResult<()> {
    let tag_arg = format!("-tags={tags}");
    let mut args = vec!["build"];
    if !tags.is_empty() {
        args.push(&tag_arg);
    }

    command::run(&ctx.target_dir, &[], GENERATOR, &args)
        .map_err(|e| BuildError::CodegenFailed(e.to_string()))?;

    let generated = ctx.target_dir.join(GENERATED_FILE);
    if !generated.is_file() {
        return Err(BuildError::CodegenFailed(format!(
            "generator produced no {GENERATED_FILE} in {}",
            ctx.target_dir.display()
        )));
    }

    std::fs::create_dir_all(&ctx.go_dir).map_err(|e| BuildError::io(&ctx.go_dir, e))?;
    let entry_point = ctx.go_dir.join("main.go");
    std::fs::rename(&generated, &entry_point).map_err(|e| BuildError::io(&generated, e))?;

    command::run(&ctx.go_dir, &[], "go", &["mod", "tidy"])?;
    Ok(())
}
