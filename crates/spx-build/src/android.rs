//! Android shared library builds
//!
//! Cross-compiles one `c-shared` library per ABI with the NDK's clang
//! wrappers. An absent NDK root degrades the whole stage to a documented
//! no-op rather than an error; an unsupported host is a hard failure.

use crate::error::{BuildError, BuildResult};
use crate::{command, toolchain};
use spx_env::ProjectContext;
use std::path::PathBuf;

/// Environment variable locating the NDK installation
pub const NDK_ROOT_ENV: &str = "ANDROID_NDK_ROOT";

/// Minimum Android SDK version baked into the clang wrapper names
const MIN_SDK: &str = "21";

/// Outcome of an Android build stage
#[derive(Debug)]
pub enum AndroidBuild {
    /// The stage was intentionally skipped; not an error
    Skipped { reason: String },
    /// Libraries built, one per ABI
    Built(Vec<PathBuf>),
}

/// Build Android shared libraries for every supported ABI.
pub fn build(ctx: &ProjectContext) -> BuildResult<AndroidBuild> {
    let ndk_root = match std::env::var(NDK_ROOT_ENV) {
        Ok(value) if !value.is_empty() => PathBuf::from(value),
        _ => {
            return Ok(AndroidBuild::Skipped {
                reason: format!("{NDK_ROOT_ENV} is not set; skipping Android libraries"),
            })
        }
    };

    let host_tag = toolchain::ndk_host_tag(toolchain::host_os(), toolchain::host_go_arch())?;
    let clang_dir = ndk_root
        .join("toolchains")
        .join("llvm")
        .join("prebuilt")
        .join(host_tag)
        .join("bin");

    std::fs::create_dir_all(&ctx.lib_dir).map_err(|e| BuildError::io(&ctx.lib_dir, e))?;

    let mut outputs = Vec::with_capacity(toolchain::ANDROID_ABIS.len());
    for abi in &toolchain::ANDROID_ABIS {
        println!("building for {}...", abi.abi);

        let output = ctx.lib_dir.join(abi.lib_name);
        let output_str = output.display().to_string();
        let clang = clang_dir.join(format!("{}{}-clang", abi.clang_prefix, MIN_SDK));

        let envs = [
            ("CGO_ENABLED", "1".to_string()),
            ("GOOS", "android".to_string()),
            ("GOARCH", abi.goarch.to_string()),
            ("CC", clang.display().to_string()),
        ];
        command::run(
            &ctx.go_dir,
            &envs,
            "go",
            &[
                "build",
                "-tags=android,packmode",
                "-buildmode=c-shared",
                "-o",
                &output_str,
                ".",
            ],
        )?;
        outputs.push(output);
    }

    println!("Android library build completed");
    Ok(AndroidBuild::Built(outputs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_ndk_root_soft_skips() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ProjectContext::resolve(tmp.path(), "project", "0.3.0").unwrap();

        // The variable is not set in the test environment
        std::env::remove_var(NDK_ROOT_ENV);
        match build(&ctx).unwrap() {
            AndroidBuild::Skipped { reason } => assert!(reason.contains(NDK_ROOT_ENV)),
            AndroidBuild::Built(_) => panic!("expected soft skip"),
        }
        // and nothing was created
        assert!(!ctx.lib_dir.exists());
    }
}
