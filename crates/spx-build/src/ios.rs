//! iOS static archive and framework builds
//!
//! Cross-builds three `c-archive` slices, combines the two simulator
//! archives into one universal artifact, and assembles the versioned
//! xcframework bundle. Sub-steps are numbered; the first failure aborts the
//! rest and names the step. The scratch directory is removed whether the
//! build succeeds or fails.

use crate::error::{BuildError, BuildResult};
use crate::{command, toolchain};
use spx_env::ProjectContext;
use std::path::{Path, PathBuf};

const GODEBUG_IOS: &str = "cgocheck=0,asyncpreemptoff=1,panicnil=1";

// Public header for the framework: the single extension entry point the
// engine resolves at load time.
const PUBLIC_HEADER: &str = r#"#ifndef LIBSPX_H
#define LIBSPX_H

#include <stdlib.h>

// Engine extension initialization entry point
void SpxExtensionInit(void *p_interface, const void *p_library, void *r_initialization);

#endif // LIBSPX_H
"#;

/// Removes the scratch tree on every exit path.
struct ScratchDir(PathBuf);

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// Restore parked iOS-only sources into the compilation set.
pub fn restore_ios_sources(go_dir: &Path) -> BuildResult<()> {
    let entries = match std::fs::read_dir(go_dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(()),
    };

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with("ios") && name.ends_with(".txt") {
            let restored = go_dir.join(name.trim_end_matches(".txt"));
            std::fs::rename(entry.path(), &restored)
                .map_err(|e| BuildError::io(entry.path(), e))?;
        }
    }
    Ok(())
}

/// Build the iOS xcframework bundle into the project's lib directory.
pub fn build(ctx: &ProjectContext) -> BuildResult<PathBuf> {
    restore_ios_sources(&ctx.go_dir)?;

    let build_dir = ctx
        .project_dir
        .join(spx_env::ENGINE_CACHE_DIR)
        .join("tmp")
        .join("iosbuild");
    let simulator_dir = build_dir.join("simulator");
    let device_dir = build_dir.join("device");
    let headers_dir = build_dir.join("headers");
    let xcframework = ctx.lib_dir.join("libspx.ios.xcframework");

    let _ = std::fs::remove_dir_all(&build_dir);
    let _ = std::fs::remove_dir_all(&xcframework);
    let _scratch = ScratchDir(build_dir.clone());

    prepare_headers(ctx, &simulator_dir, &device_dir, &headers_dir)
        .map_err(|e| BuildError::step("1: prepare headers", e))?;

    let simulator_sdk = sdk_path(ctx, "iphonesimulator")
        .map_err(|e| BuildError::step("2: locate SDKs", e))?;
    let device_sdk =
        sdk_path(ctx, "iphoneos").map_err(|e| BuildError::step("2: locate SDKs", e))?;

    for slice in &toolchain::IOS_SLICES {
        let sdk = if slice.simulator {
            &simulator_sdk
        } else {
            &device_sdk
        };
        let out_dir = if slice.simulator {
            &simulator_dir
        } else {
            &device_dir
        };
        println!("building for {}...", slice.name);
        build_slice(ctx, slice, sdk, out_dir)
            .map_err(|e| BuildError::step(format!("3: build {}", slice.name), e))?;
    }

    let universal = simulator_dir.join("libspx.a");
    lipo_simulator_slices(ctx, &simulator_dir, &universal)
        .map_err(|e| BuildError::step("4: combine simulator archives", e))?;

    create_xcframework(ctx, &universal, &device_dir, &headers_dir, &xcframework)
        .map_err(|e| BuildError::step("5: create xcframework", e))?;

    println!("built {}", xcframework.display());
    Ok(xcframework)
}

/// Step 1: scratch layout, synthesized public header, copied source headers.
fn prepare_headers(
    ctx: &ProjectContext,
    simulator_dir: &Path,
    device_dir: &Path,
    headers_dir: &Path,
) -> BuildResult<()> {
    for dir in [simulator_dir, device_dir, headers_dir, ctx.lib_dir.as_path()] {
        std::fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;
    }

    let public_header = headers_dir.join("libspx.h");
    std::fs::write(&public_header, PUBLIC_HEADER).map_err(|e| BuildError::io(&public_header, e))?;

    let entries = std::fs::read_dir(&ctx.go_dir).map_err(|e| BuildError::io(&ctx.go_dir, e))?;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".h") {
            let dst = headers_dir.join(&name);
            std::fs::copy(entry.path(), &dst).map_err(|e| BuildError::io(entry.path(), e))?;
        }
    }
    Ok(())
}

/// Step 2: SDK path from the system SDK locator.
fn sdk_path(ctx: &ProjectContext, sdk: &str) -> BuildResult<String> {
    command::run_capture(
        &ctx.project_dir,
        &[],
        "xcrun",
        &["--sdk", sdk, "--show-sdk-path"],
    )
}

/// Step 3: one `c-archive` build per slice.
fn build_slice(
    ctx: &ProjectContext,
    slice: &toolchain::IosSlice,
    sdk: &str,
    out_dir: &Path,
) -> BuildResult<()> {
    let output = out_dir.join(slice.archive);
    let output_str = output.display().to_string();

    let cflags = format!(
        "-isysroot {sdk} {} -arch {} -fembed-bitcode",
        slice.min_version_flag, slice.arch_flag
    );
    let ldflags = format!(
        "-isysroot {sdk} {} -arch {}",
        slice.min_version_flag, slice.arch_flag
    );

    let envs = [
        ("CGO_ENABLED", "1".to_string()),
        ("GOOS", "darwin".to_string()),
        ("GOARCH", slice.goarch.to_string()),
        ("CGO_CFLAGS", cflags),
        ("CGO_LDFLAGS", ldflags),
        ("GODEBUG", GODEBUG_IOS.to_string()),
    ];
    command::run(
        &ctx.go_dir,
        &envs,
        "go",
        &[
            "build",
            "-tags=ios,packmode",
            "-buildmode=c-archive",
            "-trimpath",
            "-ldflags=-w -s",
            "-o",
            &output_str,
            ".",
        ],
    )
}

/// Step 4: universal simulator archive.
fn lipo_simulator_slices(
    ctx: &ProjectContext,
    simulator_dir: &Path,
    universal: &Path,
) -> BuildResult<()> {
    let universal_str = universal.display().to_string();
    let x86 = simulator_dir.join("libspx-x86_64.a").display().to_string();
    let arm = simulator_dir
        .join("libspx-arm64-sim.a")
        .display()
        .to_string();

    command::run(
        &ctx.project_dir,
        &[],
        "lipo",
        &["-create", "-output", &universal_str, &x86, &arm],
    )
}

/// Step 5: assemble the framework bundle.
fn create_xcframework(
    ctx: &ProjectContext,
    universal: &Path,
    device_dir: &Path,
    headers_dir: &Path,
    xcframework: &Path,
) -> BuildResult<()> {
    let universal_str = universal.display().to_string();
    let device_str = device_dir.join("libspx-arm64.a").display().to_string();
    let headers_str = headers_dir.display().to_string();
    let out_str = xcframework.display().to_string();

    command::run(
        &ctx.project_dir,
        &[],
        "xcrun",
        &[
            "xcodebuild",
            "-create-xcframework",
            "-library",
            &universal_str,
            "-headers",
            &headers_str,
            "-library",
            &device_str,
            "-headers",
            &headers_str,
            "-output",
            &out_str,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_ios_sources() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("ios_bridge.go.txt"), "package main").unwrap();
        std::fs::write(tmp.path().join("main.go"), "package main").unwrap();

        restore_ios_sources(tmp.path()).unwrap();

        assert!(tmp.path().join("ios_bridge.go").is_file());
        assert!(!tmp.path().join("ios_bridge.go.txt").exists());
        assert!(tmp.path().join("main.go").is_file());
    }

    #[test]
    fn test_scratch_dir_removed_on_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ProjectContext::resolve(tmp.path(), "project", "0.3.0").unwrap();
        std::fs::create_dir_all(&ctx.go_dir).unwrap();

        // No xcrun on the test host: the build fails at or before step 2,
        // and the scratch tree must still be gone afterwards.
        let result = build(&ctx);
        assert!(result.is_err());
        assert!(!ctx
            .project_dir
            .join(spx_env::ENGINE_CACHE_DIR)
            .join("tmp")
            .join("iosbuild")
            .exists());
    }

    #[test]
    fn test_failure_names_the_step() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ProjectContext::resolve(tmp.path(), "project", "0.3.0").unwrap();
        std::fs::create_dir_all(&ctx.go_dir).unwrap();

        let err = build(&ctx).unwrap_err();
        assert!(matches!(err, BuildError::StepFailed { .. }));
    }
}
