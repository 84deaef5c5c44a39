//! Native export commands: desktop, Android, iOS

use crate::pipeline::Pipeline;
use anyhow::{Context, Result};
use spx_build::{android, command, ios, AndroidBuild};
use spx_env::find_in_path;
use spx_pack::copy_dir_all;
use std::path::Path;

/// Export the desktop package for the host platform.
pub fn export_desktop(pipeline: &Pipeline) -> Result<()> {
    let (platform, file_name) = match spx_build::host_os() {
        "windows" => ("Win", "game.exe"),
        "macos" => ("Mac", "game.app"),
        _ => ("Linux", "game"),
    };

    let out = pipeline.ctx.builds_dir("pc").join(file_name);
    println!(
        "start export: platform={platform} project={}",
        pipeline.ctx.project_dir.display()
    );
    pipeline.engine_export(platform, &out)
}

/// Export the Android package and optionally install it.
///
/// Missing NDK, missing adb, and missing devices are diagnostics followed
/// by a successful no-op, never hard failures.
pub fn export_apk(pipeline: &Pipeline) -> Result<()> {
    stage_shared_assets(pipeline)?;

    match android::build(&pipeline.ctx)? {
        AndroidBuild::Skipped { reason } => println!("{reason}"),
        AndroidBuild::Built(libs) => println!("built {} Android libraries", libs.len()),
    }

    pipeline.check_project_descriptor()?;
    println!("Importing project resources...");
    pipeline.engine_import_warmup()?;

    let apk_path = pipeline.ctx.builds_dir("android").join("game.apk");
    println!("Exporting project to APK...");
    if let Err(e) = pipeline.engine_export("Android", &apk_path) {
        println!("APK export failed: {e}");
    }
    if !apk_path.is_file() {
        println!("APK export failed: file not created at {}", apk_path.display());
        return Ok(());
    }
    println!("APK export completed: {}", apk_path.display());

    if find_in_path("adb").is_none() {
        println!("adb not found; install Android platform tools to deploy");
        return Ok(());
    }
    if !device_connected(&pipeline.ctx.project_dir)? {
        println!("no Android device connected; enable USB debugging and retry");
        return Ok(());
    }

    if pipeline.flags.install {
        println!("Installing APK...");
        let apk_str = apk_path.display().to_string();
        if let Err(e) = command::run(
            &pipeline.ctx.project_dir,
            &[],
            "adb",
            &["install", "-r", &apk_str],
        ) {
            println!("APK installation failed: {e}");
            return Ok(());
        }
        println!("APK installation successful!");
    }
    Ok(())
}

/// Export the iOS package and optionally install it on a device.
pub fn export_ios(pipeline: &Pipeline) -> Result<()> {
    stage_shared_assets(pipeline)?;

    pipeline.native_build()?;
    ios::build(&pipeline.ctx).context("Failed to build iOS libraries")?;

    pipeline.check_project_descriptor()?;
    println!("Importing project resources...");
    pipeline.engine_import_warmup()?;

    let ipa_path = pipeline.ctx.builds_dir("ios").join("Game.ipa");
    println!("Exporting project to IPA...");
    pipeline
        .engine_export("iOS", &ipa_path)
        .context("IPA export failed")?;
    anyhow::ensure!(
        ipa_path.is_file(),
        "IPA export failed: file not created at {}",
        ipa_path.display()
    );
    println!("IPA export completed: {}", ipa_path.display());

    if pipeline.flags.install {
        println!("Installing IPA on device...");
        let ipa_str = ipa_path.display().to_string();
        command::run(
            &pipeline.ctx.project_dir,
            &[],
            "ios-deploy",
            &["--bundle", &ipa_str],
        )
        .context("IPA install failed")?;
    }
    Ok(())
}

/// Copy the shared asset tree into the engine project before an export.
fn stage_shared_assets(pipeline: &Pipeline) -> Result<()> {
    let src = pipeline.ctx.target_dir.join("assets");
    if src.is_dir() {
        copy_dir_all(&src, &pipeline.ctx.project_dir.join("assets"))
            .context("Failed to stage project assets")?;
    }
    Ok(())
}

/// Whether `adb devices` reports at least one connected device.
fn device_connected(dir: &Path) -> Result<bool> {
    let output = command::run_capture(dir, &[], "adb", &["devices"])
        .context("failed to check for connected devices")?;
    Ok(output
        .lines()
        .skip(1)
        .any(|line| line.trim_end().ends_with("device")))
}
