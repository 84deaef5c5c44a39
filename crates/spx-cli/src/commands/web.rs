//! Web export commands
//!
//! Web exports stage a prebuilt runtime template, pack the project tree
//! into the deterministic game archive, and append the engine hash
//! manifest so clients can detect stale cached binaries.

use crate::pipeline::Pipeline;
use anyhow::{bail, Context, Result};
use spx_env::engine::go_bin_dir;
use spx_env::templates::GITIGNORE;
use spx_env::{find_in_path, ProjectTemplates, TemplateProvider};
use spx_pack::{
    copy_dir_all, move_files_by_suffix, pack_engine_res, pack_project, save_engine_hash,
};
use std::path::Path;

/// Flavor of the staged web runtime template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebMode {
    Normal,
    Editor,
    Runtime,
    Minigame,
}

impl WebMode {
    fn suffix(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Editor => "editor",
            Self::Runtime => "runtime",
            Self::Minigame => "minigame",
        }
    }
}

/// Merge order of the minigame runtime scripts
const JS_MERGE_ORDER: [&str; 6] = [
    "header.js",
    "engine.js",
    "go.wasm.exec.js",
    "storage.manager.js",
    "worker.message.manager.js",
    "game.js",
];

/// Export the web package for a mode.
pub fn export_web(pipeline: &Pipeline, mode: WebMode) -> Result<()> {
    export_web_common(pipeline, mode)?;
    if mode == WebMode::Editor {
        pack_engine_res(&ProjectTemplates, &pipeline.ctx.web_dir)?;
    }
    Ok(())
}

/// Shared web staging: runtime template, project archive, hash manifest.
fn export_web_common(pipeline: &Pipeline, mode: WebMode) -> Result<()> {
    let ctx = &pipeline.ctx;

    let template_dir = go_bin_dir().join(format!(
        "spxrt{}_web{}",
        ctx.version,
        mode.suffix()
    ));
    if !template_dir.is_dir() {
        bail!(
            "web runtime template not found: {}; install the engine web runtime first",
            template_dir.display()
        );
    }

    // Restage the web directory from scratch, keeping the freshly built
    // wasm module.
    let wasm_path = ctx.web_dir.join(spx_build::WASM_OUTPUT);
    let wasm_bytes = std::fs::read(&wasm_path).ok();
    if ctx.web_dir.exists() {
        std::fs::remove_dir_all(&ctx.web_dir)
            .with_context(|| format!("Failed to clear {}", ctx.web_dir.display()))?;
    }
    copy_dir_all(&template_dir, &ctx.web_dir)?;
    if let Some(bytes) = wasm_bytes {
        std::fs::write(&wasm_path, bytes)
            .with_context(|| format!("Failed to restore {}", wasm_path.display()))?;
    }

    println!("==> export web {}", ctx.web_dir.display());
    ProjectTemplates.write_to(&ctx.project_dir, true)?;
    write_gitignore(&ctx.target_dir)?;

    let editor_html = ctx.web_dir.join("engine.editor.html");
    if editor_html.is_file() {
        std::fs::rename(&editor_html, ctx.web_dir.join("index.html"))
            .context("Failed to install index.html")?;
    }

    pack_project(&ctx.target_dir, &ctx.web_dir.join("game.zip"))?;
    save_engine_hash(&ctx.web_dir)?;
    Ok(())
}

/// Export the minigame package: the web export restructured into the
/// layout the minigame container expects, with compressed wasm and one
/// merged runtime script.
pub fn export_minigame(pipeline: &Pipeline) -> Result<()> {
    export_web_common(pipeline, WebMode::Minigame)?;

    let web_dir = &pipeline.ctx.web_dir;
    let raw_web = web_dir.join("rawWeb");

    // Move the staged export into rawWeb/ and rebuild the top level
    let backup = web_dir.with_extension("bck");
    std::fs::rename(web_dir, &backup).context("Failed to restage web directory")?;
    std::fs::create_dir_all(web_dir)?;
    std::fs::rename(&backup, &raw_web).context("Failed to restage web directory")?;

    let engine_dir = web_dir.join("engine");
    let js_dir = web_dir.join("js");
    std::fs::create_dir_all(&engine_dir)?;
    std::fs::create_dir_all(&js_dir)?;

    let fast_build = pipeline.flags.build_mode == "fast";
    let wasm_names = ["engine.editor.wasm", spx_build::WASM_OUTPUT];
    if fast_build {
        // fast build: stage wasm uncompressed
        for name in wasm_names {
            let src = raw_web.join(name);
            std::fs::rename(&src, engine_dir.join(name))
                .with_context(|| format!("Failed to move {}", src.display()))?;
        }
    } else {
        if find_in_path("brotli").is_none() {
            bail!("brotli is not installed; rerun with --build fast to skip compression");
        }
        for name in wasm_names {
            let wasm = raw_web.join(name);
            println!("compress {}...", wasm.display());
            let wasm_str = wasm.display().to_string();
            spx_build::command::run(&raw_web, &[], "brotli", &["-f", "-q", "11", &wasm_str])
                .with_context(|| format!("Failed to compress {}", wasm.display()))?;
        }
        move_files_by_suffix(&raw_web, &engine_dir, ".br")?;
    }

    move_files_by_suffix(&raw_web, &engine_dir, ".zip")?;
    move_files_by_suffix(&raw_web, &js_dir, ".js")?;
    merge_js_files(&js_dir, !fast_build)?;

    std::fs::remove_dir_all(&raw_web).context("Failed to remove staging directory")?;

    if let Ok(dev_tools) = std::env::var("MINIGAME_DEV_TOOLS") {
        println!("opening minigame dev tools for {}", web_dir.display());
        let project_str = web_dir.display().to_string();
        let cli = Path::new(&dev_tools).join("cli").display().to_string();
        // optional convenience; ignore failures
        let _ = spx_build::command::run_unchecked(
            web_dir,
            &cli,
            &["open", "--project", &project_str, "-y"],
        );
    } else {
        println!(
            "MINIGAME_DEV_TOOLS is not set, open the project manually: {}",
            web_dir.display()
        );
    }
    Ok(())
}

/// Concatenate the runtime scripts in a fixed order into one `engine.js`,
/// prefixed with the compression flag the loader checks.
fn merge_js_files(js_dir: &Path, compressed: bool) -> Result<()> {
    let merged_path = js_dir.join("engine_new.js");
    let mut merged = format!(
        "var FFI = null;\nconst isWasmCompressed = {compressed};\n\n"
    );

    for name in JS_MERGE_ORDER {
        let path = js_dir.join(name);
        if !path.is_file() {
            continue;
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        merged.push_str(&content);
        std::fs::remove_file(&path)?;
    }

    std::fs::write(&merged_path, merged)
        .with_context(|| format!("Failed to write {}", merged_path.display()))?;
    std::fs::rename(&merged_path, js_dir.join("engine.js"))?;
    Ok(())
}

/// Create the ignore-file next to the engine project if absent.
fn write_gitignore(target_dir: &Path) -> Result<()> {
    let path = target_dir.join(".gitignore");
    if !path.exists() {
        std::fs::write(&path, GITIGNORE)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}
