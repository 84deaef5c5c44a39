//! Run commands: engine execution and local web servers

use crate::commands::web::{self, WebMode};
use crate::pipeline::Pipeline;
use anyhow::{Context, Result};
use spx_env::ENGINE_CACHE_DIR;
use std::process::Command;

/// Name of the bundled web server script inside the engine cache dir
pub const WEB_SERVER_SCRIPT: &str = "spx_web_server.py";

/// Run the project in the engine.
pub fn run_project(pipeline: &Pipeline) -> Result<()> {
    pipeline.run_engine(&[])
}

/// Open the project in editor mode.
pub fn run_editor(pipeline: &Pipeline) -> Result<()> {
    pipeline.run_engine(&["-e".to_string()])
}

/// Run the project in multiplayer mode, forwarding server/client selection.
pub fn run_multiplayer(pipeline: &Pipeline) -> Result<()> {
    pipeline.run_engine(&pipeline.flags.multiplayer_flags())
}

/// Serve the web export, building it first if the package is missing.
pub fn run_web(pipeline: &Pipeline) -> Result<()> {
    if !pipeline.ctx.web_dir.join("game.zip").is_file() {
        web::export_web(pipeline, WebMode::Normal)?;
    }
    serve_web(pipeline)
}

/// Serve the web editor export.
pub fn run_web_editor(pipeline: &Pipeline) -> Result<()> {
    if !pipeline.ctx.web_dir.join("engineres.zip").is_file() {
        web::export_web(pipeline, WebMode::Editor)?;
    }
    serve_web(pipeline)
}

/// Serve the minigame export.
pub fn run_minigame(pipeline: &Pipeline) -> Result<()> {
    if !pipeline.ctx.web_dir.join("js").join("engine.js").is_file() {
        web::export_minigame(pipeline)?;
    }
    serve_web(pipeline)
}

/// Launch the bundled web server against the web export directory.
///
/// The server is started detached; the command returns once it is running.
fn serve_web(pipeline: &Pipeline) -> Result<()> {
    stop_web();

    let script = pipeline
        .ctx
        .project_dir
        .join(ENGINE_CACHE_DIR)
        .join(WEB_SERVER_SCRIPT);
    let port = pipeline.server_port;

    println!("web server running at http://127.0.0.1:{port}");
    Command::new("python3")
        .arg(&script)
        .arg("-r")
        .arg(&pipeline.ctx.web_dir)
        .arg("-p")
        .arg(port.to_string())
        .spawn()
        .with_context(|| format!("Failed to start web server {}", script.display()))?;
    Ok(())
}

/// Kill any running instance of the bundled web server.
pub fn stop_web() {
    if cfg!(windows) {
        let _ = Command::new("taskkill")
            .args(["/F", "/IM", "python.exe"])
            .status();
        let _ = Command::new("taskkill")
            .args(["/F", "/IM", "pythonw.exe"])
            .status();
    } else {
        let _ = Command::new("pkill")
            .args(["-f", WEB_SERVER_SCRIPT])
            .status();
    }
}
