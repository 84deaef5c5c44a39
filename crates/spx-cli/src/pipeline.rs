//! Command orchestration
//!
//! Every project command runs the same fixed stage sequence:
//! SetupPaths → CheckEnv → SetupEnv (templates, module graph, reimport
//! gate) → conditional native build → command action. The first failing
//! stage aborts the rest; nothing is retried. All stages return errors to
//! `main`, which owns the process exit code.

use crate::flags::SharedArgs;
use anyhow::{Context, Result};
use spx_build::{command, desktop, wasm};
use spx_env::{
    adapt_module_graph, check_env, parse_server_addr, resolve_engine_binary, should_reimport,
    ProjectContext, ProjectTemplates, ResolvedEngine, TemplateProvider, ENGINE_NAME, FILE_SUFFIX,
    PROJECT_REL_DIR,
};
use std::path::{Path, PathBuf};

/// Tool version; also selects the engine binary and web runtime templates
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default web server port when no server address is given
pub const DEFAULT_SERVER_PORT: u16 = 8005;

/// Prepared state for one command invocation
pub struct Pipeline {
    pub ctx: ProjectContext,
    pub engine: ResolvedEngine,
    pub flags: SharedArgs,
    pub server_port: u16,
    /// Runtime mode never triggers the engine's import pass
    pub runtime_mode: bool,
}

impl Pipeline {
    /// Run SetupPaths, CheckEnv and SetupEnv for a project command.
    pub fn prepare(flags: SharedArgs, runtime_mode: bool) -> Result<Self> {
        // SetupPaths
        let ctx = ProjectContext::resolve(&flags.path, PROJECT_REL_DIR, VERSION)
            .context("Failed to resolve project paths")?;
        let server_port = match &flags.server_addr {
            Some(addr) => parse_server_addr(addr)?.1,
            None => DEFAULT_SERVER_PORT,
        };

        // CheckEnv
        check_env(&ctx.target_dir, FILE_SUFFIX)?;

        // SetupEnv
        let engine = resolve_engine_binary(ENGINE_NAME, VERSION)?;
        let pipeline = Self {
            ctx,
            engine,
            flags,
            server_port,
            runtime_mode,
        };
        pipeline.setup_env()?;
        Ok(pipeline)
    }

    /// Materialize the engine project scaffold, reconcile the generated
    /// module's dependency descriptor, and run the import pass if the
    /// reimport gate says so.
    fn setup_env(&self) -> Result<()> {
        ProjectTemplates
            .write_to(&self.ctx.project_dir, false)
            .context("Failed to materialize project templates")?;
        adapt_module_graph(&self.ctx.project_dir, &self.ctx.go_dir)?;

        if should_reimport(&self.ctx.project_dir, self.runtime_mode) {
            self.reimport()?;
        }
        Ok(())
    }

    /// Build natively, then run the engine's headless import pass.
    ///
    /// The import's exit status is discarded; only the marker file the
    /// engine writes records success.
    fn reimport(&self) -> Result<()> {
        self.native_build()?;
        println!(" ================= Importing ... ================= ");
        command::run_unchecked(
            &self.ctx.project_dir,
            &self.engine_program(),
            &["--import", "--headless"],
        )?;
        Ok(())
    }

    /// Desktop native build with the invocation's arch request and tags.
    pub fn native_build(&self) -> Result<Vec<PathBuf>> {
        let libs = desktop::build(&self.ctx, &self.flags.arch, &self.flags.tags)?;
        Ok(libs)
    }

    /// WebAssembly build into the web export directory.
    pub fn wasm_build(&self) -> Result<PathBuf> {
        let module = wasm::build(&self.ctx, &self.flags.tags)?;
        Ok(module)
    }

    /// Engine executable as a program string for process invocation.
    pub fn engine_program(&self) -> String {
        self.engine.path.display().to_string()
    }

    /// Run the engine against the project with forwarded flags.
    pub fn run_engine(&self, extra: &[String]) -> Result<()> {
        let project = self.ctx.project_dir.display().to_string();
        let mut args: Vec<String> = vec!["--path".to_string(), project];
        args.extend(self.flags.forward_flags());
        args.extend(extra.iter().cloned());

        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        // The native library's runtime reads GODEBUG when the engine loads it;
        // signal handlers must stay off-stack-preemption safe.
        let envs = [("GODEBUG", "asyncpreemptoff=1".to_string())];
        command::run(
            &self.ctx.project_dir,
            &envs,
            &self.engine_program(),
            &arg_refs,
        )?;
        Ok(())
    }

    /// Drive the engine's headless export for a platform into `out`.
    pub fn engine_export(&self, platform: &str, out: &Path) -> Result<()> {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let project = self.ctx.project_dir.display().to_string();
        let out_str = out.display().to_string();
        command::run(
            &self.ctx.project_dir,
            &[],
            &self.engine_program(),
            &[
                "--headless",
                "--quit",
                "--path",
                &project,
                "--export-debug",
                platform,
                &out_str,
            ],
        )?;
        Ok(())
    }

    /// Warm up the engine's resource cache before an export; issues here
    /// are reported but do not abort the export.
    pub fn engine_import_warmup(&self) -> Result<()> {
        let project = self.ctx.project_dir.display().to_string();
        command::run_unchecked(
            &self.ctx.project_dir,
            &self.engine_program(),
            &["--headless", "--path", &project, "--editor", "--quit"],
        )?;
        Ok(())
    }

    /// Verify the engine project descriptor exists before driving exports.
    pub fn check_project_descriptor(&self) -> Result<()> {
        let descriptor = self.ctx.project_dir.join("project.engine");
        anyhow::ensure!(
            descriptor.is_file(),
            "Engine project descriptor not found at {}",
            descriptor.display()
        );
        Ok(())
    }
}
