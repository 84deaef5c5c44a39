use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod flags;
mod pipeline;

use commands::web::WebMode;
use flags::SharedArgs;
use pipeline::{Pipeline, VERSION};
use spx_env::{ProjectContext, PROJECT_REL_DIR};

/// spx game project build-and-export tool.
///
/// Drives the whole pipeline from scripting sources to distributable
/// artifacts: native shared libraries, mobile packages, WebAssembly
/// modules, and reproducible project archives for the host engine.
///
/// EXAMPLES:
///     spx init                     Create a project in the current path
///     spx init --path ./demo01     Create a project at ./demo01
///     spx run --path ./myproject   Run a project
///     spx export --arch all        Export desktop libraries for all archs
///     spx runweb --debugweb        Serve the web export with debugging
///     spx exportminigame --build fast   Skip wasm compression (faster)
#[derive(Parser)]
#[command(name = "spx")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an spx project in the target directory
    Init {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Open the current project in editor mode
    Editor {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Remove the generated project and scratch directories
    Clear {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Remove build artifacts, keeping the generated project
    Clearbuild {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Build the native shared library
    Build {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Build and run the current project
    Run {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Export the desktop package (Windows, macOS, Linux)
    Export {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Build the WebAssembly module
    Buildweb {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Launch the local web server
    Runweb {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Export the web package
    Exportweb {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Stop the local web server
    Stopweb,

    /// Run the project in multiplayer mode
    Runm {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Export the bot package
    Exportbot {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Export the Android package
    Exportapk {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Export the iOS package
    Exportios {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Export the web editor package
    Exportwebeditor {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Launch the web editor locally
    Runwebeditor {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Export the web runtime package
    Exportwebruntime {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Export the minigame package (supports --build fast)
    Exportminigame {
        #[command(flatten)]
        flags: SharedArgs,
    },

    /// Run the minigame package locally
    Runminigame {
        #[command(flatten)]
        flags: SharedArgs,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = dispatch(cli.command) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        // Pre-setup commands bypass environment and build entirely
        Commands::Init { flags } => commands::init::run(&flags.path, VERSION),
        Commands::Clear { flags } => {
            let ctx = ProjectContext::resolve(&flags.path, PROJECT_REL_DIR, VERSION)?;
            commands::clear::clear(&ctx)
        }
        Commands::Clearbuild { flags } => {
            let ctx = ProjectContext::resolve(&flags.path, PROJECT_REL_DIR, VERSION)?;
            commands::clear::clearbuild(&ctx)
        }
        Commands::Stopweb => {
            commands::run::stop_web();
            Ok(())
        }

        // Build-and-run commands
        Commands::Build { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.native_build()?;
            Ok(())
        }
        Commands::Run { flags } => {
            let pipeline = Pipeline::prepare(flags, true)?;
            pipeline.native_build()?;
            commands::run::run_project(&pipeline)
        }
        Commands::Editor { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.native_build()?;
            commands::run::run_editor(&pipeline)
        }
        Commands::Runm { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.native_build()?;
            commands::run::run_multiplayer(&pipeline)
        }

        // Build-and-export commands
        Commands::Export { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.native_build()?;
            commands::export::export_desktop(&pipeline)
        }
        Commands::Exportapk { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.native_build()?;
            commands::export::export_apk(&pipeline)
        }
        Commands::Exportios { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            commands::export::export_ios(&pipeline)
        }
        Commands::Exportbot { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.native_build()?;
            println!(
                "bot package uses the desktop libraries in {}",
                pipeline.ctx.lib_dir.display()
            );
            Ok(())
        }

        // Web commands
        Commands::Buildweb { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.wasm_build()?;
            Ok(())
        }
        Commands::Runweb { flags } => {
            let pipeline = Pipeline::prepare(flags, true)?;
            pipeline.wasm_build()?;
            commands::run::run_web(&pipeline)
        }
        Commands::Exportweb { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.wasm_build()?;
            commands::web::export_web(&pipeline, WebMode::Normal)
        }
        Commands::Exportwebeditor { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.wasm_build()?;
            commands::web::export_web(&pipeline, WebMode::Editor)
        }
        Commands::Runwebeditor { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.wasm_build()?;
            commands::run::run_web_editor(&pipeline)
        }
        Commands::Exportwebruntime { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.wasm_build()?;
            commands::web::export_web(&pipeline, WebMode::Runtime)
        }
        Commands::Exportminigame { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.wasm_build()?;
            commands::web::export_minigame(&pipeline)
        }
        Commands::Runminigame { flags } => {
            let pipeline = Pipeline::prepare(flags, false)?;
            pipeline.wasm_build()?;
            commands::run::run_minigame(&pipeline)
        }
    }
}
