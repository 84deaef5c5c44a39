//! Synchronous external tool invocation
//!
//! Every invocation carries an explicit working directory and environment;
//! the process-wide CWD is never mutated. Calls block until the tool exits
//! and no timeout is enforced — a hung tool hangs the pipeline.

use crate::error::{BuildError, BuildResult};
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a tool to completion, inheriting stdout/stderr.
pub fn run(dir: &Path, envs: &[(&str, String)], program: &str, args: &[&str]) -> BuildResult<()> {
    println!("Running command: {} {}", program, args.join(" "));

    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .envs(envs.iter().map(|(k, v)| (*k, v.as_str())))
        .status()
        .map_err(|e| BuildError::CommandSpawn {
            program: program.to_string(),
            error: e,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(BuildError::CommandFailed {
            program: program.to_string(),
            code: status.code().unwrap_or(-1),
        })
    }
}

/// Run a tool and return its trimmed stdout (SDK path queries and the like).
pub fn run_capture(
    dir: &Path,
    envs: &[(&str, String)],
    program: &str,
    args: &[&str],
) -> BuildResult<String> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .envs(envs.iter().map(|(k, v)| (*k, v.as_str())))
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| BuildError::CommandSpawn {
            program: program.to_string(),
            error: e,
        })?;

    if !output.status.success() {
        return Err(BuildError::CommandFailed {
            program: program.to_string(),
            code: output.status.code().unwrap_or(-1),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a tool, reporting only spawn failures; the exit status is discarded.
pub fn run_unchecked(dir: &Path, program: &str, args: &[&str]) -> BuildResult<()> {
    println!("Running command: {} {}", program, args.join(" "));

    Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .map_err(|e| BuildError::CommandSpawn {
            program: program.to_string(),
            error: e,
        })?;
    Ok(())
}
