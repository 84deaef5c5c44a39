/// Build engine error types
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid architecture '{arch}'; valid architectures: {valid}")]
    InvalidArchitecture { arch: String, valid: String },

    #[error("No native toolchain for host {os}/{arch}")]
    ToolchainMissing { os: String, arch: String },

    #[error("Command '{program}' failed with exit code {code}")]
    CommandFailed { program: String, code: i32 },

    #[error("Failed to start '{program}': {error}")]
    CommandSpawn {
        program: String,
        error: std::io::Error,
    },

    #[error("Code generation failed: {0}")]
    CodegenFailed(String),

    #[error("Build step '{step}' failed")]
    StepFailed {
        step: String,
        #[source]
        source: Box<BuildError>,
    },

    #[error("I/O error at {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Environment error: {0}")]
    Env(#[from] spx_env::EnvError),
}

impl BuildError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            error,
        }
    }

    /// Create an invalid-architecture error listing the valid set
    pub fn invalid_arch(arch: impl Into<String>, valid: &[&str]) -> Self {
        Self::InvalidArchitecture {
            arch: arch.into(),
            valid: valid.join(","),
        }
    }

    /// Wrap a failure with the name of the numbered sub-step it aborted
    pub fn step(step: impl Into<String>, source: BuildError) -> Self {
        Self::StepFailed {
            step: step.into(),
            source: Box::new(source),
        }
    }
}
