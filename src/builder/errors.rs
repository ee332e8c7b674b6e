//! Native build failures.

use miette::Diagnostic;
use thiserror::Error;

/// The native build tool exited unsuccessfully. Fatal, never retried.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("cmake configure failed with exit code: {}", display_code(.code))]
    #[diagnostic(
        code(gantry::build::configure_failed),
        help("Run `gantry build --verbose` to see the full cmake command")
    )]
    ConfigureFailed { command: String, code: Option<i32> },

    #[error("cmake build failed with exit code: {}", display_code(.code))]
    #[diagnostic(
        code(gantry::build::build_failed),
        help("Run `gantry build --verbose` to see the full cmake command")
    )]
    BuildFailed { command: String, code: Option<i32> },
}

impl BuildError {
    /// The command line that failed.
    pub fn command(&self) -> &str {
        match self {
            BuildError::ConfigureFailed { command, .. } | BuildError::BuildFailed { command, .. } => {
                command
            }
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            BuildError::ConfigureFailed { code, .. } | BuildError::BuildFailed { code, .. } => *code,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}
