//! Command execution seam for the native build tool.

use std::process::ExitStatus;

use anyhow::Result;

use crate::util::process::ToolCommand;

/// Runs native build commands to completion.
///
/// The orchestrator only ever waits for a command and inspects its exit
/// status; output is never captured.
pub trait CommandRunner {
    fn run(&mut self, cmd: &ToolCommand) -> Result<ExitStatus>;
}

/// Runs commands as real subprocesses.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner {
    stdout_to_stderr: bool,
}

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner::default()
    }

    /// Send tool stdout to stderr, for commands whose own stdout carries
    /// machine-readable output.
    pub fn stdout_to_stderr(mut self, yes: bool) -> Self {
        self.stdout_to_stderr = yes;
        self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &ToolCommand) -> Result<ExitStatus> {
        tracing::debug!("running `{}`", cmd);
        if self.stdout_to_stderr {
            cmd.run_stdout_to_stderr()
        } else {
            cmd.run()
        }
    }
}
