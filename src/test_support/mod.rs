//! Test utilities and mocks for gantry unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use gantry::test_support::MockRunner;
//!
//! let mut runner = MockRunner::new();
//! runner.fail_on("--build", 2);
//! // Hand `&mut runner` to a CMakeBuilder...
//! assert_eq!(runner.calls().len(), 2);
//! ```

pub mod fixtures;

use std::process::ExitStatus;

use anyhow::Result;

use crate::builder::runner::CommandRunner;
use crate::util::process::ToolCommand;

pub use fixtures::*;

/// Build an `ExitStatus` carrying the given exit code.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

/// Build an `ExitStatus` carrying the given exit code.
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

/// Failure expectation: commands containing `needle` exit with `code`.
#[derive(Debug, Clone)]
struct Failure {
    needle: String,
    code: i32,
}

/// Recording command runner.
///
/// Every command succeeds unless it matches a registered failure. Calls are
/// recorded as their display strings, in order.
#[derive(Debug, Default)]
pub struct MockRunner {
    failures: Vec<Failure>,
    calls: Vec<String>,
    commands: Vec<ToolCommand>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Make any command whose display string contains `needle` fail.
    pub fn fail_on(&mut self, needle: &str, code: i32) -> &mut Self {
        self.failures.push(Failure {
            needle: needle.to_string(),
            code,
        });
        self
    }

    /// Display strings of all commands run so far.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// The recorded commands themselves.
    pub fn commands(&self) -> &[ToolCommand] {
        &self.commands
    }
}

impl CommandRunner for MockRunner {
    fn run(&mut self, cmd: &ToolCommand) -> Result<ExitStatus> {
        let line = cmd.to_string();
        let code = self
            .failures
            .iter()
            .find(|f| line.contains(&f.needle))
            .map(|f| f.code)
            .unwrap_or(0);

        self.calls.push(line);
        self.commands.push(cmd.clone());
        Ok(exit_status(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_records_and_fails() {
        let mut runner = MockRunner::new();
        runner.fail_on("--build", 3);

        let ok = runner
            .run(&ToolCommand::new("cmake").with_args(["-S", "."]))
            .unwrap();
        let bad = runner
            .run(&ToolCommand::new("cmake").with_args(["--build", "b"]))
            .unwrap();

        assert!(ok.success());
        assert_eq!(bad.code(), Some(3));
        assert_eq!(runner.calls(), ["cmake -S .", "cmake --build b"]);
        assert_eq!(runner.commands().len(), 2);
    }
}
