//! External tool invocation.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};

/// One invocation of an external tool: program, arguments, working directory.
///
/// Arguments are kept as strings so the same value can be shown in logs and
/// error reports and compared in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ToolCommand {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }
        command
    }

    fn wait(&self, mut command: Command) -> Result<ExitStatus> {
        command
            .status()
            .with_context(|| format!("could not start `{}`", self.program.display()))
    }

    /// Run with inherited stdio and wait for it to exit.
    pub fn run(&self) -> Result<ExitStatus> {
        self.wait(self.command())
    }

    /// Like [`ToolCommand::run`], but the tool's stdout is written to our
    /// stderr, leaving stdout to the caller.
    pub fn run_stdout_to_stderr(&self) -> Result<ExitStatus> {
        let mut command = self.command();
        command.stdout(io::stderr());
        self.wait(command)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Locate CMake.
///
/// A configured value that names an existing file is used as-is; any other
/// configured value is looked up on PATH like a bare name.
pub fn find_cmake(configured: Option<&Path>) -> Option<PathBuf> {
    match configured {
        Some(path) if path.is_file() => Some(path.to_path_buf()),
        Some(name) => which::which(name).ok(),
        None => which::which("cmake").ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_program_and_args() {
        let cmd = ToolCommand::new("cmake").with_args(["--build", "build", "--parallel"]);
        assert_eq!(cmd.to_string(), "cmake --build build --parallel");
        assert_eq!(cmd.args().len(), 3);
        assert!(cmd.dir().is_none());
    }

    #[test]
    fn test_find_cmake_configured_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let fake = tmp.path().join("cmake");
        std::fs::write(&fake, "").unwrap();

        assert_eq!(find_cmake(Some(&fake)), Some(fake));
    }

    #[test]
    fn test_find_cmake_configured_missing() {
        assert_eq!(
            find_cmake(Some(Path::new("/definitely/not/here/cmake"))),
            None
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_exit_code() {
        let tmp = tempfile::TempDir::new().unwrap();
        let status = ToolCommand::new("sh")
            .with_args(["-c", "exit 3"])
            .in_dir(tmp.path())
            .run()
            .unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_stdout_to_stderr_keeps_exit_code() {
        let status = ToolCommand::new("sh")
            .with_args(["-c", "echo configuring; exit 2"])
            .run_stdout_to_stderr()
            .unwrap();
        assert_eq!(status.code(), Some(2));
    }
}
