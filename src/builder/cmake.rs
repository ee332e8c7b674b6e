//! CMake driver: configure and build one invocation.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::errors::BuildError;
use crate::builder::invocation::BuildInvocation;
use crate::builder::runner::CommandRunner;
use crate::core::errors::RecipeError;
use crate::util::fs::make_dir;
use crate::util::process::{find_cmake, ToolCommand};

/// Drives CMake through a [`CommandRunner`].
pub struct CMakeBuilder<'a> {
    cmake: PathBuf,
    runner: &'a mut dyn CommandRunner,
}

impl<'a> CMakeBuilder<'a> {
    /// Locate CMake and create a builder.
    ///
    /// A missing CMake is a configuration error: nothing has run yet.
    pub fn new(configured: Option<&Path>, runner: &'a mut dyn CommandRunner) -> Result<Self> {
        let cmake = find_cmake(configured).ok_or(RecipeError::CMakeNotFound)?;
        Ok(Self::with_program(cmake, runner))
    }

    /// Create a builder around a known CMake path.
    pub fn with_program(cmake: PathBuf, runner: &'a mut dyn CommandRunner) -> Self {
        CMakeBuilder { cmake, runner }
    }

    pub fn program(&self) -> &Path {
        &self.cmake
    }

    /// Configure, then build. Stops at the first failure.
    pub fn build(&mut self, inv: &BuildInvocation) -> Result<()> {
        self.configure(inv)?;
        self.compile(inv)
    }

    /// Run the configure step.
    pub fn configure(&mut self, inv: &BuildInvocation) -> Result<()> {
        tracing::info!("Configuring {} {}", inv.descriptor().name(), inv.descriptor().version());

        make_dir(&inv.dirs().build_dir)?;

        let cmd = ToolCommand::new(self.cmake.clone())
            .with_args(inv.configure_args())
            .in_dir(&inv.dirs().source_dir);

        tracing::debug!("CMake configure: {}", cmd.to_string());

        let status = self.runner.run(&cmd)?;
        if !status.success() {
            return Err(BuildError::ConfigureFailed {
                command: cmd.to_string(),
                code: status.code(),
            }
            .into());
        }

        Ok(())
    }

    /// Run the build step.
    pub fn compile(&mut self, inv: &BuildInvocation) -> Result<()> {
        match inv.jobs() {
            Some(jobs) => tracing::info!("Building {} with {} jobs", inv.descriptor().name(), jobs),
            None => tracing::info!("Building {}", inv.descriptor().name()),
        }

        let cmd = ToolCommand::new(self.cmake.clone())
            .with_args(inv.build_args())
            .in_dir(&inv.dirs().source_dir);

        tracing::debug!("CMake build: {}", cmd.to_string());

        let status = self.runner.run(&cmd)?;
        if !status.success() {
            return Err(BuildError::BuildFailed {
                command: cmd.to_string(),
                code: status.code(),
            }
            .into());
        }

        Ok(())
    }
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join("CMakeLists.txt").exists()
}
