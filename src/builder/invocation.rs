//! The realized configuration for one native build.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::descriptor::PackageDescriptor;
use crate::core::errors::RecipeError;
use crate::core::options::{OptionValue, OptionValues, FPIC, SHARED};
use crate::core::signals::EnvSignals;

/// Cache variable that switches off the package's own test suite.
pub const PACKAGE_TESTS: &str = "PACKAGE_TESTS";

/// Source and build directories plus generator selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDirs {
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub generator: Option<String>,
    /// Install prefixes of dependencies, forwarded as CMAKE_PREFIX_PATH
    pub prefix_path: Vec<PathBuf>,
}

impl BuildDirs {
    /// `<source>/build/<BuildType>` with the generator left to CMake.
    pub fn for_source(source_dir: &Path, descriptor: &PackageDescriptor) -> Self {
        BuildDirs {
            source_dir: source_dir.to_path_buf(),
            build_dir: source_dir
                .join("build")
                .join(descriptor.settings().build_type.as_str()),
            generator: None,
            prefix_path: Vec::new(),
        }
    }
}

/// The build tool a CMake generator drives, as far as its job-count flag
/// is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NativeTool {
    /// Make, Ninja and JOM: `-j N`
    Make,
    /// `/m:N`
    MsBuild,
    /// `-jobs N`
    Xcode,
    /// No job-count flag
    NMake,
}

impl NativeTool {
    fn for_generator(generator: Option<&str>) -> Self {
        match generator {
            Some(g) if g.starts_with("Visual Studio") => NativeTool::MsBuild,
            Some("Xcode") => NativeTool::Xcode,
            Some(g) if g.starts_with("NMake Makefiles") && !g.ends_with("JOM") => {
                NativeTool::NMake
            }
            _ => NativeTool::Make,
        }
    }

    fn jobs_args(self, jobs: NonZeroU32) -> Vec<String> {
        match self {
            NativeTool::Make => vec!["-j".to_string(), jobs.to_string()],
            NativeTool::MsBuild => vec![format!("/m:{}", jobs)],
            NativeTool::Xcode => vec!["-jobs".to_string(), jobs.to_string()],
            NativeTool::NMake => Vec::new(),
        }
    }
}

/// Everything needed to configure and build once.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInvocation {
    descriptor: PackageDescriptor,
    options: OptionValues,
    dirs: BuildDirs,
    /// Whether the orchestrator's own parallel strategy is used
    parallel: bool,
    /// Core count handed to the native tool's parallelism flag
    jobs: Option<NonZeroU32>,
}

impl BuildInvocation {
    /// Realize an invocation. A present core-count signal turns off the
    /// orchestrator's parallel strategy and is forwarded to the native tool;
    /// a generator whose tool cannot take it is a configuration error.
    pub fn new(
        descriptor: PackageDescriptor,
        options: OptionValues,
        dirs: BuildDirs,
        signals: &EnvSignals,
    ) -> Result<Self, RecipeError> {
        let jobs = signals.core_count()?;
        let tool = NativeTool::for_generator(dirs.generator.as_deref());
        if jobs.is_some() && tool == NativeTool::NMake {
            return Err(RecipeError::JobsUnsupported(
                dirs.generator.clone().unwrap_or_default(),
            ));
        }

        Ok(BuildInvocation {
            descriptor,
            options,
            dirs,
            parallel: jobs.is_none(),
            jobs,
        })
    }

    pub fn descriptor(&self) -> &PackageDescriptor {
        &self.descriptor
    }

    pub fn options(&self) -> &OptionValues {
        &self.options
    }

    pub fn dirs(&self) -> &BuildDirs {
        &self.dirs
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn jobs(&self) -> Option<NonZeroU32> {
        self.jobs
    }

    fn build_type(&self) -> &'static str {
        self.descriptor.settings().build_type.as_str()
    }

    /// CMake cache variables, in the order they are passed.
    pub fn cache_variables(&self) -> Vec<(String, String)> {
        let mut vars = vec![
            (PACKAGE_TESTS.to_string(), "Off".to_string()),
            ("CMAKE_BUILD_TYPE".to_string(), self.build_type().to_string()),
        ];

        for (name, value) in self.options.iter() {
            let key = match name {
                SHARED => "BUILD_SHARED_LIBS",
                FPIC => "CMAKE_POSITION_INDEPENDENT_CODE",
                PACKAGE_TESTS => {
                    tracing::warn!("option `{}` is ignored; package tests stay disabled", name);
                    continue;
                }
                other => other,
            };
            vars.push((key.to_string(), cmake_value(value)));
        }

        if !self.dirs.prefix_path.is_empty() {
            let joined = self
                .dirs
                .prefix_path
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(";");
            vars.push(("CMAKE_PREFIX_PATH".to_string(), joined));
        }

        vars
    }

    /// Arguments for the configure step.
    pub fn configure_args(&self) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            self.dirs.source_dir.display().to_string(),
            "-B".to_string(),
            self.dirs.build_dir.display().to_string(),
        ];

        if let Some(ref generator) = self.dirs.generator {
            args.push("-G".to_string());
            args.push(generator.clone());
        }

        for (key, value) in self.cache_variables() {
            args.push(format!("-D{}={}", key, value));
        }

        args
    }

    /// Arguments for the build step.
    ///
    /// Without a core count the build uses `--parallel` and lets CMake pick
    /// the job count. With one, `--parallel` is omitted and the count goes
    /// to the native tool after `--`.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "--build".to_string(),
            self.dirs.build_dir.display().to_string(),
            "--config".to_string(),
            self.build_type().to_string(),
        ];

        match self.jobs {
            Some(jobs) => {
                args.push("--".to_string());
                args.extend(self.native_tool().jobs_args(jobs));
            }
            None => args.push("--parallel".to_string()),
        }

        args
    }

    fn native_tool(&self) -> NativeTool {
        NativeTool::for_generator(self.dirs.generator.as_deref())
    }
}

/// Render an option value the way CMake expects it.
fn cmake_value(value: &OptionValue) -> String {
    match value {
        OptionValue::Bool(true) => "ON".to_string(),
        OptionValue::Bool(false) => "OFF".to_string(),
        OptionValue::Str(s) => s.clone(),
    }
}
