//! Implementation of `gantry build`.
//!
//! The pipeline is evaluate → configure → build → package. Any failure
//! stops it; a failed build never reaches the packager.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::builder::cmake::{is_cmake_project, CMakeBuilder};
use crate::builder::invocation::{BuildDirs, BuildInvocation};
use crate::builder::runner::CommandRunner;
use crate::core::layout::ArtifactLayout;
use crate::core::manifest::Recipe;
use crate::core::options::OptionOverride;
use crate::core::settings::Settings;
use crate::core::signals::EnvSignals;
use crate::core::version::VersionResolver;
use crate::ops::evaluate::{evaluate, Evaluation};
use crate::ops::package::{CopyPolicy, Packager};

/// Options for the build command.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Settings tuple supplied by the caller
    pub settings: Settings,

    /// Option overrides (`-o name=value`)
    pub overrides: Vec<OptionOverride>,

    /// Explicit cmake executable (None = search PATH)
    pub cmake: Option<PathBuf>,

    /// CMake generator
    pub generator: Option<String>,

    /// Dependency install prefixes
    pub prefix_path: Vec<PathBuf>,

    /// Build directory (None = `<root>/build/<BuildType>`)
    pub build_dir: Option<PathBuf>,

    /// Package directory (None = `<root>/package`)
    pub package_dir: Option<PathBuf>,

    /// Copy outputs into the package directory after building
    pub package: bool,

    pub copy_policy: CopyPolicy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            settings: Settings::host(),
            overrides: Vec::new(),
            cmake: None,
            generator: None,
            prefix_path: Vec::new(),
            build_dir: None,
            package_dir: None,
            package: true,
            copy_policy: CopyPolicy::default(),
        }
    }
}

/// A configured build, ready to run.
#[derive(Debug, Clone)]
pub struct PreparedBuild {
    pub evaluation: Evaluation,
    pub invocation: BuildInvocation,
    pub package_dir: PathBuf,
}

/// Outcome of a successful build.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub prepared: PreparedBuild,
    /// The packaged tree; None when packaging was skipped
    pub layout: Option<ArtifactLayout>,
}

/// Resolve `path` against the recipe root.
pub fn resolve_dir(recipe: &Recipe, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        recipe.root.join(path)
    }
}

/// The package directory for a recipe.
pub fn package_dir_for(recipe: &Recipe, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(dir) => resolve_dir(recipe, dir),
        None => recipe.root.join("package"),
    }
}

/// Evaluate the recipe and realize the build invocation.
///
/// All configuration errors surface here, before any command runs.
pub fn prepare(
    recipe: &Recipe,
    opts: &BuildOptions,
    signals: &EnvSignals,
    resolver: &VersionResolver,
) -> Result<PreparedBuild> {
    let evaluation = evaluate(
        recipe,
        opts.settings.clone(),
        signals,
        resolver,
        &opts.overrides,
    )?;

    let mut dirs = BuildDirs::for_source(&recipe.root, &evaluation.descriptor);
    if let Some(ref build_dir) = opts.build_dir {
        dirs.build_dir = resolve_dir(recipe, build_dir);
    }
    dirs.generator = opts.generator.clone();
    dirs.prefix_path = opts.prefix_path.clone();

    let invocation = BuildInvocation::new(
        evaluation.descriptor.clone(),
        evaluation.values.clone(),
        dirs,
        signals,
    )?;

    Ok(PreparedBuild {
        package_dir: package_dir_for(recipe, opts.package_dir.as_deref()),
        evaluation,
        invocation,
    })
}

/// Run the native build for a prepared invocation.
pub fn run_native_build(
    prepared: &PreparedBuild,
    cmake: Option<&Path>,
    runner: &mut dyn CommandRunner,
) -> Result<()> {
    let source_dir = &prepared.invocation.dirs().source_dir;
    if !is_cmake_project(source_dir) {
        bail!("no CMakeLists.txt found in {}", source_dir.display());
    }

    let mut builder = CMakeBuilder::new(cmake, runner)?;
    tracing::debug!("using cmake at {}", builder.program().display());
    builder.build(&prepared.invocation)
}

/// Copy the build outputs of a prepared invocation into its package dir.
pub fn package_outputs(
    recipe: &Recipe,
    prepared: &PreparedBuild,
    policy: CopyPolicy,
) -> Result<ArtifactLayout> {
    let packager = Packager::for_recipe(
        recipe,
        &prepared.invocation.dirs().build_dir,
        prepared.evaluation.values.shared(),
        policy,
    )?;

    packager
        .package(&prepared.package_dir)
        .with_context(|| format!("failed to package {}", recipe.name()))
}

/// Evaluate, configure, build and package.
pub fn build(
    recipe: &Recipe,
    opts: &BuildOptions,
    signals: &EnvSignals,
    resolver: &VersionResolver,
    runner: &mut dyn CommandRunner,
) -> Result<BuildResult> {
    let prepared = prepare(recipe, opts, signals, resolver)?;

    run_native_build(&prepared, opts.cmake.as_deref(), runner)?;

    let layout = if opts.package {
        Some(package_outputs(recipe, &prepared, opts.copy_policy)?)
    } else {
        None
    };

    Ok(BuildResult { prepared, layout })
}
