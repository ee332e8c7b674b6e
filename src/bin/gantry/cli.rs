//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use gantry::core::options::OptionOverride;
use gantry::core::settings::{BuildType, Os};

/// Gantry - build, package and publish CMake-based C/C++ libraries
#[derive(Parser)]
#[command(name = "gantry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to Gantry.toml (defaults to the nearest one above the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the evaluated package: version, options and requirements
    Inspect(InspectArgs),

    /// Configure, build and package the library
    Build(BuildArgs),

    /// Package the outputs of an existing build
    Package(PackageArgs),

    /// Show what consumers link against
    Info(InfoArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// The settings tuple. Omitted fields default to the host.
#[derive(Args, Clone, Debug)]
pub struct SettingsArgs {
    /// Target operating system
    #[arg(long)]
    pub os: Option<Os>,

    /// Compiler identifier
    #[arg(long)]
    pub compiler: Option<String>,

    /// Build type: Debug, Release, RelWithDebInfo or MinSizeRel
    #[arg(short = 't', long)]
    pub build_type: Option<BuildType>,

    /// Target architecture
    #[arg(long)]
    pub arch: Option<String>,
}

/// Settings plus option overrides.
#[derive(Args, Clone, Debug)]
pub struct EvalArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Override an option value (e.g. `-o shared=True`)
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<OptionOverride>,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub eval: EvalArgs,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub eval: EvalArgs,

    /// Build directory (defaults to build/<BuildType>)
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Package directory (defaults to package/)
    #[arg(long)]
    pub package_dir: Option<PathBuf>,

    /// Build only; leave the package directory untouched
    #[arg(long)]
    pub no_package: bool,

    /// Fail when an output directory is missing instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Print a JSON summary on success
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PackageArgs {
    #[command(flatten)]
    pub eval: EvalArgs,

    /// Build directory to package from (defaults to build/<BuildType>)
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Package directory (defaults to package/)
    #[arg(long)]
    pub package_dir: Option<PathBuf>,

    /// Fail when an output directory is missing instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Print the packaged layout as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Package directory (defaults to package/)
    #[arg(long)]
    pub package_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
