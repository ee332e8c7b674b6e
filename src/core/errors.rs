//! Configuration error types.
//!
//! Anything malformed or conflicting in the recipe, the caller's settings,
//! option overrides, or environment signals surfaces as a [`RecipeError`]
//! before the native build is started.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error. The build never starts when one is raised.
#[derive(Debug, Error, Diagnostic)]
pub enum RecipeError {
    #[error("duplicate requirement `{name}` ({first} and {second})")]
    #[diagnostic(
        code(gantry::recipe::duplicate_requirement),
        help("Keep a single entry for `{name}` in `requires`")
    )]
    DuplicateRequirement {
        name: String,
        first: String,
        second: String,
    },

    #[error("invalid requirement `{spec}`: {reason}")]
    #[diagnostic(
        code(gantry::recipe::invalid_requirement),
        help("Requirements are written as `name/version` or `name/version@user/channel`")
    )]
    InvalidRequirement { spec: String, reason: String },

    #[error("unknown option `{name}`")]
    #[diagnostic(code(gantry::recipe::unknown_option))]
    UnknownOption {
        name: String,
        #[help]
        available: Option<String>,
    },

    #[error("invalid value `{value}` for option `{name}`")]
    #[diagnostic(code(gantry::recipe::invalid_option_value))]
    InvalidOptionValue {
        name: String,
        value: String,
        #[help]
        allowed: Option<String>,
    },

    #[error("malformed option override `{0}`")]
    #[diagnostic(
        code(gantry::recipe::malformed_override),
        help("Option overrides are written as `name=value`")
    )]
    MalformedOverride(String),

    #[error("invalid setting `{setting}`: `{value}`")]
    #[diagnostic(code(gantry::recipe::invalid_setting))]
    InvalidSetting {
        setting: &'static str,
        value: String,
        #[help]
        expected: Option<String>,
    },

    #[error("invalid package url `{0}`")]
    #[diagnostic(code(gantry::recipe::invalid_url))]
    InvalidUrl(String),

    #[error("conflicting version signals: tag `{tag}` and override `{override_version}`")]
    #[diagnostic(
        code(gantry::version::conflicting_signals),
        help("Unset one of the version signals, or set `version.reject_conflicting = false`")
    )]
    ConflictingVersionSignals {
        tag: String,
        override_version: String,
    },

    #[error("invalid core count `{0}`")]
    #[diagnostic(
        code(gantry::build::invalid_core_count),
        help("The core-count signal must be a positive integer")
    )]
    InvalidCoreCount(String),

    #[error("generator `{0}` has no job-count flag")]
    #[diagnostic(
        code(gantry::build::jobs_unsupported),
        help("Unset the core-count signal, or use a generator such as Ninja or `NMake Makefiles JOM`")
    )]
    JobsUnsupported(String),

    #[error("CMake not found")]
    #[diagnostic(
        code(gantry::build::cmake_not_found),
        help("Install CMake and ensure it's in your PATH, or set `build.cmake` in .gantry/config.toml")
    )]
    CMakeNotFound,

    #[error("could not find `Gantry.toml` in `{}` or any parent directory", .dir.display())]
    #[diagnostic(
        code(gantry::recipe::manifest_not_found),
        help("Run gantry inside a package directory, or pass --manifest-path")
    )]
    ManifestNotFound { dir: std::path::PathBuf },
}
