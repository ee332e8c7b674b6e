//! `config.toml` files.
//!
//! `~/.gantry/config.toml` holds user defaults; `.gantry/config.toml` beside
//! the recipe overrides them field by field. Command-line flags override both.
//! Environment signals are never read here, only the names to read them from.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::signals::SignalVars;
use crate::core::version::{VersionPolicy, VersionResolver};
use crate::ops::package::CopyPolicy;

/// Gantry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Native build settings
    pub build: BuildConfig,

    /// Names of the environment variables read as signals
    pub signals: SignalsConfig,

    /// Version resolution
    pub version: VersionConfig,

    /// Packaging
    pub package: PackageConfig,
}

/// `[build]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Path to the cmake executable (None = search PATH)
    pub cmake: Option<PathBuf>,

    /// CMake generator, e.g. "Ninja"
    pub generator: Option<String>,

    /// Dependency install prefixes forwarded as CMAKE_PREFIX_PATH
    pub prefix_path: Vec<PathBuf>,

    /// Build directory, relative to the recipe root
    pub build_dir: Option<PathBuf>,

    /// Package directory, relative to the recipe root
    pub package_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalsConfig {
    pub ci_tag: Option<String>,
    pub version_override: Option<String>,
    pub cpu_count: Option<String>,
}

impl SignalsConfig {
    /// Variable names, with defaults filled in.
    pub fn vars(&self) -> SignalVars {
        let defaults = SignalVars::default();
        SignalVars {
            ci_tag: self.ci_tag.clone().unwrap_or(defaults.ci_tag),
            version_override: self
                .version_override
                .clone()
                .unwrap_or(defaults.version_override),
            cpu_count: self.cpu_count.clone().unwrap_or(defaults.cpu_count),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    pub policy: Option<VersionPolicy>,

    /// Fail when the tag and override signals disagree
    pub reject_conflicting: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub policy: Option<CopyPolicy>,
}

impl Config {
    /// Parse one config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Defaults when `path` is absent; a file that exists must parse.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Overlay `other` on `self`; fields set in `other` win.
    pub fn merge(&mut self, other: Config) {
        if other.build.cmake.is_some() {
            self.build.cmake = other.build.cmake;
        }
        if other.build.generator.is_some() {
            self.build.generator = other.build.generator;
        }
        if !other.build.prefix_path.is_empty() {
            self.build.prefix_path = other.build.prefix_path;
        }
        if other.build.build_dir.is_some() {
            self.build.build_dir = other.build.build_dir;
        }
        if other.build.package_dir.is_some() {
            self.build.package_dir = other.build.package_dir;
        }

        if other.signals.ci_tag.is_some() {
            self.signals.ci_tag = other.signals.ci_tag;
        }
        if other.signals.version_override.is_some() {
            self.signals.version_override = other.signals.version_override;
        }
        if other.signals.cpu_count.is_some() {
            self.signals.cpu_count = other.signals.cpu_count;
        }

        if other.version.policy.is_some() {
            self.version.policy = other.version.policy;
        }
        if other.version.reject_conflicting.is_some() {
            self.version.reject_conflicting = other.version.reject_conflicting;
        }

        if other.package.policy.is_some() {
            self.package.policy = other.package.policy;
        }
    }

    /// The version resolver this configuration describes.
    pub fn version_resolver(&self) -> VersionResolver {
        VersionResolver::new(self.version.policy.unwrap_or_default())
            .reject_conflicting(self.version.reject_conflicting.unwrap_or(false))
    }

    pub fn copy_policy(&self) -> CopyPolicy {
        self.package.policy.unwrap_or_default()
    }
}

/// Defaults, then the global file, then the project file.
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path)?);
    }

    config.merge(Config::load_or_default(project_path)?);

    Ok(config)
}

/// Get the global gantry config directory (~/.gantry).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".gantry"))
}

/// Get the project config path (.gantry/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".gantry").join("config.toml")
}
