//! Command implementations

pub mod build;
pub mod completions;
pub mod info;
pub mod inspect;
pub mod package;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::{EvalArgs, SettingsArgs};
use gantry::core::manifest::Recipe;
use gantry::core::settings::Settings;
use gantry::core::signals::EnvSignals;
use gantry::util::{Config, GlobalContext};

/// Flags shared by every command.
pub struct GlobalArgs {
    pub verbose: bool,
    pub manifest_path: Option<PathBuf>,
}

/// A loaded recipe with its configuration and the environment signals
/// captured for this invocation.
pub struct Session {
    pub recipe: Recipe,
    pub config: Config,
    pub signals: EnvSignals,
}

impl Session {
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let ctx = GlobalContext::new()?;

        let manifest_path = ctx.manifest_path(global.manifest_path.as_deref())?;
        tracing::debug!("using manifest {}", manifest_path.display());

        let recipe = Recipe::load(&manifest_path)?;
        let config = ctx.config(&recipe.root)?;
        let signals = ctx.capture_signals(&config);

        Ok(Session {
            recipe,
            config,
            signals,
        })
    }
}

impl SettingsArgs {
    /// The settings tuple, with host defaults for anything not given.
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::host();
        if let Some(ref os) = self.os {
            settings = settings.with_os(os.clone());
            // The host compiler guess follows the requested OS
            if self.compiler.is_none() {
                settings.compiler = Settings::default_compiler(os).to_string();
            }
        }
        if let Some(ref compiler) = self.compiler {
            settings = settings.with_compiler(compiler.clone());
        }
        if let Some(build_type) = self.build_type {
            settings = settings.with_build_type(build_type);
        }
        if let Some(ref arch) = self.arch {
            settings = settings.with_arch(arch.clone());
        }
        settings
    }
}

impl EvalArgs {
    pub fn to_settings(&self) -> Settings {
        self.settings.to_settings()
    }
}

/// Directory and policy flags shared by `build` and `package`.
pub struct OutputArgs<'a> {
    pub build_dir: Option<&'a std::path::Path>,
    pub package_dir: Option<&'a std::path::Path>,
    pub strict: bool,
}

impl Session {
    /// Build options from CLI flags, falling back to configuration.
    pub fn build_options(
        &self,
        eval: &EvalArgs,
        out: OutputArgs<'_>,
    ) -> gantry::ops::BuildOptions {
        let build = &self.config.build;
        gantry::ops::BuildOptions {
            settings: eval.to_settings(),
            overrides: eval.options.clone(),
            cmake: build.cmake.clone(),
            generator: build.generator.clone(),
            prefix_path: build.prefix_path.clone(),
            build_dir: out
                .build_dir
                .map(|p| p.to_path_buf())
                .or_else(|| build.build_dir.clone()),
            package_dir: out
                .package_dir
                .map(|p| p.to_path_buf())
                .or_else(|| build.package_dir.clone()),
            package: true,
            copy_policy: if out.strict {
                gantry::ops::CopyPolicy::Strict
            } else {
                self.config.copy_policy()
            },
        }
    }
}
