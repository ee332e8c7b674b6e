//! Per-invocation context: where we are, where global config lives, and
//! the environment signals read once at startup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::errors::RecipeError;
use crate::core::manifest::manifest_in;
use crate::core::signals::EnvSignals;
use crate::util::config::{load_config, project_config_path, Config};
use crate::util::fs::canonical_or_given;

/// Paths shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    cwd: PathBuf,
    /// `~/.gantry`
    home: PathBuf,
}

impl GlobalContext {
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("could not determine the working directory")?;

        let home = crate::util::config::global_config_dir()
            .unwrap_or_else(|| PathBuf::from(".gantry"));

        Ok(GlobalContext { cwd, home })
    }

    /// Like [`GlobalContext::new`] but rooted at `cwd`.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// `~/.gantry/config.toml`
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Find `Gantry.toml` starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, RecipeError> {
        let mut current = self.cwd.clone();
        loop {
            if let Some(path) = manifest_in(&current) {
                return Ok(path);
            }
            if !current.pop() {
                return Err(RecipeError::ManifestNotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }

    /// Resolve the manifest to use: an explicit path (relative to cwd) or the
    /// nearest one above cwd. The result is absolute.
    pub fn manifest_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        let path = match explicit {
            Some(path) => self.cwd.join(path),
            None => self.find_manifest()?,
        };
        if !path.is_file() {
            anyhow::bail!("manifest not found: {}", path.display());
        }
        Ok(canonical_or_given(&path))
    }

    /// Merged global and project configuration for a recipe root.
    ///
    /// A config file that exists but does not parse is an error.
    pub fn config(&self, project_root: &Path) -> Result<Config> {
        load_config(Some(&self.config_path()), &project_config_path(project_root))
    }

    /// Capture environment signals from the process environment.
    ///
    /// Called once per invocation; everything downstream receives the
    /// captured value.
    pub fn capture_signals(&self, config: &Config) -> EnvSignals {
        EnvSignals::capture(&config.signals.vars())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::MANIFEST_NAME;
    use crate::test_support::{write_file, SAMPLE_RECIPE};
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let ctx = GlobalContext::new().unwrap();
        assert!(ctx.cwd().is_absolute());
        assert!(ctx.config_path().ends_with("config.toml"));
    }

    #[test]
    fn test_find_manifest_searches_upward() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), MANIFEST_NAME, SAMPLE_RECIPE);
        let nested = tmp.path().join("src/gigamonkey");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_cwd(nested).unwrap();
        assert_eq!(ctx.find_manifest().unwrap(), tmp.path().join(MANIFEST_NAME));
    }

    #[test]
    fn test_find_manifest_not_found() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).unwrap();
        assert!(matches!(
            ctx.find_manifest(),
            Err(RecipeError::ManifestNotFound { .. })
        ));
    }

    #[test]
    fn test_project_config_overrides_home() {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        let project = tmp.path().join("project");
        write_file(&home, "config.toml", "[build]\ngenerator = \"Unix Makefiles\"\ncmake = \"/usr/bin/cmake\"\n");
        write_file(&project, ".gantry/config.toml", "[build]\ngenerator = \"Ninja\"\n");

        let ctx = GlobalContext::with_cwd(project.clone()).unwrap().with_home(home);
        let config = ctx.config(&project).unwrap();

        assert_eq!(config.build.generator.as_deref(), Some("Ninja"));
        assert_eq!(config.build.cmake, Some(PathBuf::from("/usr/bin/cmake")));
    }
}
