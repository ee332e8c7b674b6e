//! Environment signals.
//!
//! The process environment is read exactly once, when the CLI starts, and
//! the captured values are handed to version resolution and the build
//! orchestrator explicitly.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::core::errors::RecipeError;

/// Names of the environment variables that carry each signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalVars {
    /// CI tag, conventionally prefixed with `v`
    pub ci_tag: String,
    /// Explicit version override
    pub version_override: String,
    /// Core count delegated to the native build tool
    pub cpu_count: String,
}

impl Default for SignalVars {
    fn default() -> Self {
        SignalVars {
            ci_tag: "CIRCLE_TAG".to_string(),
            version_override: "CURRENT_VERSION".to_string(),
            cpu_count: "CONAN_CPU_COUNT".to_string(),
        }
    }
}

/// Captured signal values. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSignals {
    pub ci_tag: Option<String>,
    pub version_override: Option<String>,
    pub cpu_count: Option<String>,
}

impl EnvSignals {
    /// Capture signals from the process environment.
    pub fn capture(vars: &SignalVars) -> Self {
        Self::from_lookup(vars, |key| std::env::var(key).ok())
    }

    /// Capture signals through an arbitrary lookup.
    pub fn from_lookup<F>(vars: &SignalVars, mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let signals = EnvSignals {
            ci_tag: get(&vars.ci_tag),
            version_override: get(&vars.version_override),
            cpu_count: get(&vars.cpu_count),
        };
        tracing::debug!(?signals, "captured environment signals");
        signals
    }

    pub fn with_ci_tag(mut self, tag: impl Into<String>) -> Self {
        self.ci_tag = Some(tag.into());
        self
    }

    pub fn with_version_override(mut self, version: impl Into<String>) -> Self {
        self.version_override = Some(version.into());
        self
    }

    pub fn with_cpu_count(mut self, count: impl Into<String>) -> Self {
        self.cpu_count = Some(count.into());
        self
    }

    /// The core-count signal as a positive integer, if present.
    pub fn core_count(&self) -> Result<Option<NonZeroU32>, RecipeError> {
        match self.cpu_count {
            None => Ok(None),
            Some(ref raw) => raw
                .trim()
                .parse::<NonZeroU32>()
                .map(Some)
                .map_err(|_| RecipeError::InvalidCoreCount(raw.clone())),
        }
    }
}
