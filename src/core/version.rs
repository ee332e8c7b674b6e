//! Package version resolution.
//!
//! The version comes from, in order of preference: an explicit override
//! signal, the CI tag signal with one leading `v` removed, and the static
//! version declared in the recipe.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::RecipeError;
use crate::core::signals::EnvSignals;

/// How the static fallback interacts with a tag-derived version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionPolicy {
    /// override > tag > fallback
    #[default]
    TagOverFallback,
    /// override > fallback; the tag is discarded whenever the override is
    /// absent. Kept for recipes that depend on the older behavior.
    FallbackOverTag,
}

impl FromStr for VersionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tag-over-fallback" => Ok(VersionPolicy::TagOverFallback),
            "fallback-over-tag" => Ok(VersionPolicy::FallbackOverTag),
            _ => Err(format!(
                "invalid version policy '{}'; expected 'tag-over-fallback' or 'fallback-over-tag'",
                s
            )),
        }
    }
}

/// Which rule produced a resolved version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSource {
    Override,
    Tag,
    Fallback,
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSource::Override => f.write_str("override"),
            VersionSource::Tag => f.write_str("tag"),
            VersionSource::Fallback => f.write_str("fallback"),
        }
    }
}

/// A resolved version and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVersion {
    pub value: String,
    pub source: VersionSource,
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Strip a single leading `v` from a tag. A tag with nothing after the `v`
/// carries no version and yields `None`.
pub fn strip_tag(tag: &str) -> Option<&str> {
    let version = tag.strip_prefix('v').unwrap_or(tag);
    if version.is_empty() {
        tracing::warn!("ignoring CI tag `{}`: no version after the prefix", tag);
        return None;
    }
    Some(version)
}

/// Computes the package version from signals and a static fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionResolver {
    policy: VersionPolicy,
    reject_conflicting: bool,
}

impl VersionResolver {
    pub fn new(policy: VersionPolicy) -> Self {
        VersionResolver {
            policy,
            reject_conflicting: false,
        }
    }

    /// Treat a tag and an override that disagree as a configuration error.
    pub fn reject_conflicting(mut self, reject: bool) -> Self {
        self.reject_conflicting = reject;
        self
    }

    pub fn policy(&self) -> VersionPolicy {
        self.policy
    }

    /// Resolve the version. Only fails when conflicting signals are rejected.
    pub fn resolve(
        &self,
        signals: &EnvSignals,
        fallback: &str,
    ) -> Result<ResolvedVersion, RecipeError> {
        let tag = signals.ci_tag.as_deref().and_then(strip_tag);

        if let (Some(tag), Some(ov)) = (tag, signals.version_override.as_deref()) {
            if self.reject_conflicting && tag != ov {
                return Err(RecipeError::ConflictingVersionSignals {
                    tag: tag.to_string(),
                    override_version: ov.to_string(),
                });
            }
        }

        let resolved = match (signals.version_override.as_deref(), tag, self.policy) {
            (Some(ov), _, _) => ResolvedVersion {
                value: ov.to_string(),
                source: VersionSource::Override,
            },
            (None, Some(tag), VersionPolicy::TagOverFallback) => ResolvedVersion {
                value: tag.to_string(),
                source: VersionSource::Tag,
            },
            (None, Some(tag), VersionPolicy::FallbackOverTag) => {
                tracing::warn!(
                    "static version `{}` replaces tag-derived version `{}`",
                    fallback,
                    tag
                );
                ResolvedVersion {
                    value: fallback.to_string(),
                    source: VersionSource::Fallback,
                }
            }
            (None, None, _) => ResolvedVersion {
                value: fallback.to_string(),
                source: VersionSource::Fallback,
            },
        };

        tracing::debug!(version = %resolved.value, source = %resolved.source, "resolved version");
        Ok(resolved)
    }
}
