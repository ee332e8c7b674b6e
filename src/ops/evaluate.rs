//! Metadata evaluation: resolve the version and normalize options before
//! anything is built.

use anyhow::Result;
use serde::Serialize;

use crate::core::dependency::Requirement;
use crate::core::descriptor::PackageDescriptor;
use crate::core::manifest::Recipe;
use crate::core::options::{BuildOptionSet, OptionOverride, OptionValues};
use crate::core::settings::Settings;
use crate::core::signals::EnvSignals;
use crate::core::version::VersionResolver;

/// A recipe evaluated for one settings tuple.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub descriptor: PackageDescriptor,
    /// Option schema after platform normalization
    pub options: BuildOptionSet,
    /// Effective option values: overrides applied over defaults
    pub values: OptionValues,
    pub requires: Vec<Requirement>,
}

/// Evaluate a recipe.
///
/// Fails with a configuration error when an override names an option that
/// isn't in the normalized schema or falls outside its domain, or when the
/// resolver rejects the version signals.
pub fn evaluate(
    recipe: &Recipe,
    settings: Settings,
    signals: &EnvSignals,
    resolver: &VersionResolver,
    overrides: &[OptionOverride],
) -> Result<Evaluation> {
    let version = resolver.resolve(signals, &recipe.package.version)?;
    tracing::debug!("resolved version {} from {:?}", version.value, version.source);

    let options = recipe.options.normalize(&settings.os);
    let values = options.resolve(overrides)?;

    let descriptor = PackageDescriptor::new(&recipe.package, version, settings);

    Ok(Evaluation {
        descriptor,
        options,
        values,
        requires: recipe.requires.iter().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::RecipeError;
    use crate::core::options::FPIC;
    use crate::core::settings::Os;
    use crate::core::version::{VersionPolicy, VersionSource};
    use crate::test_support::SAMPLE_RECIPE;
    use std::path::Path;

    fn recipe() -> Recipe {
        Recipe::parse(SAMPLE_RECIPE, Path::new("/src/gigamonkey/Gantry.toml")).unwrap()
    }

    fn settings(os: Os) -> Settings {
        Settings::host().with_os(os)
    }

    #[test]
    fn test_fallback_version_without_signals() {
        let eval = evaluate(
            &recipe(),
            settings(Os::Linux),
            &EnvSignals::default(),
            &VersionResolver::default(),
            &[],
        )
        .unwrap();

        assert_eq!(eval.descriptor.version(), "0.0.15");
        assert_eq!(eval.descriptor.resolved_version().source, VersionSource::Fallback);
        assert_eq!(eval.requires.len(), 2);
        assert_eq!(eval.requires[0].name, "boost");
    }

    #[test]
    fn test_tag_signal_sets_version() {
        let signals = EnvSignals::default().with_ci_tag("v2.0.1");
        let eval = evaluate(
            &recipe(),
            settings(Os::Linux),
            &signals,
            &VersionResolver::new(VersionPolicy::TagOverFallback),
            &[],
        )
        .unwrap();

        assert_eq!(eval.descriptor.version(), "2.0.1");
    }

    #[test]
    fn test_windows_drops_fpic() {
        let eval = evaluate(
            &recipe(),
            settings(Os::Windows),
            &EnvSignals::default(),
            &VersionResolver::default(),
            &[],
        )
        .unwrap();

        assert!(!eval.options.contains(FPIC));
        assert!(!eval.values.contains(FPIC));
        assert!(!eval.values.shared());
    }

    #[test]
    fn test_fpic_override_rejected_on_windows() {
        let overrides = vec!["fPIC=False".parse::<OptionOverride>().unwrap()];
        let err = evaluate(
            &recipe(),
            settings(Os::Windows),
            &EnvSignals::default(),
            &VersionResolver::default(),
            &overrides,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RecipeError>(),
            Some(RecipeError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_shared_override_applies() {
        let overrides = vec!["shared=True".parse::<OptionOverride>().unwrap()];
        let eval = evaluate(
            &recipe(),
            settings(Os::Linux),
            &EnvSignals::default(),
            &VersionResolver::default(),
            &overrides,
        )
        .unwrap();

        assert!(eval.values.shared());
        assert!(eval.values.contains(FPIC));
    }
}
