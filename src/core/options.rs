//! Build option schema and platform normalization.
//!
//! A recipe declares each option's domain and default. Before anything is
//! configured the schema is normalized for the target OS, which may remove
//! options outright (`fPIC` does not exist on Windows).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::RecipeError;
use crate::core::settings::Os;

/// Name of the shared-library option.
pub const SHARED: &str = "shared";

/// Name of the position-independent-code option.
pub const FPIC: &str = "fPIC";

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl OptionValue {
    /// Check whether `text` spells this value. Booleans accept any casing
    /// of `true`/`false`, so `True` from a profile matches `true`.
    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            OptionValue::Bool(b) => text.eq_ignore_ascii_case(if *b { "true" } else { "false" }),
            OptionValue::Str(s) => s == text,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Str(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Str(s) => f.write_str(s),
        }
    }
}

/// Declared domain and default of one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionDecl {
    pub values: Vec<OptionValue>,
    pub default: OptionValue,
}

impl OptionDecl {
    /// A boolean option with the given default.
    pub fn boolean(default: bool) -> Self {
        OptionDecl {
            values: vec![OptionValue::Bool(true), OptionValue::Bool(false)],
            default: OptionValue::Bool(default),
        }
    }

    fn allowed(&self) -> String {
        self.values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Option name to declaration. Immutable once built; normalization returns
/// a new set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildOptionSet {
    decls: BTreeMap<String, OptionDecl>,
}

impl BuildOptionSet {
    /// Build a schema, checking every default against its domain.
    pub fn new(decls: BTreeMap<String, OptionDecl>) -> Result<Self, RecipeError> {
        for (name, decl) in &decls {
            if !decl.values.contains(&decl.default) {
                return Err(RecipeError::InvalidOptionValue {
                    name: name.clone(),
                    value: decl.default.to_string(),
                    allowed: Some(format!("allowed values: {}", decl.allowed())),
                });
            }
        }
        Ok(BuildOptionSet { decls })
    }

    /// `shared = false`, `fPIC = true`.
    pub fn standard() -> Self {
        let mut decls = BTreeMap::new();
        decls.insert(SHARED.to_string(), OptionDecl::boolean(false));
        decls.insert(FPIC.to_string(), OptionDecl::boolean(true));
        BuildOptionSet { decls }
    }

    /// Adjust the schema for the target OS.
    ///
    /// On Windows `fPIC` is removed from the set entirely; every other
    /// option, and every option on other platforms, passes through.
    pub fn normalize(&self, os: &Os) -> BuildOptionSet {
        let decls = self
            .decls
            .iter()
            .filter(|(name, _)| !(os.is_windows() && name.as_str() == FPIC))
            .map(|(name, decl)| (name.clone(), decl.clone()))
            .collect();
        BuildOptionSet { decls }
    }

    pub fn get(&self, name: &str) -> Option<&OptionDecl> {
        self.decls.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.decls.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionDecl)> {
        self.decls.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Compute effective values: each override replaces its option's default.
    ///
    /// Overrides for options absent from this set, or with values outside
    /// the declared domain, are configuration errors.
    pub fn resolve(&self, overrides: &[OptionOverride]) -> Result<OptionValues, RecipeError> {
        let mut values: BTreeMap<String, OptionValue> = self
            .decls
            .iter()
            .map(|(name, decl)| (name.clone(), decl.default.clone()))
            .collect();

        for ov in overrides {
            let Some(decl) = self.decls.get(&ov.name) else {
                let available = self.names().collect::<Vec<_>>().join(", ");
                return Err(RecipeError::UnknownOption {
                    name: ov.name.clone(),
                    available: Some(if available.is_empty() {
                        "this package declares no options".to_string()
                    } else {
                        format!("available options: {}", available)
                    }),
                });
            };

            let value = decl
                .values
                .iter()
                .find(|v| v.matches_text(&ov.value))
                .ok_or_else(|| RecipeError::InvalidOptionValue {
                    name: ov.name.clone(),
                    value: ov.value.clone(),
                    allowed: Some(format!("allowed values: {}", decl.allowed())),
                })?;

            values.insert(ov.name.clone(), value.clone());
        }

        Ok(OptionValues(values))
    }
}

impl Default for BuildOptionSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Effective option values for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionValues(BTreeMap<String, OptionValue>);

impl OptionValues {
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a shared library was requested.
    pub fn shared(&self) -> bool {
        self.get(SHARED).and_then(OptionValue::as_bool).unwrap_or(false)
    }
}

/// A caller-supplied `name=value` option override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionOverride {
    pub name: String,
    pub value: String,
}

impl FromStr for OptionOverride {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| RecipeError::MalformedOverride(s.to_string()))?;

        let name = name.trim();
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            return Err(RecipeError::MalformedOverride(s.to_string()));
        }

        Ok(OptionOverride {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ov(s: &str) -> OptionOverride {
        s.parse().unwrap()
    }

    #[test]
    fn test_windows_drops_fpic() {
        let opts = BuildOptionSet::standard().normalize(&Os::Windows);
        assert!(!opts.contains(FPIC));
        assert!(opts.contains(SHARED));

        let values = opts.resolve(&[]).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get(SHARED), Some(&OptionValue::Bool(false)));
    }

    #[test]
    fn test_other_platforms_unchanged() {
        let opts = BuildOptionSet::standard();
        for os in [Os::Linux, Os::Macos, Os::FreeBsd, Os::Other("Android".into())] {
            assert_eq!(opts.normalize(&os), opts);
        }
    }

    #[test]
    fn test_normalize_leaves_input_untouched() {
        let opts = BuildOptionSet::standard();
        let _ = opts.normalize(&Os::Windows);
        assert!(opts.contains(FPIC));
    }

    #[test]
    fn test_resolve_defaults() {
        let values = BuildOptionSet::standard().resolve(&[]).unwrap();
        assert_eq!(values.get(SHARED), Some(&OptionValue::Bool(false)));
        assert_eq!(values.get(FPIC), Some(&OptionValue::Bool(true)));
        assert!(!values.shared());
    }

    #[test]
    fn test_resolve_override_accepts_any_bool_case() {
        let values = BuildOptionSet::standard()
            .resolve(&[ov("shared=True")])
            .unwrap();
        assert!(values.shared());
    }

    #[test]
    fn test_resolve_rejects_removed_option() {
        let opts = BuildOptionSet::standard().normalize(&Os::Windows);
        let err = opts.resolve(&[ov("fPIC=false")]).unwrap_err();
        assert!(matches!(err, RecipeError::UnknownOption { ref name, .. } if name == "fPIC"));
    }

    #[test]
    fn test_resolve_rejects_value_outside_domain() {
        let err = BuildOptionSet::standard()
            .resolve(&[ov("shared=maybe")])
            .unwrap_err();
        assert!(matches!(err, RecipeError::InvalidOptionValue { .. }));
    }

    #[test]
    fn test_new_rejects_default_outside_domain() {
        let mut decls = BTreeMap::new();
        decls.insert(
            "backend".to_string(),
            OptionDecl {
                values: vec![
                    OptionValue::Str("gmp".into()),
                    OptionValue::Str("boost".into()),
                ],
                default: OptionValue::Str("openssl".into()),
            },
        );
        assert!(BuildOptionSet::new(decls).is_err());
    }

    #[test]
    fn test_override_parse() {
        assert_eq!(
            ov("shared = true"),
            OptionOverride {
                name: "shared".into(),
                value: "true".into()
            }
        );
        assert!("shared".parse::<OptionOverride>().is_err());
        assert!("=true".parse::<OptionOverride>().is_err());
    }
}
