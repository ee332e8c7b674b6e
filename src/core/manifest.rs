//! Gantry.toml recipe parsing and schema.
//!
//! The recipe declares the package's identity, its option schema, the
//! requirements handed to the package framework, where the packager finds
//! headers and libraries, and how consumers link against the result.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::dependency::{DependencySpec, Requirement};
use crate::core::errors::RecipeError;
use crate::core::options::{BuildOptionSet, OptionDecl};

/// File name of the recipe manifest.
pub const MANIFEST_NAME: &str = "Gantry.toml";

/// Package metadata from the [package] section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageMetadata {
    /// Stable package identifier
    pub name: String,

    /// Static fallback version, used verbatim when no signal applies
    pub version: String,

    #[serde(default)]
    pub license: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Topic tags (a set; duplicates collapse)
    #[serde(default)]
    pub topics: BTreeSet<String>,

    /// Requirements in `name/version[@user/channel]` form
    #[serde(default)]
    pub requires: Vec<Requirement>,
}

/// Where the packager looks for outputs. From the [layout] section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Header tree, relative to the package root
    pub include_dir: PathBuf,

    /// Header file extensions, without the dot
    pub header_extensions: Vec<String>,

    /// File-name patterns for compiled libraries
    pub library_patterns: Vec<String>,

    /// Extra patterns used when the `shared` option is on
    pub shared_library_patterns: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            include_dir: PathBuf::from("include"),
            header_extensions: vec!["h".to_string(), "hpp".to_string()],
            library_patterns: vec!["*.a".to_string(), "*.lib".to_string()],
            shared_library_patterns: vec![
                "*.so".to_string(),
                "*.so.*".to_string(),
                "*.dylib".to_string(),
                "*.dll".to_string(),
            ],
        }
    }
}

/// How consumers learn which libraries to link.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawLibs", into = "RawLibs")]
pub enum LibsPolicy {
    /// A fixed, declared list of library names
    Fixed(Vec<String>),
    /// Scan the packaged library directories
    #[default]
    Discover,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawLibs {
    List(Vec<String>),
    Keyword(String),
}

impl TryFrom<RawLibs> for LibsPolicy {
    type Error = String;

    fn try_from(raw: RawLibs) -> Result<Self, Self::Error> {
        match raw {
            RawLibs::List(libs) => Ok(LibsPolicy::Fixed(libs)),
            RawLibs::Keyword(k) if k == "discover" => Ok(LibsPolicy::Discover),
            RawLibs::Keyword(k) => Err(format!(
                "invalid libs policy '{}'; expected a list of names or \"discover\"",
                k
            )),
        }
    }
}

impl From<LibsPolicy> for RawLibs {
    fn from(policy: LibsPolicy) -> Self {
        match policy {
            LibsPolicy::Fixed(libs) => RawLibs::List(libs),
            LibsPolicy::Discover => RawLibs::Keyword("discover".to_string()),
        }
    }
}

/// Consumer-facing metadata from the [consumer] section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumerConfig {
    pub libs: LibsPolicy,

    /// Library search directories, relative to the package directory
    pub libdirs: Vec<PathBuf>,

    /// Include directories, relative to the package directory
    pub includedirs: Vec<PathBuf>,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        ConsumerConfig {
            libs: LibsPolicy::Discover,
            libdirs: vec![PathBuf::from("lib")],
            includedirs: vec![PathBuf::from("include")],
        }
    }
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    package: PackageMetadata,

    #[serde(default)]
    options: Option<BTreeMap<String, OptionDecl>>,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    consumer: ConsumerConfig,
}

/// A parsed and validated Gantry.toml.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub package: PackageMetadata,

    /// Declared option schema, before platform normalization
    pub options: BuildOptionSet,

    pub requires: DependencySpec,

    pub layout: LayoutConfig,

    pub consumer: ConsumerConfig,

    /// The directory containing the manifest
    pub root: PathBuf,
}

impl Recipe {
    /// Load a recipe from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse recipe content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        validate_metadata(&raw.package)?;

        let options = match raw.options {
            Some(decls) => BuildOptionSet::new(decls)?,
            None => BuildOptionSet::standard(),
        };

        let requires = DependencySpec::new(raw.package.requires.clone())?;

        Ok(Recipe {
            package: raw.package,
            options,
            requires,
            layout: raw.layout,
            consumer: raw.consumer,
            root,
        })
    }

    pub fn name(&self) -> &str {
        &self.package.name
    }
}

fn validate_metadata(pkg: &PackageMetadata) -> Result<(), RecipeError> {
    let name_ok = !pkg.name.is_empty()
        && pkg
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !name_ok {
        return Err(RecipeError::InvalidSetting {
            setting: "package.name",
            value: pkg.name.clone(),
            expected: Some("letters, digits, `_`, `-` or `.`".to_string()),
        });
    }

    if pkg.version.trim().is_empty() {
        return Err(RecipeError::InvalidSetting {
            setting: "package.version",
            value: pkg.version.clone(),
            expected: Some("a non-empty fallback version".to_string()),
        });
    }

    if let Some(ref url) = pkg.url {
        url::Url::parse(url).map_err(|_| RecipeError::InvalidUrl(url.clone()))?;
    }

    Ok(())
}

/// Find the manifest in `dir`, if present.
pub fn manifest_in(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(MANIFEST_NAME);
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{OptionValue, FPIC, SHARED};

    const GIGAMONKEY: &str = r#"
[package]
name = "gigamonkey"
version = "0.0.15"
license = "Open BSV"
author = "Daniel Krawisz"
url = "https://github.com/Gigamonkey-BSV/Gigamonkey"
description = "Bitcoin and Bitcoin protocols, including Boost POW and Stratum"
topics = ["Bitcoin", "Boost POW", "Stratum", "Bitcoin"]
requires = [
    "boost/1.80.0",
    "openssl/1.1.1t",
    "secp256k1/0.3@proofofwork/stable",
    "data/v0.0.26@proofofwork/stable",
]

[consumer]
libs = ["gigamonkey"]
"#;

    fn parse(content: &str) -> Result<Recipe> {
        Recipe::parse(content, Path::new("/pkg/Gantry.toml"))
    }

    #[test]
    fn test_parse_full_recipe() {
        let recipe = parse(GIGAMONKEY).unwrap();

        assert_eq!(recipe.name(), "gigamonkey");
        assert_eq!(recipe.package.version, "0.0.15");
        assert_eq!(recipe.package.topics.len(), 3);
        assert_eq!(recipe.requires.len(), 4);
        assert_eq!(
            recipe.requires.get("secp256k1").unwrap().to_string(),
            "secp256k1/0.3@proofofwork/stable"
        );
        assert_eq!(recipe.root, PathBuf::from("/pkg"));
        assert_eq!(
            recipe.consumer.libs,
            LibsPolicy::Fixed(vec!["gigamonkey".to_string()])
        );
    }

    #[test]
    fn test_default_options_and_layout() {
        let recipe = parse("[package]\nname = \"mini\"\nversion = \"0.1\"\n").unwrap();

        let shared = recipe.options.get(SHARED).unwrap();
        assert_eq!(shared.default, OptionValue::Bool(false));
        let fpic = recipe.options.get(FPIC).unwrap();
        assert_eq!(fpic.default, OptionValue::Bool(true));

        assert_eq!(recipe.layout, LayoutConfig::default());
        assert_eq!(recipe.consumer.libs, LibsPolicy::Discover);
        assert_eq!(recipe.consumer.libdirs, vec![PathBuf::from("lib")]);
    }

    #[test]
    fn test_custom_options() {
        let recipe = parse(
            r#"
[package]
name = "mini"
version = "0.1"

[options]
shared = { values = [true, false], default = true }
backend = { values = ["gmp", "boost"], default = "gmp" }
"#,
        )
        .unwrap();

        assert!(!recipe.options.contains(FPIC));
        assert_eq!(
            recipe.options.get("backend").unwrap().default,
            OptionValue::Str("gmp".into())
        );
    }

    #[test]
    fn test_discover_keyword() {
        let recipe = parse(
            "[package]\nname = \"mini\"\nversion = \"0.1\"\n[consumer]\nlibs = \"discover\"\n",
        )
        .unwrap();
        assert_eq!(recipe.consumer.libs, LibsPolicy::Discover);

        assert!(parse(
            "[package]\nname = \"mini\"\nversion = \"0.1\"\n[consumer]\nlibs = \"everything\"\n",
        )
        .is_err());
    }

    #[test]
    fn test_duplicate_requirement_is_error() {
        let err = parse(
            r#"
[package]
name = "mini"
version = "0.1"
requires = ["gmp/6.2.1", "gmp/6.3.0"]
"#,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RecipeError>(),
            Some(RecipeError::DuplicateRequirement { .. })
        ));
    }

    #[test]
    fn test_invalid_url_is_error() {
        let err = parse("[package]\nname = \"mini\"\nversion = \"0.1\"\nurl = \"not a url\"\n")
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecipeError>(),
            Some(RecipeError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_unknown_section_is_error() {
        assert!(parse("[package]\nname = \"mini\"\nversion = \"0.1\"\n[targets]\n").is_err());
    }

    #[test]
    fn test_manifest_in() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(manifest_in(tmp.path()).is_none());

        std::fs::write(tmp.path().join(MANIFEST_NAME), "").unwrap();
        assert_eq!(
            manifest_in(tmp.path()),
            Some(tmp.path().join(MANIFEST_NAME))
        );
    }
}
