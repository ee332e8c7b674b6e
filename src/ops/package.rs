//! Copy build outputs into the package directory.
//!
//! Headers keep their directory structure below the include tree; compiled
//! libraries are flattened into `lib/`. Each destination directory is
//! cleared before copying, so a package directory never mixes outputs from
//! two builds and packaging an unchanged build twice yields the same tree.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use glob::Pattern;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::layout::ArtifactLayout;
use crate::core::manifest::Recipe;
use crate::util::fs::{canonical_or_given, copy_file, make_dir, path_under, remove_tree};

/// What to do when a rule's source directory is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyPolicy {
    /// Skip the rule; nothing is copied for that category
    #[default]
    Lenient,
    /// Fail packaging
    Strict,
}

impl FromStr for CopyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lenient" => Ok(CopyPolicy::Lenient),
            "strict" => Ok(CopyPolicy::Strict),
            _ => Err(format!(
                "invalid copy policy '{}'; expected 'lenient' or 'strict'",
                s
            )),
        }
    }
}

/// Packaging shortfall under the strict policy.
#[derive(Debug, Error, Diagnostic)]
pub enum PackageError {
    #[error("missing {category} directory: {}", .dir.display())]
    #[diagnostic(
        code(gantry::package::missing_source),
        help("Build the package first, or package with the lenient policy")
    )]
    MissingSource { category: String, dir: PathBuf },
}

/// One category of files to copy.
#[derive(Debug, Clone)]
pub struct CopyRule {
    /// Category name used in messages (`headers`, `libraries`)
    pub category: String,
    /// Absolute source directory, searched recursively
    pub src: PathBuf,
    /// Destination, relative to the package directory
    pub dst: PathBuf,
    /// File-name patterns; a file matching any of them is copied
    pub patterns: Vec<Pattern>,
    /// Keep the path relative to `src`, or flatten into `dst`
    pub keep_path: bool,
}

impl CopyRule {
    pub fn new(
        category: impl Into<String>,
        src: impl Into<PathBuf>,
        dst: impl Into<PathBuf>,
        patterns: &[String],
        keep_path: bool,
    ) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("invalid file pattern: {}", p)))
            .collect::<Result<Vec<_>>>()?;

        Ok(CopyRule {
            category: category.into(),
            src: src.into(),
            dst: dst.into(),
            patterns,
            keep_path,
        })
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| {
                let name = name.to_string_lossy();
                self.patterns.iter().any(|p| p.matches(&name))
            })
            .unwrap_or(false)
    }
}

/// Sole writer of the package directory.
#[derive(Debug, Clone, Default)]
pub struct Packager {
    rules: Vec<CopyRule>,
    policy: CopyPolicy,
}

impl Packager {
    pub fn new(policy: CopyPolicy) -> Self {
        Packager {
            rules: Vec::new(),
            policy,
        }
    }

    pub fn rule(mut self, rule: CopyRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The standard rules for a recipe: headers from the include tree into
    /// `include/`, libraries from the build directory into `lib/`.
    pub fn for_recipe(
        recipe: &Recipe,
        build_dir: &Path,
        shared: bool,
        policy: CopyPolicy,
    ) -> Result<Self> {
        let header_patterns: Vec<String> = recipe
            .layout
            .header_extensions
            .iter()
            .map(|ext| format!("*.{}", ext.trim_start_matches('.')))
            .collect();

        let mut library_patterns = recipe.layout.library_patterns.clone();
        if shared {
            library_patterns.extend(recipe.layout.shared_library_patterns.iter().cloned());
        }

        Ok(Packager::new(policy)
            .rule(CopyRule::new(
                "headers",
                recipe.root.join(&recipe.layout.include_dir),
                "include",
                &header_patterns,
                true,
            )?)
            .rule(CopyRule::new(
                "libraries",
                build_dir,
                "lib",
                &library_patterns,
                false,
            )?))
    }

    pub fn policy(&self) -> CopyPolicy {
        self.policy
    }

    /// Replace the package directory's contents with freshly copied outputs.
    ///
    /// Missing sources are checked before anything is removed, so a strict
    /// failure leaves the previous package tree as it was.
    pub fn package(&self, package_dir: &Path) -> Result<ArtifactLayout> {
        let mut present = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if rule.src.is_dir() {
                present.push(rule);
                continue;
            }
            match self.policy {
                CopyPolicy::Strict => {
                    return Err(PackageError::MissingSource {
                        category: rule.category.clone(),
                        dir: rule.src.clone(),
                    }
                    .into())
                }
                CopyPolicy::Lenient => tracing::warn!(
                    "no {} copied: {} does not exist",
                    rule.category,
                    rule.src.display()
                ),
            }
        }

        let destinations: BTreeSet<&Path> = self.rules.iter().map(|r| r.dst.as_path()).collect();
        for dst in &destinations {
            remove_tree(&package_dir.join(dst))?;
        }

        make_dir(package_dir)?;
        let guard = canonical_or_given(package_dir);
        let mut headers = Vec::new();
        let mut libraries = Vec::new();

        for rule in present {
            let copied = self.copy_rule(rule, package_dir, &guard)?;
            tracing::debug!("copied {} {}", copied.len(), rule.category);

            if rule.keep_path {
                headers.extend(copied);
            } else {
                libraries.extend(copied);
            }
        }

        headers.sort();
        headers.dedup();
        libraries.sort();
        libraries.dedup();

        Ok(ArtifactLayout {
            root: package_dir.to_path_buf(),
            headers,
            libraries,
        })
    }

    /// Copy one rule's matches, returning destination paths relative to the
    /// package directory.
    fn copy_rule(&self, rule: &CopyRule, package_dir: &Path, guard: &Path) -> Result<Vec<PathBuf>> {
        let mut copied: HashMap<PathBuf, PathBuf> = HashMap::new();

        let walker = WalkDir::new(&rule.src)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| canonical_or_given(e.path()) != guard);

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !rule.matches(entry.path()) {
                continue;
            }

            let rel_dst = if rule.keep_path {
                rule.dst.join(path_under(&rule.src, entry.path()))
            } else {
                rule.dst.join(entry.file_name())
            };

            if let Some(previous) = copied.get(&rel_dst) {
                tracing::warn!(
                    "{} overwrites {} in {}",
                    entry.path().display(),
                    previous.display(),
                    rel_dst.display()
                );
            }

            copy_file(entry.path(), &package_dir.join(&rel_dst))?;
            copied.insert(rel_dst, entry.path().to_path_buf());
        }

        Ok(copied.into_keys().collect())
    }
}
