//! Test fixtures for recipes, descriptors, and build trees.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::descriptor::PackageDescriptor;
use crate::core::manifest::{PackageMetadata, MANIFEST_NAME};
use crate::core::options::{BuildOptionSet, OptionDecl, OptionValues};
use crate::core::settings::{Os, Settings};
use crate::core::version::{ResolvedVersion, VersionSource};

/// A recipe resembling a real CMake-built library.
pub const SAMPLE_RECIPE: &str = r#"
[package]
name = "gigamonkey"
version = "0.0.15"
license = "Open BSV"
author = "Daniel Krawisz"
url = "https://github.com/Gigamonkey-BSV/Gigamonkey"
description = "Bitcoin and Bitcoin protocols, including Boost POW and Stratum"
topics = ["Bitcoin", "Boost POW", "Stratum"]
requires = ["boost/1.80.0", "secp256k1/0.3@proofofwork/stable"]
"#;

/// Minimal metadata for `gigamonkey`.
pub fn sample_metadata() -> PackageMetadata {
    PackageMetadata {
        name: "gigamonkey".to_string(),
        version: "0.0.15".to_string(),
        license: Some("Open BSV".to_string()),
        author: None,
        url: None,
        description: None,
        topics: Default::default(),
        requires: Vec::new(),
    }
}

/// A descriptor for `gigamonkey 0.0.15` targeting `os`.
pub fn descriptor_for(os: Os) -> PackageDescriptor {
    let version = ResolvedVersion {
        value: "0.0.15".to_string(),
        source: VersionSource::Fallback,
    };
    let settings = Settings::host().with_os(os).with_arch("x86_64");
    PackageDescriptor::new(&sample_metadata(), version, settings)
}

/// Effective values for boolean options with the given defaults.
pub fn option_values(pairs: &[(&str, bool)]) -> OptionValues {
    let decls: BTreeMap<String, OptionDecl> = pairs
        .iter()
        .map(|(name, default)| (name.to_string(), OptionDecl::boolean(*default)))
        .collect();
    BuildOptionSet::new(decls)
        .and_then(|set| set.resolve(&[]))
        .expect("boolean fixtures are always valid")
}

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Create a package source tree with a recipe, headers, and a build dir
/// holding compiled outputs.
pub fn create_source_tree(root: &Path) {
    write_file(root, MANIFEST_NAME, SAMPLE_RECIPE);
    write_file(root, "CMakeLists.txt", "cmake_minimum_required(VERSION 3.16)\n");
    write_file(root, "include/gigamonkey/script.hpp", "#pragma once\n");
    write_file(root, "include/gigamonkey/stratum/stratum.hpp", "#pragma once\n");
    write_file(root, "include/sv/util.h", "#pragma once\n");
    write_file(root, "include/README.md", "not a header\n");
    write_file(root, "src/gigamonkey/wallet.cpp", "int x;\n");
    write_file(root, "build/Release/libgigamonkey.a", "!<arch>\n");
    write_file(root, "build/Release/CMakeCache.txt", "cache\n");
    write_file(root, "build/Release/test/libtesthelpers.a", "!<arch>\n");
}
