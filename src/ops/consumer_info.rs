//! Consumer-facing link metadata for a packaged build.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::core::layout::ArtifactLayout;
use crate::core::manifest::{ConsumerConfig, LibsPolicy};

/// What a downstream package needs to compile and link against this one.
///
/// Derived from an [`ArtifactLayout`] and the recipe's consumer policy; it
/// holds no state of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumerInfo {
    pub include_dirs: Vec<PathBuf>,
    pub lib_dirs: Vec<PathBuf>,
    pub libs: Vec<String>,
}

static LIBRARY_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:lib)?(.+?)\.(?:a|lib|dylib|dll|so(?:\.\d+)*)$").unwrap()
});

/// Link name for a library file, or `None` if the file isn't a recognized
/// library artifact.
///
/// `libfoo.a` → `foo`, `libfoo.so.1.2` → `foo`, `foo.lib` → `foo`.
pub fn library_name(file_name: &str) -> Option<String> {
    LIBRARY_FILE
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Build consumer info for a packaged layout.
pub fn publish(config: &ConsumerConfig, layout: &ArtifactLayout) -> ConsumerInfo {
    let include_dirs = absolute_dirs(&layout.root, &config.includedirs);
    let lib_dirs = absolute_dirs(&layout.root, &config.libdirs);

    let libs = match &config.libs {
        LibsPolicy::Fixed(names) => names.clone(),
        LibsPolicy::Discover => discover_libs(layout, &config.libdirs),
    };

    ConsumerInfo {
        include_dirs,
        lib_dirs,
        libs,
    }
}

fn absolute_dirs(root: &Path, dirs: &[PathBuf]) -> Vec<PathBuf> {
    dirs.iter().map(|d| root.join(d)).collect()
}

/// Library names found directly in the declared lib dirs, ordered by file
/// name. A name produced by more than one file (`libz.a`, `libz.so`) is
/// listed once, at its first position.
fn discover_libs(layout: &ArtifactLayout, lib_dirs: &[PathBuf]) -> Vec<String> {
    let mut files: Vec<&Path> = layout
        .libraries
        .iter()
        .filter(|rel| {
            rel.parent()
                .map(|parent| lib_dirs.iter().any(|d| d == parent))
                .unwrap_or(false)
        })
        .map(PathBuf::as_path)
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut libs: Vec<String> = Vec::new();
    for file in files {
        let Some(name) = file
            .file_name()
            .and_then(|n| library_name(&n.to_string_lossy()))
        else {
            tracing::debug!("ignoring non-library file {}", file.display());
            continue;
        };
        if !libs.contains(&name) {
            libs.push(name);
        }
    }
    libs
}
