//! The packaged output tree.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use walkdir::WalkDir;

use crate::util::fs::path_under;
use crate::util::hash::TreeDigest;

/// Headers and compiled libraries under a package directory.
///
/// Paths are relative to `root` and sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactLayout {
    pub root: PathBuf,
    pub headers: Vec<PathBuf>,
    pub libraries: Vec<PathBuf>,
}

impl ArtifactLayout {
    /// Read an existing package directory.
    ///
    /// Headers are every file below the include directories; libraries are
    /// the files directly inside the library directories. Missing directories
    /// contribute nothing.
    pub fn scan(root: &Path, include_dirs: &[PathBuf], lib_dirs: &[PathBuf]) -> Result<Self> {
        let mut headers = Vec::new();
        for dir in include_dirs {
            let dir = root.join(dir);
            if !dir.is_dir() {
                continue;
            }
            for entry in WalkDir::new(&dir).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() {
                    headers.push(path_under(root, entry.path()));
                }
            }
        }

        let mut libraries = Vec::new();
        for dir in lib_dirs {
            let dir = root.join(dir);
            if !dir.is_dir() {
                continue;
            }
            for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() {
                    libraries.push(path_under(root, entry.path()));
                }
            }
        }

        headers.sort();
        libraries.sort();

        Ok(ArtifactLayout {
            root: root.to_path_buf(),
            headers,
            libraries,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.libraries.is_empty()
    }

    /// Content fingerprint over every file's relative path and bytes.
    /// Equal fingerprints mean byte-identical trees.
    pub fn fingerprint(&self) -> Result<String> {
        let mut tree = TreeDigest::new();
        for rel in self.headers.iter().chain(&self.libraries) {
            tree.add_file(&rel.to_string_lossy(), &self.root.join(rel))?;
        }
        Ok(tree.hex())
    }
}
