//! Path and directory helpers used by the builder and packager.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// `mkdir -p`.
pub fn make_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))
}

/// Delete `dir` and everything below it. A missing directory is not an error.
pub fn remove_tree(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other.with_context(|| format!("could not remove {}", dir.display())),
    }
}

/// Copy `src` to `dst`, creating `dst`'s parents first.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        make_dir(parent)?;
    }
    fs::copy(src, dst)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// The canonical form of `path`, or `path` itself when it cannot be resolved.
pub fn canonical_or_given(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_owned())
}

/// `path` expressed relative to `base`.
pub fn path_under(base: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(base) {
        Ok(rel) => rel.to_owned(),
        Err(_) => pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_owned()),
    }
}
