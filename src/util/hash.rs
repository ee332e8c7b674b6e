//! SHA-256 digests over packaged files.

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Hex SHA-256 of a file's contents, streamed.
pub fn file_digest(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("failed to read {} for digest", path.display()))?;
    let mut sha = Sha256::new();
    io::copy(&mut file, &mut sha)
        .with_context(|| format!("failed to read {} for digest", path.display()))?;
    Ok(hex::encode(sha.finalize()))
}

/// Accumulates `(name, content digest)` pairs into one tree digest.
///
/// Entries are NUL-terminated so `("ab", x)` and `("a", "b" ++ x)` differ.
/// Callers feed entries in a stable order.
#[derive(Default, Clone)]
pub struct TreeDigest {
    sha: Sha256,
    entries: usize,
}

impl TreeDigest {
    pub fn new() -> Self {
        Self::default()
    }

    fn field(&mut self, bytes: &[u8]) {
        self.sha.update(bytes);
        self.sha.update([0u8]);
    }

    /// Record a file under `name`.
    pub fn add_file(&mut self, name: &str, path: &Path) -> Result<()> {
        let digest = file_digest(path)?;
        self.add(name, &digest);
        Ok(())
    }

    /// Record a precomputed digest under `name`.
    pub fn add(&mut self, name: &str, digest: &str) {
        self.field(name.as_bytes());
        self.field(digest.as_bytes());
        self.entries += 1;
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn hex(self) -> String {
        hex::encode(self.sha.finalize())
    }
}
