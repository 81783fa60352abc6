//! File-identity fingerprints for cache keying.
//!
//! A fingerprint is a value derived from a file's metadata or content that
//! changes whenever the content changes under normal editing and checkout
//! operations. Cache entries are keyed on `(path, fingerprint)`, so a change
//! fingerprints differently, misses the cache, and triggers a fresh parse -
//! the defense against a long-lived host process serving stale pins.

use std::fmt;
use std::path::Path;
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};

use crate::core::{PinfileError, Result};

/// How [`Fingerprint::of`] derives a file's fingerprint.
///
/// [`Metadata`](Self::Metadata) is the default: one `stat` call, no content
/// read. [`ContentHash`](Self::ContentHash) reads and hashes the whole file,
/// which costs a full read per cache lookup but survives tools that rewrite
/// files without advancing the modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FingerprintStrategy {
    /// Last-modified time plus file length, from file metadata.
    #[default]
    Metadata,

    /// SHA-256 digest of the file content.
    ContentHash,
}

/// An opaque file-identity fingerprint.
///
/// Two fingerprints compare equal exactly when the strategy derived the same
/// value; fingerprints from different strategies never compare equal. The
/// rendered form (`Display`) appears in diagnostics only - it is not parsed
/// back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprints the file at `path` using the given strategy.
    ///
    /// # Errors
    ///
    /// Returns [`PinfileError::Io`] when the metadata (or, for
    /// [`FingerprintStrategy::ContentHash`], the content) cannot be read.
    pub fn of(path: &Path, strategy: FingerprintStrategy) -> Result<Self> {
        match strategy {
            FingerprintStrategy::Metadata => Self::from_metadata(path),
            FingerprintStrategy::ContentHash => Self::from_content(path),
        }
    }

    fn from_metadata(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|source| PinfileError::io(path, source))?;

        // Filesystems without mtime support report UNIX_EPOCH here; the
        // length component still catches most edits on such systems.
        let modified = metadata
            .modified()
            .unwrap_or(UNIX_EPOCH)
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        Ok(Self(format!(
            "mtime:{}.{:09}:len:{}",
            modified.as_secs(),
            modified.subsec_nanos(),
            metadata.len()
        )))
    }

    fn from_content(path: &Path) -> Result<Self> {
        let content = std::fs::read(path).map_err(|source| PinfileError::io(path, source))?;

        let mut hasher = Sha256::new();
        hasher.update(&content);
        let digest = hasher.finalize();

        Ok(Self(format!("sha256:{}", hex::encode(digest))))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_metadata_fingerprint_changes_with_length() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("constraints.txt");

        fs::write(&path, "g:a:1.0\n").unwrap();
        let before = Fingerprint::of(&path, FingerprintStrategy::Metadata).unwrap();

        fs::write(&path, "g:a:1.0\ng:b:2.0\n").unwrap();
        let after = Fingerprint::of(&path, FingerprintStrategy::Metadata).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn test_content_fingerprint_ignores_metadata_and_tracks_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("constraints.txt");

        // Same length, different content.
        fs::write(&path, "g:a:1.0\n").unwrap();
        let before = Fingerprint::of(&path, FingerprintStrategy::ContentHash).unwrap();

        fs::write(&path, "g:a:2.0\n").unwrap();
        let after = Fingerprint::of(&path, FingerprintStrategy::ContentHash).unwrap();

        assert_ne!(before, after);

        // Rewriting identical bytes fingerprints identically.
        fs::write(&path, "g:a:2.0\n").unwrap();
        let again = Fingerprint::of(&path, FingerprintStrategy::ContentHash).unwrap();
        assert_eq!(after, again);
    }

    #[test]
    fn test_strategies_never_collide() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("constraints.txt");
        fs::write(&path, "g:a:1.0\n").unwrap();

        let metadata = Fingerprint::of(&path, FingerprintStrategy::Metadata).unwrap();
        let content = Fingerprint::of(&path, FingerprintStrategy::ContentHash).unwrap();

        assert_ne!(metadata, content);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.txt");

        let err = Fingerprint::of(&path, FingerprintStrategy::Metadata).unwrap_err();
        assert!(matches!(err, PinfileError::Io { .. }));

        let err = Fingerprint::of(&path, FingerprintStrategy::ContentHash).unwrap_err();
        assert!(matches!(err, PinfileError::Io { .. }));
    }
}
