//! Process-wide constraint file cache keyed by file identity.
//!
//! # Why the fingerprint matters
//!
//! Build hosts commonly keep one process alive across logically distinct
//! invocations - a daemon reusing class-loader or process state keeps any
//! "static" cache alive with it. If entries were keyed by path alone, a
//! constraint file edited or checked out at a different revision between
//! invocations would keep serving its *old* parse, silently pinning the
//! wrong versions. Keying on `(path, fingerprint)` turns a content change
//! into a cache miss and a correct re-parse.
//!
//! The cost is that a superseded entry stays in the map until the process
//! exits. That leak is bounded by the number of distinct file states seen in
//! one process lifetime - in practice a handful - so no eviction policy
//! exists: entries are superseded, never removed.
//!
//! # Sharing model
//!
//! [`ConstraintFileCache`] is an explicitly constructed object with
//! process-wide *lifetime* but no global *identity*: the hosting application
//! owns one instance and hands it (usually as an `Arc`) to every
//! [`ConstraintApplicator`](crate::applicator::ConstraintApplicator). Tests
//! construct a fresh cache each and never contend.
//!
//! Lookups use [`DashMap`]'s atomic entry API, so two simultaneous callers
//! for the same identity get the same [`ConstraintFile`](crate::constraint::ConstraintFile)
//! instance and its at-most-one-parse guarantee holds process-wide.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;

use crate::constraint::ConstraintFile;
use crate::core::Result;

mod fingerprint;

pub use fingerprint::{Fingerprint, FingerprintStrategy};

/// Registry of parsed constraint files, keyed by `(path, fingerprint)`.
///
/// See the [module documentation](self) for the staleness and sharing model.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use std::sync::Arc;
///
/// use pinfile::cache::ConstraintFileCache;
///
/// # fn example() -> Result<(), pinfile::core::PinfileError> {
/// let cache = Arc::new(ConstraintFileCache::new());
///
/// let file = cache.get(Path::new("dependencies.properties"))?;
/// let pinned = file.for_scope("compile")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConstraintFileCache {
    strategy: FingerprintStrategy,
    entries: DashMap<(PathBuf, Fingerprint), Arc<ConstraintFile>>,
}

impl ConstraintFileCache {
    /// Creates an empty cache using the default
    /// [`FingerprintStrategy::Metadata`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_strategy(FingerprintStrategy::default())
    }

    /// Creates an empty cache with an explicit fingerprint strategy.
    ///
    /// [`FingerprintStrategy::ContentHash`] trades a full file read per
    /// lookup for immunity to mtime-preserving rewrites.
    #[must_use]
    pub fn with_strategy(strategy: FingerprintStrategy) -> Self {
        Self {
            strategy,
            entries: DashMap::new(),
        }
    }

    /// Returns the constraint file for `path` at its *current* fingerprint,
    /// constructing it on first sight of this identity.
    ///
    /// Repeated calls while the file is unchanged return the same shared
    /// instance. Once the file changes, the next call observes a new
    /// fingerprint and constructs (and later parses) a fresh instance; the
    /// superseded entry is left behind.
    ///
    /// Construction is atomic per identity: concurrent callers cannot race
    /// two instances into the same key.
    ///
    /// # Errors
    ///
    /// Returns [`PinfileError::Io`](crate::core::PinfileError::Io) when the
    /// file cannot be fingerprinted (missing file, unreadable metadata or
    /// content). Nothing is inserted in that case.
    pub fn get(&self, path: &Path) -> Result<Arc<ConstraintFile>> {
        let fingerprint = Fingerprint::of(path, self.strategy)?;

        let entry = self
            .entries
            .entry((path.to_path_buf(), fingerprint.clone()))
            .or_insert_with(|| {
                tracing::info!(
                    "Loaded dependency constraints file {} ({fingerprint})",
                    path.display()
                );

                Arc::new(ConstraintFile::new(path))
            });

        Ok(Arc::clone(entry.value()))
    }

    /// Number of entries, superseded ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache has seen no file identity yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ConstraintFileCache {
    fn default() -> Self {
        Self::new()
    }
}
