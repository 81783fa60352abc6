//! Per-file ownership of parsed constraint records.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::constraint::Constraint;
use crate::core::{PinfileError, Result};

/// The parsed view of one constraint file.
///
/// Owns the records parsed from a single source file and answers the one
/// query the engine needs: which coordinates are pinned for a given scope.
///
/// # Laziness and Memoization
///
/// The file is read and parsed on the first [`for_scope`](Self::for_scope)
/// call, whatever the scope, and never again for the lifetime of the
/// instance. Concurrent first calls are serialized by an internal mutex, so
/// exactly one caller performs the parse and the rest observe the memoized
/// records. A failed read or parse is *not* memoized - the records stay
/// unset and a later call retries, so a transient I/O failure cannot freeze
/// the file into a false "empty" state.
///
/// Instances are normally created and shared (as `Arc<ConstraintFile>`) by
/// [`ConstraintFileCache`](crate::cache::ConstraintFileCache), which is what
/// ties the memoization to a `(path, fingerprint)` identity. Constructing one
/// directly is useful in tests and for hosts that manage their own caching.
#[derive(Debug)]
pub struct ConstraintFile {
    path: PathBuf,

    /// Records in file line order, populated at most once.
    records: Mutex<Option<Vec<Constraint>>>,
}

impl ConstraintFile {
    /// Creates an unparsed view of the constraint file at `path`.
    ///
    /// No I/O happens here; the file does not need to exist until the first
    /// [`for_scope`](Self::for_scope) call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Mutex::new(None),
        }
    }

    /// The path this view reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the coordinates pinned for `scope`.
    ///
    /// A record contributes its coordinate when its scope list is empty
    /// (wildcard) or contains `scope` exactly. The result is a set: records
    /// are applied in file line order internally, but duplicate coordinates
    /// collapse and no ordering is guaranteed to the caller.
    ///
    /// # Errors
    ///
    /// - [`PinfileError::Io`] when the file cannot be read. The failure is
    ///   not cached; a retry against a readable file succeeds.
    /// - [`PinfileError::MalformedLine`] when any line fails to yield a
    ///   coordinate. The whole parse attempt fails so no partial pin set is
    ///   ever served.
    pub fn for_scope(&self, scope: &str) -> Result<HashSet<String>> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);

        if records.is_none() {
            *records = Some(self.parse()?);
        }

        // Populated above on the miss path; Some in every branch here.
        let loaded = records.as_deref().unwrap_or_default();

        Ok(loaded
            .iter()
            .filter(|record| record.applies_to(scope))
            .map(|record| record.coordinate().to_string())
            .collect())
    }

    /// Reads and parses the whole file. Called under the records lock.
    fn parse(&self) -> Result<Vec<Constraint>> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|source| PinfileError::io(&self.path, source))?;

        let records = content
            .lines()
            .map(Constraint::parse_line)
            .filter_map(Result::transpose)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Parsed {} constraint record(s) from {}",
            records.len(),
            self.path.display()
        );

        Ok(records)
    }
}
