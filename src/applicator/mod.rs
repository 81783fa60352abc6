//! Orchestration: from a constraint file path to registered pins.
//!
//! [`ConstraintApplicator`] is the piece a host calls once per declared
//! constraint file. It validates the path, resolves the parsed file through
//! the process-wide cache, and subscribes to the host's scope collection so
//! every scope - present and future - receives its applicable pins.

use std::path::Path;
use std::sync::Arc;

use crate::cache::ConstraintFileCache;
use crate::core::{PinfileError, Result};
use crate::host::{ScopeCallback, ScopeCollection};

/// Applies the pins of declared constraint files to a host's scopes.
///
/// Holds a shared handle to the hosting process's
/// [`ConstraintFileCache`]; construct one applicator per configuration
/// surface and call [`apply`](Self::apply) for each constraint file the
/// build declares. Calling `apply` twice for the same file registers the
/// pins twice - deduplication across calls is the caller's decision, not the
/// engine's.
pub struct ConstraintApplicator {
    cache: Arc<ConstraintFileCache>,
}

impl ConstraintApplicator {
    /// Creates an applicator backed by the given cache.
    #[must_use]
    pub fn new(cache: Arc<ConstraintFileCache>) -> Self {
        Self {
            cache,
        }
    }

    /// Applies the constraints in the file at `path` to every scope in
    /// `scopes`, now and in the future.
    ///
    /// Registration is late-binding: the subscription fires for each scope
    /// already in the collection and for each scope added afterwards, so
    /// pins reach scopes the host declares well after configuration time.
    /// For each scope, every applicable coordinate is registered through the
    /// scope's constraint API and then forced where the returned handle
    /// supports it; a handle without the forcing capability downgrades the
    /// pin to an advisory constraint, logged at debug level. A scope with no
    /// applicable coordinates is left untouched.
    ///
    /// # Errors
    ///
    /// - [`PinfileError::ConstraintFileNotFound`] when `path` is missing or
    ///   unreadable; raised before anything is registered with the host.
    /// - [`PinfileError::Io`] when fingerprinting the file fails.
    /// - Read and parse errors from the (lazy) first scope application
    ///   propagate out of this call for scopes that already exist, and out
    ///   of the host's scope-addition path for scopes added later.
    pub fn apply(&self, path: &Path, scopes: &dyn ScopeCollection) -> Result<()> {
        // File::open doubles as the readability probe; is_file rejects
        // directories, which open alone would accept on some platforms.
        if !path.is_file() || std::fs::File::open(path).is_err() {
            return Err(PinfileError::ConstraintFileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = self.cache.get(path)?;

        let callback: ScopeCallback = Box::new(move |scope| {
            let coordinates = file.for_scope(scope.name())?;

            for coordinate in &coordinates {
                let mut handle = scope.register_constraint(coordinate);

                if handle.try_force() {
                    tracing::debug!("Forced constraint {coordinate} in {}", scope.name());
                } else {
                    tracing::debug!(
                        "Unable to force constraint {coordinate} in {} (not supported by host)",
                        scope.name()
                    );
                }

                tracing::debug!(
                    "Applied {} dependency constraint: {coordinate}",
                    scope.name()
                );
            }

            Ok(())
        });

        scopes.on_scope_added(callback)
    }
}
