//! Error handling for the constraint engine.
//!
//! The engine reports failures through a single strongly-typed enum,
//! [`PinfileError`]. Variants carry the context a host needs to surface an
//! actionable message: the path of the file that could not be used, the exact
//! line that could not be parsed, or the credential set that could not be
//! resolved.
//!
//! # Error Categories
//!
//! - **Configuration**: [`PinfileError::ConstraintFileNotFound`] - the named
//!   constraint file is missing or unreadable at apply time. Raised
//!   immediately, before anything is registered with the host.
//! - **I/O**: [`PinfileError::Io`] - the file (or its metadata) could not be
//!   read after the initial validation. These failures are never cached as
//!   empty results; a later retry against a readable file succeeds.
//! - **Parsing**: [`PinfileError::MalformedLine`] - a non-blank, non-comment
//!   line yields no coordinate. The whole file's parse fails rather than
//!   silently dropping the line, so a constraint omission is never silent.
//! - **Credentials**: [`PinfileError::CredentialsUnavailable`] - no source in
//!   a credential set produced a complete credential pair.
//!
//! The absence of a host forcing capability is deliberately *not* an error;
//! see [`crate::host::ConstraintHandle::try_force`].

use std::path::Path;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = PinfileError> = std::result::Result<T, E>;

/// The error type for all constraint-engine operations.
#[derive(Error, Debug)]
pub enum PinfileError {
    /// The constraint file named in an apply call does not exist or is not
    /// readable.
    ///
    /// This is a configuration defect in the requesting build, surfaced
    /// immediately so that configuration does not proceed silently without
    /// the requested pins.
    #[error("Constraint file at {path} does not exist or is not readable")]
    ConstraintFileNotFound {
        /// The path that failed validation
        path: String,
    },

    /// Reading the constraint file's content or metadata failed.
    ///
    /// Covers files that became unreadable between the apply-time validation
    /// and the (lazy) content read, and metadata reads performed while
    /// fingerprinting the file for the cache.
    #[error("Error reading constraint file {path}")]
    Io {
        /// The file that could not be read
        path: String,
        /// The underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A constraint line could not provide a coordinate.
    ///
    /// Blank lines and comments are skipped, so this is raised only for a
    /// line whose coordinate field trims to nothing (for example
    /// `",compile"`). The whole file's parse attempt fails with this error.
    #[error("Invalid constraint line '{line}': no coordinate before the first comma")]
    MalformedLine {
        /// The offending line, as read from the file
        line: String,
    },

    /// No configured source produced a complete credential pair.
    #[error("Could not load '{name}' credentials - no sources provided a complete credential set")]
    CredentialsUnavailable {
        /// Name of the credential set that failed to resolve
        name: String,
    },
}

impl PinfileError {
    /// Builds an [`PinfileError::Io`] from a path and an I/O failure.
    ///
    /// Most read paths in the crate go through this helper so the error
    /// always names the file involved.
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
