//! Constraint records and line parsing.
//!
//! A constraint file pins dependency versions one line at a time:
//!
//! ```text
//! <coordinate>[,<scope>[,<scope>...]]
//! ```
//!
//! The coordinate is an opaque identifier (typically `group:artifact:version`)
//! that the engine never inspects beyond non-emptiness. The optional scope
//! list limits the pin to specific resolution scopes; a line without one
//! applies everywhere.
//!
//! Parsing is a pure function from one line of text to zero or one
//! [`Constraint`]: blank lines and `#`-comments produce nothing, everything
//! else must at least yield a coordinate. See [`Constraint::parse_line`].
//!
//! The per-file aggregation of records, with its lazy memoized parse, lives
//! in [`ConstraintFile`].

use std::collections::HashSet;

use crate::core::{PinfileError, Result};

mod file;

pub use file::ConstraintFile;

/// A single parsed version pin.
///
/// Created once when its line is parsed and immutable afterwards. Two
/// records with identical coordinate and scopes may coexist; the set-valued
/// query on [`ConstraintFile`] collapses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Opaque dependency identifier, e.g. `org.example:core:1.4.2`.
    coordinate: String,

    /// Scopes this pin is limited to. Empty means the pin applies to every
    /// scope - this is the only spelling of "all scopes" in the crate.
    scopes: HashSet<String>,
}

impl Constraint {
    /// Parses one line of a constraint file.
    ///
    /// Returns `Ok(None)` for lines that carry no constraint: blank lines and
    /// lines whose first non-whitespace character is `#`. Every other line is
    /// split on `,`; the first field (trimmed) is the coordinate and the
    /// remaining fields (each trimmed) are scope names. Empty scope tokens
    /// (as in `coord,,compile`) are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PinfileError::MalformedLine`] when the coordinate field
    /// trims to nothing, e.g. `",compile"`. Callers treat this as fatal for
    /// the whole file so that a pin is never silently omitted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pinfile::constraint::Constraint;
    ///
    /// let pin = Constraint::parse_line("org.example:core:1.4.2, compile")?
    ///     .expect("line carries a constraint");
    /// assert_eq!(pin.coordinate(), "org.example:core:1.4.2");
    /// assert!(pin.applies_to("compile"));
    /// assert!(!pin.applies_to("test"));
    ///
    /// assert!(Constraint::parse_line("  # pinned for CVE-2024-1234")?.is_none());
    /// assert!(Constraint::parse_line("")?.is_none());
    /// # Ok::<(), pinfile::core::PinfileError>(())
    /// ```
    pub fn parse_line(line: &str) -> Result<Option<Self>> {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let mut fields = trimmed.split(',');

        // split always yields at least one field; the reachable failure is a
        // coordinate that trims to nothing.
        let coordinate = fields.next().unwrap_or_default().trim();
        if coordinate.is_empty() {
            return Err(PinfileError::MalformedLine {
                line: line.to_string(),
            });
        }

        let scopes = fields
            .map(str::trim)
            .filter(|scope| !scope.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Some(Self {
            coordinate: coordinate.to_string(),
            scopes,
        }))
    }

    /// The pinned coordinate, exactly as written (minus surrounding
    /// whitespace).
    #[must_use]
    pub fn coordinate(&self) -> &str {
        &self.coordinate
    }

    /// The scopes this pin is limited to. Empty means all scopes.
    #[must_use]
    pub fn scopes(&self) -> &HashSet<String> {
        &self.scopes
    }

    /// Whether this pin applies to the named scope.
    ///
    /// True when the pin's scope list is empty (wildcard) or contains the
    /// name exactly. Matching is case-sensitive.
    #[must_use]
    pub fn applies_to(&self, scope: &str) -> bool {
        self.scopes.is_empty() || self.scopes.contains(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate_only_is_wildcard() {
        let pin = Constraint::parse_line("group:artifact:1.0").unwrap().unwrap();

        assert_eq!(pin.coordinate(), "group:artifact:1.0");
        assert!(pin.scopes().is_empty());
        assert!(pin.applies_to("compile"));
        assert!(pin.applies_to("anything-at-all"));
    }

    #[test]
    fn test_parse_scoped_line() {
        let pin = Constraint::parse_line("group:artifact:1.0,compile,test").unwrap().unwrap();

        assert_eq!(pin.coordinate(), "group:artifact:1.0");
        assert!(pin.applies_to("compile"));
        assert!(pin.applies_to("test"));
        assert!(!pin.applies_to("runtime"));
    }

    #[test]
    fn test_parse_trims_every_field() {
        let pin = Constraint::parse_line("  group:artifact:1.0 , compile ,  test ")
            .unwrap()
            .unwrap();

        assert_eq!(pin.coordinate(), "group:artifact:1.0");
        assert!(pin.applies_to("compile"));
        assert!(pin.applies_to("test"));
        // No whitespace survives in any field.
        assert!(!pin.scopes().contains(" compile"));
    }

    #[test]
    fn test_scope_matching_is_case_sensitive() {
        let pin = Constraint::parse_line("g:a:1.0,Compile").unwrap().unwrap();

        assert!(pin.applies_to("Compile"));
        assert!(!pin.applies_to("compile"));
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        assert!(Constraint::parse_line("").unwrap().is_none());
        assert!(Constraint::parse_line("   \t  ").unwrap().is_none());
        assert!(Constraint::parse_line("# a comment").unwrap().is_none());
        assert!(Constraint::parse_line("   # indented comment").unwrap().is_none());
    }

    #[test]
    fn test_missing_coordinate_is_an_error() {
        let result = Constraint::parse_line(",compile");
        assert!(matches!(result, Err(PinfileError::MalformedLine { .. })));

        let result = Constraint::parse_line("   ,a,b");
        assert!(matches!(result, Err(PinfileError::MalformedLine { .. })));
    }

    #[test]
    fn test_malformed_line_error_names_the_line() {
        let err = Constraint::parse_line(",compile").unwrap_err();
        assert!(err.to_string().contains(",compile"));
    }

    #[test]
    fn test_empty_scope_tokens_are_dropped() {
        let pin = Constraint::parse_line("g:a:1.0,,compile,").unwrap().unwrap();

        assert_eq!(pin.scopes().len(), 1);
        assert!(pin.applies_to("compile"));
        // Dropping empty tokens must not turn the pin into a wildcard.
        assert!(!pin.applies_to("runtime"));
    }

    #[test]
    fn test_duplicate_records_are_permitted_and_equal() {
        let first = Constraint::parse_line("g:a:1.0,compile").unwrap().unwrap();
        let second = Constraint::parse_line("g:a:1.0,compile").unwrap().unwrap();

        assert_eq!(first, second);
    }
}
