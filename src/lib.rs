//! Pinfile - dependency version-constraint engine
//!
//! A small engine for applying externally authored version pins to the
//! dependency-resolution scopes of a hosting build system. Pin declarations
//! live in line-oriented constraint files, are parsed once per file identity,
//! and are pushed into every resolution scope the host declares - including
//! scopes declared *after* the constraints were first requested.
//!
//! # Architecture Overview
//!
//! Pinfile follows a parse/cache/apply model where:
//! - Constraint files declare one pinned coordinate per line, optionally
//!   limited to named scopes
//! - A process-wide cache keys parsed files by `(path, fingerprint)` so a
//!   long-lived host process never serves stale pins after the file changes
//! - An applicator subscribes to the host's scope collection with
//!   replay-plus-subscribe semantics, so present and future scopes receive
//!   the same treatment
//!
//! ## Key Properties
//!
//! - **Late binding**: scopes declared after [`apply`](applicator::ConstraintApplicator::apply)
//!   still receive their applicable pins
//! - **Stale-cache safety**: a content change produces a new fingerprint, a
//!   cache miss, and a fresh parse - never a silently reused old parse
//! - **At-most-one parse**: per cache entry, concurrent callers share a
//!   single memoized parse
//! - **Graceful forcing**: pins are marked "forced" where the host supports
//!   it; hosts without that capability still get advisory constraints
//!
//! # Core Modules
//!
//! - [`constraint`] - constraint records, line parsing, and the per-file
//!   [`ConstraintFile`](constraint::ConstraintFile) view
//! - [`cache`] - process-wide [`ConstraintFileCache`](cache::ConstraintFileCache)
//!   and file-identity fingerprinting
//! - [`applicator`] - orchestration: validate, resolve through the cache,
//!   register with the host
//! - [`host`] - the engine-to-host boundary traits plus [`ScopeHub`](host::ScopeHub),
//!   a reusable replay-plus-subscribe scope collection
//! - [`core`] - error types shared by the crate
//! - [`credentials`] - chained first-match-wins credential lookup for build
//!   hosts that need repository credentials alongside their pins
//!
//! # Constraint File Format
//!
//! ```text
//! # Comments start with '#'; blank lines are skipped.
//!
//! org.example:core:1.4.2
//! org.example:web:2.0.0,compile
//! org.example:testkit:2.0.0,test,integrationTest
//! ```
//!
//! A line with no scope list applies to every scope. Whitespace around the
//! coordinate and each scope name is ignored. There is no escaping mechanism
//! for commas inside a field.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use pinfile::applicator::ConstraintApplicator;
//! use pinfile::cache::ConstraintFileCache;
//! use pinfile::host::ScopeHub;
//! # use pinfile::host::{ConstraintHandle, ResolutionScope};
//! # struct MyScope;
//! # impl ResolutionScope for MyScope {
//! #     fn name(&self) -> &str { "compile" }
//! #     fn register_constraint(&self, _: &str) -> Box<dyn ConstraintHandle> { unimplemented!() }
//! # }
//!
//! # fn example() -> Result<(), pinfile::core::PinfileError> {
//! // One cache per host process, passed to every applicator.
//! let cache = Arc::new(ConstraintFileCache::new());
//! let applicator = ConstraintApplicator::new(cache);
//!
//! let scopes = ScopeHub::new();
//! applicator.apply(Path::new("dependencies.properties"), &scopes)?;
//!
//! // Scopes added from here on still receive their pins.
//! scopes.add_scope(MyScope)?;
//! # Ok(())
//! # }
//! ```

pub mod applicator;
pub mod cache;
pub mod constraint;
pub mod core;
pub mod credentials;
pub mod host;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
