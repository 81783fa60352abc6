//! End-to-end application of constraint files to live and future scopes.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use pinfile::applicator::ConstraintApplicator;
use pinfile::cache::ConstraintFileCache;
use pinfile::core::PinfileError;
use pinfile::host::ScopeHub;
use pinfile::test_utils::RecordingScope;

mod common;

fn write_constraints(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("dependencies.properties");
    fs::write(&path, content).unwrap();
    path
}

fn applicator() -> ConstraintApplicator {
    ConstraintApplicator::new(Arc::new(ConstraintFileCache::new()))
}

/// The worked scenario: wildcard, single-scope, and multi-scope lines mixed
/// with a comment and a blank line.
#[test]
fn test_scope_filtering_across_a_mixed_file() -> Result<()> {
    common::init_tracing();
    let dir = TempDir::new()?;
    let path = write_constraints(&dir, "g:a:1.0\ng:b:2.0,compile\n# note\n\ng:c:3.0,test,compile\n");

    let scopes = ScopeHub::new();
    let compile = RecordingScope::new("compile");
    let compile_log = compile.recorder();
    let test = RecordingScope::new("test");
    let test_log = test.recorder();
    let runtime = RecordingScope::new("runtime");
    let runtime_log = runtime.recorder();

    scopes.add_scope(compile)?;
    scopes.add_scope(test)?;
    scopes.add_scope(runtime)?;

    applicator().apply(&path, &scopes)?;

    let mut compile_pins = compile_log.registered();
    compile_pins.sort();
    assert_eq!(compile_pins, vec!["g:a:1.0", "g:b:2.0", "g:c:3.0"]);

    let mut test_pins = test_log.registered();
    test_pins.sort();
    assert_eq!(test_pins, vec!["g:a:1.0", "g:c:3.0"]);

    assert_eq!(runtime_log.registered(), vec!["g:a:1.0"]);

    Ok(())
}

/// Scopes declared after apply still receive their pins.
#[test]
fn test_scopes_added_after_apply_receive_pins() -> Result<()> {
    common::init_tracing();
    let dir = TempDir::new()?;
    let path = write_constraints(&dir, "g:a:1.0\ng:b:2.0,integrationTest\n");

    let scopes: ScopeHub<RecordingScope> = ScopeHub::new();

    // No scopes exist yet.
    applicator().apply(&path, &scopes)?;

    let late = RecordingScope::new("integrationTest");
    let late_log = late.recorder();
    scopes.add_scope(late)?;

    let mut pins = late_log.registered();
    pins.sort();
    assert_eq!(pins, vec!["g:a:1.0", "g:b:2.0"]);

    Ok(())
}

/// A host without the forcing capability gets advisory constraints and no
/// error.
#[test]
fn test_forcing_degrades_gracefully() -> Result<()> {
    common::init_tracing();
    let dir = TempDir::new()?;
    let path = write_constraints(&dir, "g:a:1.0\n");

    let scopes = ScopeHub::new();
    let forcing = RecordingScope::new("compile");
    let forcing_log = forcing.recorder();
    let advisory = RecordingScope::without_forcing("test");
    let advisory_log = advisory.recorder();

    scopes.add_scope(forcing)?;
    scopes.add_scope(advisory)?;

    applicator().apply(&path, &scopes)?;

    assert_eq!(forcing_log.registered(), vec!["g:a:1.0"]);
    assert_eq!(forcing_log.forced(), vec!["g:a:1.0"]);

    assert_eq!(advisory_log.registered(), vec!["g:a:1.0"]);
    assert!(advisory_log.forced().is_empty());

    Ok(())
}

/// A scope no record applies to sees no registrations at all.
#[test]
fn test_unmatched_scope_has_zero_side_effects() -> Result<()> {
    common::init_tracing();
    let dir = TempDir::new()?;
    let path = write_constraints(&dir, "g:a:1.0,compile\n");

    let scopes = ScopeHub::new();
    let other = RecordingScope::new("docs");
    let other_log = other.recorder();
    scopes.add_scope(other)?;

    applicator().apply(&path, &scopes)?;

    assert!(other_log.registered().is_empty());
    assert!(other_log.forced().is_empty());

    Ok(())
}

/// The engine does not deduplicate across apply calls; that is the caller's
/// decision.
#[test]
fn test_apply_twice_registers_twice() -> Result<()> {
    common::init_tracing();
    let dir = TempDir::new()?;
    let path = write_constraints(&dir, "g:a:1.0\n");

    let scopes = ScopeHub::new();
    let scope = RecordingScope::new("compile");
    let log = scope.recorder();
    scopes.add_scope(scope)?;

    let cache = Arc::new(ConstraintFileCache::new());
    let applicator = ConstraintApplicator::new(cache);
    applicator.apply(&path, &scopes)?;
    applicator.apply(&path, &scopes)?;

    assert_eq!(log.registered(), vec!["g:a:1.0", "g:a:1.0"]);

    Ok(())
}

/// A file that disappears between apply-time validation and the lazy read
/// fails the configuration step that adds the scope, not silently.
#[test]
fn test_late_read_failure_surfaces_through_scope_addition() -> Result<()> {
    common::init_tracing();
    let dir = TempDir::new()?;
    let path = write_constraints(&dir, "g:a:1.0\n");

    let scopes: ScopeHub<RecordingScope> = ScopeHub::new();
    applicator().apply(&path, &scopes)?;

    fs::remove_file(&path)?;

    let result = scopes.add_scope(RecordingScope::new("compile"));
    assert!(matches!(result, Err(PinfileError::Io { .. })));

    Ok(())
}

/// Duplicate pin lines collapse before registration.
#[test]
fn test_duplicate_lines_register_once_per_apply() -> Result<()> {
    common::init_tracing();
    let dir = TempDir::new()?;
    let path = write_constraints(&dir, "g:a:1.0\ng:a:1.0\ng:a:1.0,compile\n");

    let scopes = ScopeHub::new();
    let scope = RecordingScope::new("compile");
    let log = scope.recorder();
    scopes.add_scope(scope)?;

    applicator().apply(&path, &scopes)?;

    assert_eq!(log.registered(), vec!["g:a:1.0"]);

    Ok(())
}
