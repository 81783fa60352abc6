//! The engine-to-host boundary.
//!
//! The engine never owns resolution scopes - it consumes them through the
//! traits here. A hosting build system provides:
//!
//! - [`ResolutionScope`]: a named resolution bucket exposing a registration
//!   API for dependency constraints
//! - [`ConstraintHandle`]: the handle returned per registration, carrying the
//!   optional "force this pin over transitive requests" capability
//! - [`ScopeCollection`]: an open-ended scope collection with
//!   replay-plus-subscribe semantics
//!
//! [`ScopeHub`] is an in-crate [`ScopeCollection`] hosts can embed instead of
//! implementing the subscription bookkeeping themselves.

use std::sync::{Mutex, PoisonError};

use crate::core::Result;

/// Callback invoked once per scope, for scopes present at subscription time
/// and for every scope added later.
///
/// Callbacks are fallible because the engine parses constraint files lazily:
/// a read or parse failure can surface while a scope is being wired up. The
/// scope collection must hand the error back to whoever added the scope -
/// a missing pin must fail that configuration step, not vanish into a log.
pub type ScopeCallback = Box<dyn Fn(&dyn ResolutionScope) -> Result<()> + Send + Sync>;

/// A named dependency-resolution scope owned by the host.
///
/// The engine reads the name to select applicable pins and pushes each pin
/// through [`register_constraint`](Self::register_constraint). It never
/// constructs, stores, or otherwise manages scopes.
pub trait ResolutionScope {
    /// The scope's name, matched case-sensitively against constraint scope
    /// lists.
    fn name(&self) -> &str;

    /// Registers a version constraint for `coordinate` in this scope and
    /// returns the handle for follow-up configuration.
    fn register_constraint(&self, coordinate: &str) -> Box<dyn ConstraintHandle>;
}

/// Handle to one registered constraint.
pub trait ConstraintHandle {
    /// Best-effort: mark the constraint as forced, so this pin wins over any
    /// transitively requested version rather than merely participating in
    /// version arbitration.
    ///
    /// Returns `false` when the host's constraint mechanism does not support
    /// forcing. That is a capability answer, not a failure - implementations
    /// must not panic or abort registration.
    fn try_force(&mut self) -> bool;
}

/// An open-ended, append-only collection of resolution scopes.
///
/// The one operation the engine needs is "replay + subscribe": the callback
/// fires once for every scope that already exists and once for every scope
/// added afterwards. Subscribe-only semantics would silently skip pins for
/// scopes declared before the constraints were requested; replay-only would
/// skip scopes declared after. Hosts with their own native equivalent (a
/// `configurations.all`-style hook) implement this trait over it; others can
/// embed [`ScopeHub`].
pub trait ScopeCollection {
    /// Registers `callback`, invoking it for all current scopes before
    /// returning.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `callback` during replay.
    fn on_scope_added(&self, callback: ScopeCallback) -> Result<()>;
}

struct HubState<S> {
    scopes: Vec<S>,
    callbacks: Vec<ScopeCallback>,
}

/// A replay-plus-subscribe [`ScopeCollection`] backed by internal lists.
///
/// Known scopes and pending callbacks are kept under one lock, and every
/// notification happens while it is held, so a scope added concurrently with
/// a subscription is seen exactly once - neither missed nor duplicated.
///
/// Callbacks must not call back into the hub (adding a scope or subscribing
/// from inside a callback deadlocks).
///
/// # Examples
///
/// ```rust
/// use pinfile::host::{ScopeCollection, ScopeHub};
/// # use pinfile::host::{ConstraintHandle, ResolutionScope};
/// # struct NamedScope(&'static str);
/// # struct NoopHandle;
/// # impl ConstraintHandle for NoopHandle { fn try_force(&mut self) -> bool { false } }
/// # impl ResolutionScope for NamedScope {
/// #     fn name(&self) -> &str { self.0 }
/// #     fn register_constraint(&self, _: &str) -> Box<dyn ConstraintHandle> { Box::new(NoopHandle) }
/// # }
///
/// # fn example() -> Result<(), pinfile::core::PinfileError> {
/// let hub = ScopeHub::new();
/// hub.add_scope(NamedScope("compile"))?;
///
/// // Replays "compile" immediately, then fires again for "test" below.
/// hub.on_scope_added(Box::new(|scope| {
///     println!("scope seen: {}", scope.name());
///     Ok(())
/// }))?;
///
/// hub.add_scope(NamedScope("test"))?;
/// # Ok(())
/// # }
/// ```
pub struct ScopeHub<S> {
    state: Mutex<HubState<S>>,
}

impl<S: ResolutionScope> ScopeHub<S> {
    /// Creates a hub with no scopes and no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HubState {
                scopes: Vec::new(),
                callbacks: Vec::new(),
            }),
        }
    }

    /// Adds a scope and notifies every subscribed callback.
    ///
    /// # Errors
    ///
    /// Returns the first error any callback raises for the new scope. The
    /// scope stays in the collection either way; the error belongs to the
    /// configuration step that added the scope.
    pub fn add_scope(&self, scope: S) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let HubState {
            scopes,
            callbacks,
        } = &mut *state;

        scopes.push(scope);

        let mut outcome = Ok(());
        if let Some(scope) = scopes.last() {
            for callback in callbacks.iter() {
                let result = callback(scope);
                if outcome.is_ok() {
                    outcome = result;
                }
            }
        }

        outcome
    }

    /// Number of scopes added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).scopes.len()
    }

    /// Whether no scope has been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: ResolutionScope> Default for ScopeHub<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ResolutionScope> ScopeCollection for ScopeHub<S> {
    fn on_scope_added(&self, callback: ScopeCallback) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        for scope in &state.scopes {
            callback(scope)?;
        }

        state.callbacks.push(callback);

        Ok(())
    }
}
