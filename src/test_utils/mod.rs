//! Test doubles for the engine-to-host boundary.
//!
//! Available to unit tests and, behind the `test-utils` feature, to this
//! crate's own integration tests. [`RecordingScope`] stands in for a host
//! resolution scope and records every registration and forcing outcome;
//! [`ScopeRecorder`] is the cloneable handle tests keep after moving the
//! scope into a collection.

use std::sync::{Arc, Mutex, PoisonError};

use crate::host::{ConstraintHandle, ResolutionScope};

/// Cloneable view of what a [`RecordingScope`] has seen.
#[derive(Clone, Debug, Default)]
pub struct ScopeRecorder {
    registered: Arc<Mutex<Vec<String>>>,
    forced: Arc<Mutex<Vec<String>>>,
}

impl ScopeRecorder {
    /// Coordinates registered so far, in registration order.
    #[must_use]
    pub fn registered(&self) -> Vec<String> {
        self.registered.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Coordinates whose registrations were successfully forced.
    #[must_use]
    pub fn forced(&self) -> Vec<String> {
        self.forced.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// An in-memory [`ResolutionScope`] that records registrations.
///
/// Created with forcing support by default; [`without_forcing`](Self::without_forcing)
/// builds a scope whose constraint handles answer `false` to
/// [`try_force`](ConstraintHandle::try_force), for exercising the degraded
/// path.
pub struct RecordingScope {
    name: String,
    forcing_supported: bool,
    recorder: ScopeRecorder,
}

impl RecordingScope {
    /// A scope whose constraint handles support forcing.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            forcing_supported: true,
            recorder: ScopeRecorder::default(),
        }
    }

    /// A scope whose constraint handles do not support forcing.
    #[must_use]
    pub fn without_forcing(name: impl Into<String>) -> Self {
        Self {
            forcing_supported: false,
            ..Self::new(name)
        }
    }

    /// A handle onto this scope's records that survives moving the scope
    /// into a collection.
    #[must_use]
    pub fn recorder(&self) -> ScopeRecorder {
        self.recorder.clone()
    }
}

impl ResolutionScope for RecordingScope {
    fn name(&self) -> &str {
        &self.name
    }

    fn register_constraint(&self, coordinate: &str) -> Box<dyn ConstraintHandle> {
        self.recorder
            .registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(coordinate.to_string());

        Box::new(RecordingHandle {
            coordinate: coordinate.to_string(),
            forcing_supported: self.forcing_supported,
            forced: Arc::clone(&self.recorder.forced),
        })
    }
}

struct RecordingHandle {
    coordinate: String,
    forcing_supported: bool,
    forced: Arc<Mutex<Vec<String>>>,
}

impl ConstraintHandle for RecordingHandle {
    fn try_force(&mut self) -> bool {
        if !self.forcing_supported {
            return false;
        }

        self.forced
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(self.coordinate.clone());

        true
    }
}
