//! Core types shared across the crate.
//!
//! Currently this is home to the crate-wide error enum ([`PinfileError`]) and
//! the [`Result`] alias the engine's fallible operations return.

pub mod error;

pub use error::{PinfileError, Result};
