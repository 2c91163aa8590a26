#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Outcome algebra for the FGA SDK.
//!
//! - [`Outcome`] - `Success(T)` / `Failure(E)` with fluent combinators
//! - [`IntoOutcome`] - what `then`/`recover` callbacks may return
//! - [`attempt`], [`attempt_unwind`] - the sanctioned error-to-value boundary
//!
//! Expected, recoverable failures travel as values; programmer errors
//! (asking a `Failure` for its value) still panic.

pub mod boundary;
pub mod outcome;

pub use boundary::{Panicked, attempt, attempt_unwind};
pub use outcome::{IntoOutcome, Outcome};
