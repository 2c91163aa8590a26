//! Converting raised errors into values.
//!
//! These helpers are the one place where an error (or a panic) stops
//! propagating and becomes a [`Outcome::Failure`]. Response construction in
//! the SDK funnels every materialization through [`attempt`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::Outcome;

/// A panic captured by [`attempt_unwind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("operation panicked: {message}")]
pub struct Panicked {
    message: String,
}

impl Panicked {
    /// The panic payload rendered as text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        Self { message }
    }
}

/// Run `f`, capturing an `Err` into `Failure` and an `Ok` into `Success`.
pub fn attempt<T, E, F>(f: F) -> Outcome<T, E>
where
    F: FnOnce() -> Result<T, E>,
{
    f().into()
}

/// Run `f`, capturing a panic into `Failure(Panicked)`.
///
/// The closure is treated as unwind safe; callers must not observe state
/// that `f` left half-updated after a captured panic.
pub fn attempt_unwind<T, F>(f: F) -> Outcome<T, Panicked>
where
    F: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(v) => Outcome::Success(v),
        Err(payload) => {
            let captured = Panicked::from_payload(payload.as_ref());
            tracing::debug!(message = %captured.message, "captured panic into Failure");
            Outcome::Failure(captured)
        }
    }
}
