//! The two-variant outcome type and its combinators.
//!
//! An [`Outcome`] is created once and never changes state: every combinator
//! consumes the receiver and hands back either the same outcome or a new one.
//! Side-effecting callbacks ([`Outcome::success`], [`Outcome::failure`]) run
//! only on the matching variant and return the outcome untouched, so a chain
//! can be written without branching:
//!
//! ```
//! use fga_result::Outcome;
//!
//! let doubled: Outcome<i32, String> = Outcome::Success(21)
//!     .success(|v| assert_eq!(*v, 21))
//!     .map(|v| v * 2);
//! assert_eq!(doubled.into_result(), Ok(42));
//! ```

/// Exactly one of a value (`Success`) or an error (`Failure`).
#[must_use = "an Outcome may be a Failure that should be handled"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<T, E> {
    /// The operation produced a value.
    Success(T),
    /// The operation failed with an error.
    Failure(E),
}

/// Conversion accepted by [`Outcome::then`] and [`Outcome::recover`].
///
/// A callback may hand back either an [`Outcome`] (which replaces the chain)
/// or a standard [`Result`] (converted variant for variant).
pub trait IntoOutcome<T, E> {
    /// Convert `self` into an [`Outcome`].
    fn into_outcome(self) -> Outcome<T, E>;
}

impl<T, E> IntoOutcome<T, E> for Outcome<T, E> {
    #[inline]
    fn into_outcome(self) -> Outcome<T, E> {
        self
    }
}

impl<T, E> IntoOutcome<T, E> for Result<T, E> {
    #[inline]
    fn into_outcome(self) -> Outcome<T, E> {
        self.into()
    }
}

impl<T, E> Outcome<T, E> {
    /// Returns `true` for the `Success` variant.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` for the `Failure` variant.
    #[must_use]
    pub const fn failed(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Borrow the value, if this is a `Success`.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(v) => Some(v),
            Self::Failure(_) => None,
        }
    }

    /// Borrow the error, if this is a `Failure`.
    #[must_use]
    pub const fn error(&self) -> Option<&E> {
        match self {
            Self::Success(_) => None,
            Self::Failure(e) => Some(e),
        }
    }

    /// Converts from `&Outcome<T, E>` to `Outcome<&T, &E>`.
    pub const fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Self::Success(v) => Outcome::Success(v),
            Self::Failure(e) => Outcome::Failure(e),
        }
    }

    /// Take the success value.
    ///
    /// Only valid on `Success`; asking a `Failure` for its value is a
    /// programming error, not a recoverable failure path.
    ///
    /// # Panics
    ///
    /// Panics (after logging at `error` level) when called on a `Failure`.
    #[track_caller]
    pub fn val(self) -> T {
        match self {
            Self::Success(v) => v,
            Self::Failure(_) => {
                tracing::error!("Outcome::val() called on a Failure; use err() or check failed() first");
                panic!("called `Outcome::val()` on a `Failure`");
            }
        }
    }

    /// Take the error.
    ///
    /// # Panics
    ///
    /// Panics (after logging at `error` level) when called on a `Success`.
    #[track_caller]
    pub fn err(self) -> E {
        match self {
            Self::Failure(e) => e,
            Self::Success(_) => {
                tracing::error!("Outcome::err() called on a Success; use val() or check succeeded() first");
                panic!("called `Outcome::err()` on a `Success`");
            }
        }
    }

    /// Run `f` on the value of a `Success`; returns `self` unchanged.
    pub fn success<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Self::Success(v) = &self {
            f(v);
        }
        self
    }

    /// Run `f` on the error of a `Failure`; returns `self` unchanged.
    pub fn failure<F>(self, f: F) -> Self
    where
        F: FnOnce(&E),
    {
        if let Self::Failure(e) = &self {
            f(e);
        }
        self
    }

    /// Chain a fallible step onto a `Success`.
    ///
    /// The outcome returned by `f` replaces the chain. A `Failure` passes
    /// through without calling `f`. Use [`Outcome::map`] when the step
    /// returns a plain value.
    pub fn then<U, R, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> R,
        R: IntoOutcome<U, E>,
    {
        match self {
            Self::Success(v) => f(v).into_outcome(),
            Self::Failure(e) => Outcome::Failure(e),
        }
    }

    /// Transform the value of a `Success`, wrapping the result in a new `Success`.
    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(v) => Outcome::Success(f(v)),
            Self::Failure(e) => Outcome::Failure(e),
        }
    }

    /// Turn a `Failure` into whatever outcome `f` returns.
    ///
    /// A `Success` passes through without calling `f`.
    pub fn recover<F2, R, F>(self, f: F) -> Outcome<T, F2>
    where
        F: FnOnce(E) -> R,
        R: IntoOutcome<T, F2>,
    {
        match self {
            Self::Success(v) => Outcome::Success(v),
            Self::Failure(e) => f(e).into_outcome(),
        }
    }

    /// Turn a `Failure` into a `Success` holding the value `f` computes.
    pub fn recover_value<F>(self, f: F) -> Self
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Self::Success(v) => Self::Success(v),
            Self::Failure(e) => Self::Success(f(e)),
        }
    }

    /// Transform the error of a `Failure`.
    pub fn map_err<F2, F>(self, f: F) -> Outcome<T, F2>
    where
        F: FnOnce(E) -> F2,
    {
        match self {
            Self::Success(v) => Outcome::Success(v),
            Self::Failure(e) => Outcome::Failure(f(e)),
        }
    }

    /// Raise the contained error; a `Success` is handed back unchanged.
    ///
    /// Intended for use with `?` in code that prefers early returns:
    /// `outcome.rethrow()?.map(...)`.
    ///
    /// # Errors
    ///
    /// Returns the contained error when `self` is a `Failure`.
    pub fn rethrow(self) -> Result<Self, E> {
        match self {
            Self::Failure(e) => Err(e),
            success @ Self::Success(_) => Ok(success),
        }
    }

    /// Raise an override error in place of the contained one.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `replace` when `self` is a `Failure`.
    pub fn rethrow_with<X, F>(self, replace: F) -> Result<Self, X>
    where
        F: FnOnce(E) -> X,
    {
        match self {
            Self::Failure(e) => Err(replace(e)),
            success @ Self::Success(_) => Ok(success),
        }
    }

    /// Return the value, or raise the contained error.
    ///
    /// # Errors
    ///
    /// Returns the contained error when `self` is a `Failure`.
    pub fn into_result(self) -> Result<T, E> {
        self.into()
    }

    /// Hand the value-or-error to `f` and return whatever it produces.
    pub fn unwrap_with<R, F>(self, f: F) -> R
    where
        F: FnOnce(Result<T, E>) -> R,
    {
        f(self.into_result())
    }

    /// Return the value, discarding any error.
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Success(v) => Some(v),
            Self::Failure(_) => None,
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Self::Success(v),
            Err(e) => Self::Failure(e),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Success(v) => Ok(v),
            Outcome::Failure(e) => Err(e),
        }
    }
}
