//! Runtime errors surfaced by the evaluator core.
//!
//! Errors are values on the error channel: every built-in returns
//! [`RunResult`] and the external interpreter decides what to do with a
//! failure. Nothing in this crate unwinds through user data, and persistent
//! collections are never published half-written.

use std::fmt::{self, Display};

use strum::{Display, EnumString, IntoStaticStr};

/// Result type alias for operations that can produce a runtime error.
pub type RunResult<T> = Result<T, CoreError>;

/// The error taxonomy of the evaluator core.
///
/// Uses strum derives so the wire name of each kind (`TypeError`,
/// `DivisionByZero`, …) is the variant name itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum ErrorKind {
    /// Argument count outside the accepted range of a callable.
    ArityError,
    /// Operand variant rejected by a built-in or polymorphic operation.
    TypeError,
    /// `/`, `mod`, `rem`, or `quot` with a zero divisor.
    DivisionByZero,
    /// A checked arithmetic form (`+'`, `inc'`, …) wrapped around.
    ArithmeticOverflow,
    /// A multimethod found no applicable method and has no default.
    NoMethodError,
    /// Multiple multimethod candidates tied and no prefer order resolves them.
    AmbiguousDispatchError,
    /// Use of a frozen transient, re-entrant realisation of a lazy cell, or
    /// a cyclic `derive`.
    StateError,
    /// An upstream read/analyse/run operation failed, or a regex source
    /// failed to compile.
    EvalError,
    /// Out-of-range vector or string index.
    IndexError,
    /// `pop` of an empty collection.
    EmptyError,
    /// Deref of an undelivered promise on the single-threaded core.
    DeadlockError,
    /// A heap allocation or memory bound imposed by the embedder was hit.
    ResourceError,
}

/// A runtime error: a kind from the taxonomy plus an optional message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreError {
    kind: ErrorKind,
    message: Option<String>,
}

impl CoreError {
    /// Creates an error with a message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    /// Creates an error with no message.
    #[must_use]
    pub fn bare(kind: ErrorKind) -> Self {
        Self { kind, message: None }
    }

    /// The kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The message of this error, if one was attached.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// `TypeError` with a message.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    /// `TypeError` for an operand of the wrong kind.
    pub fn wrong_type(name: &str, expected: &str, got: impl Display) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("{name}: expected {expected}, got {got}"),
        )
    }

    /// `ArityError` for an exact expected count.
    pub fn arity_exact(name: &str, expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityError,
            format!("wrong number of args ({got}) passed to {name}; expected {expected}"),
        )
    }

    /// `ArityError` for a lower bound.
    pub fn arity_at_least(name: &str, expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityError,
            format!("wrong number of args ({got}) passed to {name}; expected at least {expected}"),
        )
    }

    /// `ArityError` for an inclusive range.
    pub fn arity_between(name: &str, min: usize, max: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityError,
            format!("wrong number of args ({got}) passed to {name}; expected {min} to {max}"),
        )
    }

    /// `DivisionByZero` for the named operation.
    pub fn division_by_zero(name: &str) -> Self {
        Self::new(ErrorKind::DivisionByZero, format!("{name}: divide by zero"))
    }

    /// `ArithmeticOverflow` for the named checked operation.
    pub fn overflow(name: &str) -> Self {
        Self::new(ErrorKind::ArithmeticOverflow, format!("{name}: integer overflow"))
    }

    /// `IndexError` with a message.
    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IndexError, message)
    }

    /// `IndexError` for an out-of-bounds position.
    pub fn index_out_of_bounds(index: i64, count: usize) -> Self {
        Self::new(
            ErrorKind::IndexError,
            format!("index {index} out of bounds for count {count}"),
        )
    }

    /// `StateError` with a message.
    pub fn state_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StateError, message)
    }

    /// `EvalError` with a message.
    pub fn eval_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EvalError, message)
    }

    /// `NoMethodError` for a dispatch value with no method.
    pub fn no_method(multi_name: &str, dispatch_value: &str) -> Self {
        Self::new(
            ErrorKind::NoMethodError,
            format!("no method in multimethod '{multi_name}' for dispatch value: {dispatch_value}"),
        )
    }

    /// `AmbiguousDispatchError` between two tied dispatch candidates.
    pub fn ambiguous_dispatch(multi_name: &str, a: &str, b: &str) -> Self {
        Self::new(
            ErrorKind::AmbiguousDispatchError,
            format!("multiple methods in multimethod '{multi_name}' match dispatch value: {a} and {b}, and neither is preferred"),
        )
    }

    /// `EmptyError` for the named operation on an empty collection.
    pub fn empty(name: &str) -> Self {
        Self::new(ErrorKind::EmptyError, format!("can't {name} an empty collection"))
    }

    /// `DeadlockError` for a deref that can never complete.
    pub fn deadlock(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DeadlockError, message)
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {msg}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for CoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_wire_names() {
        assert_eq!(ErrorKind::TypeError.to_string(), "TypeError");
        assert_eq!(ErrorKind::DivisionByZero.to_string(), "DivisionByZero");
        assert_eq!(ErrorKind::AmbiguousDispatchError.to_string(), "AmbiguousDispatchError");
    }

    #[test]
    fn display_includes_message() {
        let err = CoreError::arity_exact("subs", 2, 4);
        assert_eq!(
            err.to_string(),
            "ArityError: wrong number of args (4) passed to subs; expected 2"
        );
        assert_eq!(CoreError::bare(ErrorKind::EvalError).to_string(), "EvalError");
    }
}
