//! The lazy-seq cell: a one-shot state machine from thunk to cached seq.
//!
//! Realisation (in the seq module, which has the calling context) moves
//! the cell `Thunk → Realizing → Realized` and drops the thunk reference.
//! The `Realizing` marker traps re-entrant self-realisation.

use crate::value::Value;

/// Lifecycle of a lazy-seq cell.
#[derive(Debug, Clone, Copy)]
pub enum LazySeqState {
    /// Unrealised; holds the producer thunk.
    Thunk(Value),
    /// Realisation in progress; re-entry is a StateError.
    Realizing,
    /// Realised; holds the normalised seq (`Nil` when empty, otherwise a
    /// list, vector, or string reference).
    Realized(Value),
}

/// A lazy sequence cell.
#[derive(Debug, Clone, Copy)]
pub struct LazySeq {
    pub state: LazySeqState,
}

impl LazySeq {
    /// An unrealised lazy-seq over `thunk`.
    #[must_use]
    pub fn new(thunk: Value) -> Self {
        Self {
            state: LazySeqState::Thunk(thunk),
        }
    }

    /// The cached seq when realised.
    #[must_use]
    pub fn realized_value(&self) -> Option<Value> {
        match self.state {
            LazySeqState::Realized(v) => Some(v),
            _ => None,
        }
    }

    /// Whether realisation has completed.
    #[must_use]
    pub fn is_realized(&self) -> bool {
        matches!(self.state, LazySeqState::Realized(_))
    }
}
