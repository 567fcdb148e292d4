//! Type definitions for the runtime's heap-allocated values.
//!
//! Each module wraps one family of heap data and gives it its language
//! semantics; the [`CljTrait`] interface is implemented by both `Value`
//! and `HeapData` so polymorphic operations dispatch uniformly.

pub mod cells;
pub mod clj_trait;
pub mod function;
pub mod kind;
pub mod lazy_seq;
pub mod list;
pub mod map;
pub mod multi_fn;
pub mod protocol;
pub mod regex;
pub mod set;
pub mod transient;
pub mod vector;

pub use cells::{Atom, Delay, DelayState, Opaque, Promise, Var, Volatile};
pub use clj_trait::{CljTrait, PrintMode};
pub use function::{Closure, Comp, EnvId, FnArity, NodeId, Partial};
pub use kind::Type;
pub use lazy_seq::{LazySeq, LazySeqState};
pub use list::ListNode;
pub use map::{MapEntry, PersistentMap};
pub use multi_fn::MultiFn;
pub use protocol::{Protocol, ProtocolFn};
pub use regex::{Matcher, Pattern};
pub use set::PersistentSet;
pub use transient::{Transient, TransientData};
pub use vector::PersistentVector;
