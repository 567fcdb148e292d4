#![doc = include_str!("../../../README.md")]

mod args;
mod builtins;
mod exception;
mod heap;
mod hierarchy;
mod host;
mod intern;
mod io;
mod resource;
mod seq;
mod types;
mod value;

pub use crate::{
    args::Num,
    builtins::{builtin_table, call_value, BuiltinFn, Family},
    exception::{CoreError, ErrorKind, RunResult},
    heap::{Heap, HeapData, HeapId, HeapStats},
    hierarchy::GlobalHierarchy,
    host::{Ctx, Host, NoHost, Rt},
    intern::{Interns, KeywordId, NameId, SymbolId},
    io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint},
    resource::{LimitedTracker, NoLimitTracker, ResourceError, ResourceTracker},
    seq::{seq, seq_first, seq_next, seq_rest, seq_to_vec},
    types::{
        Atom, CljTrait, Closure, Comp, Delay, DelayState, EnvId, FnArity, LazySeq, LazySeqState,
        ListNode, MapEntry, Matcher, MultiFn, NodeId, Opaque, Partial, Pattern, PersistentMap,
        PersistentSet, PersistentVector, PrintMode, Promise, Protocol, ProtocolFn, Transient,
        TransientData, Type, Var, Volatile,
    },
    value::{float_repr, Value},
};
