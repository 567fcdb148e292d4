//! The seam between the core and its external collaborators.
//!
//! The reader, analyser, interpreter, and namespace table live outside
//! this crate. Built-ins reach them through the [`Host`] trait, and every
//! built-in receives a [`Ctx`] bundling the heap, the intern table, the
//! host hooks, the print writer, and the global hierarchy cell.

use crate::{
    exception::{CoreError, RunResult},
    heap::Heap,
    hierarchy::GlobalHierarchy,
    intern::{Interns, SymbolId},
    io::PrintWriter,
    resource::{NoLimitTracker, ResourceTracker},
    value::Value,
};

/// Hooks into the external reader/analyser/interpreter.
///
/// Implementations normalise their own failures to EvalError before
/// returning; the defaults in [`NoHost`] reject everything that needs an
/// interpreter.
pub trait Host<T: ResourceTracker> {
    /// Reads a single form from `source` as a value, or `None` at end of
    /// input.
    fn read(
        &mut self,
        heap: &mut Heap<T>,
        interns: &mut Interns,
        source: &str,
    ) -> RunResult<Option<Value>>;

    /// Reads every form in `source`, in order (the `load-string` shape).
    fn read_all(
        &mut self,
        heap: &mut Heap<T>,
        interns: &mut Interns,
        source: &str,
    ) -> RunResult<Vec<Value>>;

    /// Analyses and runs one form.
    fn eval(&mut self, heap: &mut Heap<T>, interns: &mut Interns, form: Value) -> RunResult<Value>;

    /// Resolves a symbol to its var in the current environment.
    fn resolve(
        &mut self,
        heap: &mut Heap<T>,
        interns: &mut Interns,
        symbol: SymbolId,
    ) -> RunResult<Option<Value>>;

    /// Invokes an interpreter-owned closure.
    ///
    /// The core routes every non-closure callable itself; only values the
    /// interpreter created come through here.
    fn call_closure(
        &mut self,
        heap: &mut Heap<T>,
        interns: &mut Interns,
        print: &mut dyn PrintWriter,
        target: Value,
        args: &[Value],
    ) -> RunResult<Value>;
}

/// A host with no interpreter attached.
///
/// Lets the core run standalone (tests, embedding without an evaluator):
/// everything that genuinely needs the interpreter fails with EvalError,
/// and closure calls fail with TypeError.
#[derive(Debug, Default)]
pub struct NoHost;

impl<T: ResourceTracker> Host<T> for NoHost {
    fn read(
        &mut self,
        _heap: &mut Heap<T>,
        _interns: &mut Interns,
        _source: &str,
    ) -> RunResult<Option<Value>> {
        Err(CoreError::eval_error("no reader attached to this session"))
    }

    fn read_all(
        &mut self,
        _heap: &mut Heap<T>,
        _interns: &mut Interns,
        _source: &str,
    ) -> RunResult<Vec<Value>> {
        Err(CoreError::eval_error("no reader attached to this session"))
    }

    fn eval(&mut self, _heap: &mut Heap<T>, _interns: &mut Interns, _form: Value) -> RunResult<Value> {
        Err(CoreError::eval_error("no interpreter attached to this session"))
    }

    fn resolve(
        &mut self,
        _heap: &mut Heap<T>,
        _interns: &mut Interns,
        _symbol: SymbolId,
    ) -> RunResult<Option<Value>> {
        Err(CoreError::eval_error("no environment attached to this session"))
    }

    fn call_closure(
        &mut self,
        _heap: &mut Heap<T>,
        _interns: &mut Interns,
        _print: &mut dyn PrintWriter,
        _target: Value,
        _args: &[Value],
    ) -> RunResult<Value> {
        Err(CoreError::type_error(
            "closure calls need an interpreter attached to this session",
        ))
    }
}

/// Everything a built-in needs: the allocator, the intern table, the host
/// hooks, the output writer, and the global hierarchy cell.
pub struct Ctx<'a, T: ResourceTracker> {
    pub heap: &'a mut Heap<T>,
    pub interns: &'a mut Interns,
    pub host: &'a mut dyn Host<T>,
    pub print: &'a mut dyn PrintWriter,
    pub hierarchy: &'a mut GlobalHierarchy,
}

/// The state a session owns: heap, interns, and the global hierarchy.
///
/// Pair it with a [`Host`] and a [`PrintWriter`] via [`Rt::ctx`] to call
/// built-ins.
#[derive(Debug)]
pub struct Rt<T: ResourceTracker = NoLimitTracker> {
    pub heap: Heap<T>,
    pub interns: Interns,
    pub hierarchy: GlobalHierarchy,
}

impl Rt<NoLimitTracker> {
    /// A session with no resource limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tracker(NoLimitTracker)
    }
}

impl Default for Rt<NoLimitTracker> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ResourceTracker> Rt<T> {
    /// A session whose heap allocates through `tracker`.
    pub fn with_tracker(tracker: T) -> Self {
        Self {
            heap: Heap::new(64, tracker),
            interns: Interns::new(),
            hierarchy: GlobalHierarchy::new(),
        }
    }

    /// Borrows the session as a built-in calling context.
    pub fn ctx<'a>(
        &'a mut self,
        host: &'a mut dyn Host<T>,
        print: &'a mut dyn PrintWriter,
    ) -> Ctx<'a, T> {
        Ctx {
            heap: &mut self.heap,
            interns: &mut self.interns,
            host,
            print,
            hierarchy: &mut self.hierarchy,
        }
    }
}
