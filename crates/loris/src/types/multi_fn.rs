//! The multimethod cell.
//!
//! A multi-fn holds a dispatch function, a method table keyed by dispatch
//! value, an optional default method, a prefer table, and an optional
//! local hierarchy. The tables are flat entry arrays keyed by `eql`, like
//! the persistent map they mirror. Publishers build a new table and swap
//! it into the cell; dispatch resolution lives in the multimethod
//! built-ins, which have the calling context.

use crate::{
    heap::Heap,
    intern::{Interns, SymbolId},
    resource::ResourceTracker,
    types::CljTrait,
    value::Value,
};

/// A multimethod dispatcher cell.
#[derive(Debug, Clone)]
pub struct MultiFn {
    /// Name the multimethod was registered under.
    pub name: SymbolId,
    /// Produces the dispatch value from the call arguments.
    pub dispatch_fn: Value,
    /// Method table: dispatch value → method.
    pub methods: Vec<(Value, Value)>,
    /// Fallback when no method matches.
    pub default_method: Option<Value>,
    /// Prefer table: preferred dispatch value → values it beats.
    pub prefers: Vec<(Value, Vec<Value>)>,
    /// Local hierarchy; the global one applies when absent.
    pub hierarchy: Option<Value>,
}

impl MultiFn {
    /// Creates a multi-fn with an empty method table.
    #[must_use]
    pub fn new(name: SymbolId, dispatch_fn: Value, hierarchy: Option<Value>) -> Self {
        Self {
            name,
            dispatch_fn,
            methods: Vec::new(),
            default_method: None,
            prefers: Vec::new(),
            hierarchy,
        }
    }

    /// The method registered for exactly `dispatch_value`.
    pub fn find_method(
        &self,
        dispatch_value: &Value,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> Option<Value> {
        self.methods
            .iter()
            .find(|(key, _)| key.clj_eql(dispatch_value, heap, interns))
            .map(|(_, method)| *method)
    }
}

/// Position of `key` in a flat `eql`-keyed entry table.
pub fn table_position<V>(
    table: &[(Value, V)],
    key: &Value,
    heap: &Heap<impl ResourceTracker>,
    interns: &Interns,
) -> Option<usize> {
    table
        .iter()
        .position(|(k, _)| k.clj_eql(key, heap, interns))
}

/// Whether `a` beats `b` through the prefer table, transitively.
///
/// Traversal is depth-limited; the table is tiny in practice and must
/// not loop even if malformed.
pub fn prefers_over(
    prefers: &[(Value, Vec<Value>)],
    a: &Value,
    b: &Value,
    heap: &Heap<impl ResourceTracker>,
    interns: &Interns,
) -> bool {
    fn walk(
        prefers: &[(Value, Vec<Value>)],
        a: &Value,
        b: &Value,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
        depth: usize,
    ) -> bool {
        if depth == 0 {
            return false;
        }
        let Some(index) = table_position(prefers, a, heap, interns) else {
            return false;
        };
        let beaten = &prefers[index].1;
        if beaten.iter().any(|v| v.clj_eql(b, heap, interns)) {
            return true;
        }
        beaten
            .iter()
            .any(|mid| walk(prefers, mid, b, heap, interns, depth - 1))
    }
    walk(prefers, a, b, heap, interns, 100)
}
