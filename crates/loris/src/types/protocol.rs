//! Protocols: named method-signature sets with per-type dispatch cells.

use crate::{
    heap::HeapId,
    intern::SymbolId,
    types::Type,
    value::Value,
};

/// A named set of method signatures.
#[derive(Debug, Clone)]
pub struct Protocol {
    pub name: SymbolId,
    pub methods: Vec<SymbolId>,
}

/// The dispatch cell for one protocol method.
///
/// Implementations are keyed by the runtime type tag of the first
/// argument.
#[derive(Debug, Clone)]
pub struct ProtocolFn {
    pub name: SymbolId,
    pub protocol: HeapId,
    pub impls: Vec<(Type, Value)>,
}

impl ProtocolFn {
    /// The implementation registered for `tag`, if any.
    #[must_use]
    pub fn find_impl(&self, tag: Type) -> Option<Value> {
        self.impls
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, f)| *f)
    }

    /// Adds or replaces the implementation for `tag`.
    pub fn extend(&mut self, tag: Type, f: Value) {
        for (t, existing) in &mut self.impls {
            if *t == tag {
                *existing = f;
                return;
            }
        }
        self.impls.push((tag, f));
    }
}
