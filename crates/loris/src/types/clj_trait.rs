//! The common interface implemented by `Value` and `HeapData`.

use std::fmt::Write;

use crate::{heap::Heap, intern::Interns, resource::ResourceTracker, types::Type};

/// How a value is rendered.
///
/// `Readable` is the `pr` family: strings quoted and escaped, characters
/// in `\c` form. `Display` is the `str`/`print` family: raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    Readable,
    Display,
}

/// Polymorphic operations shared by immediate values and heap data.
///
/// Methods take the heap so `Ref` payloads can be reached; none of them
/// mutate. Realisation of lazy cells never happens here — printing an
/// unrealised lazy-seq renders the `#<lazy-seq>` placeholder.
pub trait CljTrait {
    /// The runtime type tag.
    fn clj_type(&self, heap: &Heap<impl ResourceTracker>) -> Type;

    /// Element count for counted collections and strings, `None` otherwise.
    fn clj_count(&self, heap: &Heap<impl ResourceTracker>) -> Option<usize>;

    /// Structural equality respecting variant tags (a vector is never
    /// `eql` to a list). NaN is not `eql` to itself.
    fn clj_eql(&self, other: &Self, heap: &Heap<impl ResourceTracker>, interns: &Interns) -> bool;

    /// Renders this value into `f` in the given mode.
    fn clj_fmt(
        &self,
        f: &mut impl Write,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
        mode: PrintMode,
    ) -> std::fmt::Result;

    /// Approximate heap footprint in bytes, for resource accounting.
    fn clj_estimate_size(&self) -> usize;
}
