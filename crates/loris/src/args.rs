//! Arity checks and typed extraction for built-in arguments.
//!
//! Built-ins receive a scratch slice of values. Every one of them
//! validates arity first through these helpers so the error surface is
//! uniform, then extracts operands with the typed accessors, which
//! produce TypeError with the offending type tag in the message.

use crate::{
    exception::{CoreError, RunResult},
    heap::{Heap, HeapData, HeapId},
    intern::KeywordId,
    resource::ResourceTracker,
    types::{CljTrait, Type},
    value::Value,
};

/// Exactly `expected` arguments.
pub fn check_exact(name: &str, args: &[Value], expected: usize) -> RunResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(CoreError::arity_exact(name, expected, args.len()))
    }
}

/// At least `min` arguments.
pub fn check_at_least(name: &str, args: &[Value], min: usize) -> RunResult<()> {
    if args.len() >= min {
        Ok(())
    } else {
        Err(CoreError::arity_at_least(name, min, args.len()))
    }
}

/// Between `min` and `max` arguments inclusive.
pub fn check_between(name: &str, args: &[Value], min: usize, max: usize) -> RunResult<()> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else {
        Err(CoreError::arity_between(name, min, max, args.len()))
    }
}

/// An i64 operand.
pub fn as_int(name: &str, v: Value, heap: &Heap<impl ResourceTracker>) -> RunResult<i64> {
    match v {
        Value::Int(i) => Ok(i),
        _ => Err(CoreError::wrong_type(name, "a long", v.clj_type(heap))),
    }
}

/// A keyword operand.
pub fn as_keyword(name: &str, v: Value, heap: &Heap<impl ResourceTracker>) -> RunResult<KeywordId> {
    match v {
        Value::Keyword(id) => Ok(id),
        _ => Err(CoreError::wrong_type(name, "a keyword", v.clj_type(heap))),
    }
}

/// A symbol operand.
pub fn as_symbol(
    name: &str,
    v: Value,
    heap: &Heap<impl ResourceTracker>,
) -> RunResult<crate::intern::SymbolId> {
    match v {
        Value::Symbol(id) => Ok(id),
        _ => Err(CoreError::wrong_type(name, "a symbol", v.clj_type(heap))),
    }
}

/// A string operand, borrowed from the heap.
pub fn as_str<'h>(
    name: &str,
    v: Value,
    heap: &'h Heap<impl ResourceTracker>,
) -> RunResult<&'h str> {
    if let Value::Ref(id) = v
        && let HeapData::Str(s) = heap.get(id)
    {
        return Ok(s.as_str());
    }
    Err(CoreError::wrong_type(name, "a string", v.clj_type(heap)))
}

/// The heap id of an operand of the given heap kind, selected by a probe
/// on the heap data.
pub fn as_heap_id(
    name: &str,
    v: Value,
    heap: &Heap<impl ResourceTracker>,
    expected: Type,
) -> RunResult<HeapId> {
    if let Value::Ref(id) = v
        && heap.get(id).clj_type(heap) == expected
    {
        return Ok(id);
    }
    Err(CoreError::wrong_type(
        name,
        expected.into(),
        v.clj_type(heap),
    ))
}

/// A numeric operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    /// The operand as f64, coercing ints.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(x) => x,
        }
    }

    /// Whether the operand is the float variant.
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float(_))
    }
}

impl From<Num> for Value {
    fn from(n: Num) -> Self {
        match n {
            Num::Int(i) => Self::Int(i),
            Num::Float(x) => Self::Float(x),
        }
    }
}

/// A numeric operand (long or double).
pub fn as_num(name: &str, v: Value, heap: &Heap<impl ResourceTracker>) -> RunResult<Num> {
    match v {
        Value::Int(i) => Ok(Num::Int(i)),
        Value::Float(x) => Ok(Num::Float(x)),
        _ => Err(CoreError::wrong_type(name, "a number", v.clj_type(heap))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::NoLimitTracker;

    #[test]
    fn arity_errors_name_the_callable() {
        let err = check_exact("subs", &[Value::Nil], 2).unwrap_err();
        assert!(err.to_string().contains("subs"));
        assert!(check_between("nth", &[Value::Nil, Value::Nil], 2, 3).is_ok());
    }

    #[test]
    fn extraction_reports_actual_type() {
        let heap: Heap<NoLimitTracker> = Heap::new(4, NoLimitTracker);
        let err = as_int("inc", Value::Char('a'), &heap).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: inc: expected a long, got character");
    }
}
