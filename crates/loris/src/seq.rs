//! The sequence protocol: `seq`, `first`, `rest`, and lazy realisation.
//!
//! Everything seqable funnels through [`seq`]: nil and the empty list,
//! cons chains, vectors, strings (as character sequences), maps (as
//! `[k v]` entry vectors), sets, and lazy-seqs. Realising a lazy-seq is a
//! one-shot state transition; the producer thunk runs exactly once and is
//! dropped on success.

use crate::{
    builtins::call_value,
    exception::{CoreError, RunResult},
    heap::{HeapData, HeapId},
    host::Ctx,
    resource::ResourceTracker,
    types::{CljTrait, LazySeqState, ListNode, PersistentVector},
    value::Value,
};

/// Realises the lazy-seq at `id` and returns its normalised seq: `Nil`
/// when empty, otherwise a list, vector, or string reference.
///
/// Idempotent; re-entrant self-realisation is trapped as StateError. On
/// failure the thunk is restored so the error is reproducible.
pub fn realize_lazy(ctx: &mut Ctx<'_, impl ResourceTracker>, id: HeapId) -> RunResult<Value> {
    let thunk = {
        let HeapData::LazySeq(cell) = ctx.heap.get_mut(id) else {
            return Err(CoreError::type_error("not a lazy-seq"));
        };
        match cell.state {
            LazySeqState::Realized(v) => return Ok(v),
            LazySeqState::Realizing => {
                return Err(CoreError::state_error(
                    "lazy-seq realisation re-entered its own producer",
                ));
            }
            LazySeqState::Thunk(t) => {
                cell.state = LazySeqState::Realizing;
                t
            }
        }
    };

    let result = call_value(ctx, thunk, &[]).and_then(|produced| normalize(ctx, produced));
    let state = match &result {
        Ok(normalized) => LazySeqState::Realized(*normalized),
        Err(_) => LazySeqState::Thunk(thunk),
    };
    if let HeapData::LazySeq(cell) = ctx.heap.get_mut(id) {
        cell.state = state;
    }
    result
}

/// Interprets a producer result as a seq: nil, a list, a vector, a string
/// (character sequence), or another lazy-seq (chained). Empty collections
/// normalise to `Nil`.
fn normalize(ctx: &mut Ctx<'_, impl ResourceTracker>, produced: Value) -> RunResult<Value> {
    match produced {
        Value::Nil | Value::EmptyList => Ok(Value::Nil),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::List(_) => Ok(produced),
            HeapData::Vector(v) => Ok(if v.is_empty() { Value::Nil } else { produced }),
            HeapData::Str(s) => Ok(if s.is_empty() { Value::Nil } else { produced }),
            HeapData::LazySeq(_) => realize_lazy(ctx, id),
            _ => Err(CoreError::type_error(format!(
                "lazy-seq producer returned a non-sequence: {}",
                produced.clj_type(ctx.heap)
            ))),
        },
        _ => Err(CoreError::type_error(format!(
            "lazy-seq producer returned a non-sequence: {}",
            produced.clj_type(ctx.heap)
        ))),
    }
}

/// `seq`: nil for anything empty, otherwise a walkable sequence view.
///
/// Maps yield their entries as `[k v]` vectors; sets yield their
/// elements. Lazy-seqs are realised.
pub fn seq(ctx: &mut Ctx<'_, impl ResourceTracker>, v: Value) -> RunResult<Value> {
    match v {
        Value::Nil | Value::EmptyList => Ok(Value::Nil),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::List(_) => Ok(v),
            HeapData::Vector(vector) => Ok(if vector.is_empty() { Value::Nil } else { v }),
            HeapData::Str(s) => Ok(if s.is_empty() { Value::Nil } else { v }),
            HeapData::LazySeq(_) => realize_lazy(ctx, id),
            HeapData::Map(m) => {
                let entries: Vec<(Value, Value)> =
                    m.entries().iter().map(|e| (e.key, e.value)).collect();
                if entries.is_empty() {
                    return Ok(Value::Nil);
                }
                let mut items = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    items.push(ctx.heap.alloc_vector(vec![key, value])?);
                }
                ctx.heap.alloc_list(&items)
            }
            HeapData::Set(s) => {
                let items = s.items().to_vec();
                if items.is_empty() {
                    return Ok(Value::Nil);
                }
                ctx.heap.alloc_list(&items)
            }
            _ => Err(not_seqable(ctx, v)),
        },
        _ => Err(not_seqable(ctx, v)),
    }
}

/// Whether `seq` would accept this value.
pub fn is_seqable(v: Value, heap: &crate::heap::Heap<impl ResourceTracker>) -> bool {
    match v {
        Value::Nil | Value::EmptyList => true,
        Value::Ref(id) => matches!(
            heap.get(id),
            HeapData::List(_)
                | HeapData::Vector(_)
                | HeapData::Str(_)
                | HeapData::LazySeq(_)
                | HeapData::Map(_)
                | HeapData::Set(_)
        ),
        _ => false,
    }
}

fn not_seqable(ctx: &Ctx<'_, impl ResourceTracker>, v: Value) -> CoreError {
    CoreError::type_error(format!("not seqable: {}", v.clj_type(ctx.heap)))
}

/// The first element of a seqable, or nil when empty.
pub fn seq_first(ctx: &mut Ctx<'_, impl ResourceTracker>, v: Value) -> RunResult<Value> {
    let s = seq(ctx, v)?;
    match s {
        Value::Nil => Ok(Value::Nil),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::List(node) => Ok(node.first),
            HeapData::Vector(vector) => Ok(vector.get(0).unwrap_or(Value::Nil)),
            HeapData::Str(string) => Ok(string.chars().next().map_or(Value::Nil, Value::Char)),
            _ => Err(not_seqable(ctx, s)),
        },
        _ => Err(not_seqable(ctx, s)),
    }
}

/// The remainder of a seqable after its first element; the empty list
/// when nothing remains. The tail of a cons chain is returned as stored,
/// so a lazy tail stays unrealised.
pub fn seq_rest(ctx: &mut Ctx<'_, impl ResourceTracker>, v: Value) -> RunResult<Value> {
    let s = seq(ctx, v)?;
    match s {
        Value::Nil => Ok(Value::EmptyList),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::List(node) => Ok(match node.rest {
                Value::Nil => Value::EmptyList,
                rest => rest,
            }),
            HeapData::Vector(vector) => {
                if vector.count() <= 1 {
                    Ok(Value::EmptyList)
                } else {
                    let tail = vector.subvec(1, vector.count());
                    ctx.heap.alloc_value(HeapData::Vector(tail))
                }
            }
            HeapData::Str(string) => {
                let mut chars = string.chars();
                match chars.next() {
                    Some(_) if !chars.as_str().is_empty() => {
                        let tail = chars.as_str().to_owned();
                        ctx.heap.alloc_str(tail)
                    }
                    _ => Ok(Value::EmptyList),
                }
            }
            _ => Err(not_seqable(ctx, s)),
        },
        _ => Err(not_seqable(ctx, s)),
    }
}

/// `next`: the rest as a seq, so nil when nothing remains.
pub fn seq_next(ctx: &mut Ctx<'_, impl ResourceTracker>, v: Value) -> RunResult<Value> {
    let rest = seq_rest(ctx, v)?;
    seq(ctx, rest)
}

/// Walks a seqable eagerly into a vector of its elements, realising lazy
/// tails as it goes. Callers are responsible for only walking finite
/// sequences.
pub fn seq_to_vec(ctx: &mut Ctx<'_, impl ResourceTracker>, v: Value) -> RunResult<Vec<Value>> {
    let mut out = Vec::new();
    let mut cur = seq(ctx, v)?;
    while !matches!(cur, Value::Nil) {
        out.push(seq_first(ctx, cur)?);
        let rest = seq_rest(ctx, cur)?;
        cur = seq(ctx, rest)?;
    }
    Ok(out)
}

/// Conses `first` onto a seqable tail, preserving a known count when the
/// tail has one.
pub fn cons(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    first: Value,
    tail: Value,
) -> RunResult<Value> {
    let node = match tail {
        Value::Nil | Value::EmptyList => ListNode::counted(first, Value::EmptyList, 0),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::List(existing) => match existing.count {
                Some(n) => ListNode::counted(first, tail, n),
                None => ListNode::uncounted(first, tail),
            },
            HeapData::Vector(vector) => ListNode::counted(first, tail, vector.count()),
            HeapData::Str(_) | HeapData::LazySeq(_) => ListNode::uncounted(first, tail),
            _ => return Err(not_seqable(ctx, tail)),
        },
        _ => return Err(not_seqable(ctx, tail)),
    };
    ctx.heap.alloc_value(HeapData::List(node))
}

/// An empty persistent vector value, used by several built-ins.
pub fn empty_vector(ctx: &mut Ctx<'_, impl ResourceTracker>) -> RunResult<Value> {
    ctx.heap
        .alloc_value(HeapData::Vector(PersistentVector::default()))
}
