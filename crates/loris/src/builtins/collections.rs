//! Collection built-ins: constructors, access, update, and the seq
//! surface functions.
//!
//! Map iteration (`keys`, `vals`, `seq`) follows insertion order for
//! hash maps and `compare` order for sorted maps.

use crate::{
    args::{as_int, check_at_least, check_between, check_exact},
    exception::{CoreError, RunResult},
    heap::HeapData,
    host::Ctx,
    resource::ResourceTracker,
    seq,
    types::{CljTrait, MapEntry, PersistentMap, PersistentSet, TransientData},
    value::Value,
};

pub(crate) fn builtin_list(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    ctx.heap.alloc_list(args)
}

pub(crate) fn builtin_vector(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    ctx.heap.alloc_vector(args.to_vec())
}

pub(crate) fn builtin_vec(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("vec", args, 1)?;
    if let Value::Ref(id) = args[0]
        && matches!(ctx.heap.get(id), HeapData::Vector(_))
    {
        return Ok(args[0]);
    }
    let items = seq::seq_to_vec(ctx, args[0])?;
    ctx.heap.alloc_vector(items)
}

/// Builds a map from alternating key/value arguments.
fn map_from_pairs(
    name: &str,
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
    sorted: bool,
) -> RunResult<Value> {
    if args.len() % 2 != 0 {
        return Err(CoreError::new(
            crate::exception::ErrorKind::ArityError,
            format!("{name}: requires an even number of arguments, got {}", args.len()),
        ));
    }
    let mut map = if sorted {
        PersistentMap::new_sorted()
    } else {
        PersistentMap::new()
    };
    for pair in args.chunks_exact(2) {
        map = map.assoc(pair[0], pair[1], ctx.heap, ctx.interns)?;
    }
    ctx.heap.alloc_value(HeapData::Map(map))
}

pub(crate) fn builtin_hash_map(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    map_from_pairs("hash-map", ctx, args, false)
}

pub(crate) fn builtin_sorted_map(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    map_from_pairs("sorted-map", ctx, args, true)
}

fn set_from_items(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    items: &[Value],
    sorted: bool,
) -> RunResult<Value> {
    let mut set = if sorted {
        PersistentSet::new_sorted()
    } else {
        PersistentSet::new()
    };
    for &item in items {
        set = set.conj(item, ctx.heap, ctx.interns)?;
    }
    ctx.heap.alloc_value(HeapData::Set(set))
}

pub(crate) fn builtin_hash_set(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    set_from_items(ctx, args, false)
}

pub(crate) fn builtin_sorted_set(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    set_from_items(ctx, args, true)
}

pub(crate) fn builtin_set(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("set", args, 1)?;
    let items = seq::seq_to_vec(ctx, args[0])?;
    set_from_items(ctx, &items, false)
}

/// Conjoins one element onto a collection, by the collection's own rule.
fn conj_one(ctx: &mut Ctx<'_, impl ResourceTracker>, coll: Value, x: Value) -> RunResult<Value> {
    match coll {
        Value::Nil | Value::EmptyList => ctx.heap.alloc_list(&[x]),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::List(_) | HeapData::LazySeq(_) => seq::cons(ctx, x, coll),
            HeapData::Vector(v) => {
                let appended = v.conj(x);
                ctx.heap.alloc_value(HeapData::Vector(appended))
            }
            HeapData::Map(m) => {
                let m = m.clone();
                match x {
                    // A [k v] entry vector or another map.
                    Value::Ref(xid) => match ctx.heap.get(xid) {
                        HeapData::Vector(pair) if pair.count() == 2 => {
                            let (k, v) = (pair.get(0).expect("len 2"), pair.get(1).expect("len 2"));
                            let merged = m.assoc(k, v, ctx.heap, ctx.interns)?;
                            ctx.heap.alloc_value(HeapData::Map(merged))
                        }
                        HeapData::Map(other) => {
                            let mut merged = m;
                            let entries: Vec<MapEntry> = other.entries().to_vec();
                            for entry in entries {
                                merged = merged.assoc(entry.key, entry.value, ctx.heap, ctx.interns)?;
                            }
                            ctx.heap.alloc_value(HeapData::Map(merged))
                        }
                        _ => Err(CoreError::type_error(
                            "conj on a map takes a [k v] entry or a map",
                        )),
                    },
                    _ => Err(CoreError::type_error(
                        "conj on a map takes a [k v] entry or a map",
                    )),
                }
            }
            HeapData::Set(s) => {
                let added = s.conj(x, ctx.heap, ctx.interns)?;
                ctx.heap.alloc_value(HeapData::Set(added))
            }
            _ => Err(CoreError::wrong_type(
                "conj",
                "a collection",
                coll.clj_type(ctx.heap),
            )),
        },
        _ => Err(CoreError::wrong_type(
            "conj",
            "a collection",
            coll.clj_type(ctx.heap),
        )),
    }
}

pub(crate) fn builtin_conj(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    if args.is_empty() {
        return seq::empty_vector(ctx);
    }
    let mut coll = args[0];
    for &x in &args[1..] {
        coll = conj_one(ctx, coll, x)?;
    }
    Ok(coll)
}

pub(crate) fn builtin_cons(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("cons", args, 2)?;
    seq::cons(ctx, args[0], args[1])
}

pub(crate) fn builtin_first(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("first", args, 1)?;
    seq::seq_first(ctx, args[0])
}

pub(crate) fn builtin_rest(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("rest", args, 1)?;
    seq::seq_rest(ctx, args[0])
}

pub(crate) fn builtin_next(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("next", args, 1)?;
    seq::seq_next(ctx, args[0])
}

pub(crate) fn builtin_second(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("second", args, 1)?;
    let rest = seq::seq_rest(ctx, args[0])?;
    seq::seq_first(ctx, rest)
}

pub(crate) fn builtin_last(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("last", args, 1)?;
    let mut cur = seq::seq(ctx, args[0])?;
    let mut last = Value::Nil;
    while !matches!(cur, Value::Nil) {
        last = seq::seq_first(ctx, cur)?;
        let rest = seq::seq_rest(ctx, cur)?;
        cur = seq::seq(ctx, rest)?;
    }
    Ok(last)
}

pub(crate) fn builtin_butlast(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("butlast", args, 1)?;
    let mut items = seq::seq_to_vec(ctx, args[0])?;
    if items.len() <= 1 {
        return Ok(Value::Nil);
    }
    items.pop();
    ctx.heap.alloc_list(&items)
}

/// `nth` with an optional default; no default means IndexError out of
/// range.
pub(crate) fn nth_value(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    coll: Value,
    index: i64,
    default: Option<Value>,
) -> RunResult<Value> {
    let miss = |index: i64, count: usize| match default {
        Some(d) => Ok(d),
        None => Err(CoreError::index_out_of_bounds(index, count)),
    };
    if matches!(coll, Value::Nil) {
        return Ok(default.unwrap_or(Value::Nil));
    }
    let index_usize = match usize::try_from(index) {
        Ok(i) => i,
        Err(_) => return miss(index, 0),
    };
    match coll {
        Value::EmptyList => miss(index, 0),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Vector(v) => match v.get(index_usize) {
                Some(item) => Ok(item),
                None => miss(index, v.count()),
            },
            HeapData::Str(s) => match s.chars().nth(index_usize) {
                Some(ch) => Ok(Value::Char(ch)),
                None => miss(index, s.chars().count()),
            },
            HeapData::List(_) | HeapData::LazySeq(_) => {
                let mut cur = seq::seq(ctx, coll)?;
                let mut remaining = index_usize;
                while !matches!(cur, Value::Nil) {
                    if remaining == 0 {
                        return seq::seq_first(ctx, cur);
                    }
                    remaining -= 1;
                    let rest = seq::seq_rest(ctx, cur)?;
                    cur = seq::seq(ctx, rest)?;
                }
                miss(index, index_usize - remaining)
            }
            _ => Err(CoreError::wrong_type(
                "nth",
                "an indexed or sequential collection",
                coll.clj_type(ctx.heap),
            )),
        },
        _ => Err(CoreError::wrong_type(
            "nth",
            "an indexed or sequential collection",
            coll.clj_type(ctx.heap),
        )),
    }
}

pub(crate) fn builtin_nth(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_between("nth", args, 2, 3)?;
    let index = as_int("nth", args[1], ctx.heap)?;
    nth_value(ctx, args[0], index, args.get(2).copied())
}

/// Associative lookup that distinguishes "absent" from "present nil".
pub(crate) fn lookup_opt(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    coll: Value,
    key: Value,
) -> RunResult<Option<Value>> {
    match coll {
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Map(m) => m.get(&key, ctx.heap, ctx.interns),
            HeapData::Set(s) => s.get(&key, ctx.heap, ctx.interns),
            HeapData::Vector(v) => Ok(match key {
                Value::Int(i) => usize::try_from(i).ok().and_then(|i| v.get(i)),
                _ => None,
            }),
            HeapData::Str(s) => Ok(match key {
                Value::Int(i) => usize::try_from(i)
                    .ok()
                    .and_then(|i| s.chars().nth(i))
                    .map(Value::Char),
                _ => None,
            }),
            HeapData::Transient(t) => match t.data()? {
                TransientData::Map(entries) => Ok(entries
                    .iter()
                    .find(|e| e.key.clj_eql(&key, ctx.heap, ctx.interns))
                    .map(|e| e.value)),
                TransientData::Vector(items) => Ok(match key {
                    Value::Int(i) => usize::try_from(i).ok().and_then(|i| items.get(i).copied()),
                    _ => None,
                }),
                TransientData::Set(items) => Ok(items
                    .iter()
                    .find(|item| item.clj_eql(&key, ctx.heap, ctx.interns))
                    .copied()),
            },
            _ => Ok(None),
        },
        _ => Ok(None),
    }
}

/// `get` semantics: lookup with a default for misses.
pub(crate) fn lookup(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    coll: Value,
    key: Value,
    default: Value,
) -> RunResult<Value> {
    Ok(lookup_opt(ctx, coll, key)?.unwrap_or(default))
}

pub(crate) fn builtin_get(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_between("get", args, 2, 3)?;
    let default = args.get(2).copied().unwrap_or(Value::Nil);
    lookup(ctx, args[0], args[1], default)
}

pub(crate) fn builtin_get_in(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_between("get-in", args, 2, 3)?;
    let default = args.get(2).copied().unwrap_or(Value::Nil);
    let path = seq::seq_to_vec(ctx, args[1])?;
    let mut acc = args[0];
    for key in path {
        match lookup_opt(ctx, acc, key)? {
            Some(v) => acc = v,
            None => return Ok(default),
        }
    }
    Ok(acc)
}

pub(crate) fn builtin_assoc(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_at_least("assoc", args, 3)?;
    if args.len() % 2 != 1 {
        return Err(CoreError::new(
            crate::exception::ErrorKind::ArityError,
            "assoc: requires a collection and an even number of key/value arguments",
        ));
    }
    let mut coll = args[0];
    for pair in args[1..].chunks_exact(2) {
        coll = assoc_one(ctx, coll, pair[0], pair[1])?;
    }
    Ok(coll)
}

fn assoc_one(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    coll: Value,
    key: Value,
    value: Value,
) -> RunResult<Value> {
    match coll {
        Value::Nil => {
            let map = PersistentMap::new().assoc(key, value, ctx.heap, ctx.interns)?;
            ctx.heap.alloc_value(HeapData::Map(map))
        }
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Map(m) => {
                let updated = m.assoc(key, value, ctx.heap, ctx.interns)?;
                ctx.heap.alloc_value(HeapData::Map(updated))
            }
            HeapData::Vector(v) => {
                let index = as_int("assoc", key, ctx.heap)?;
                let count = v.count();
                let at = usize::try_from(index)
                    .ok()
                    .filter(|&i| i <= count)
                    .ok_or_else(|| CoreError::index_out_of_bounds(index, count))?;
                let updated = v.assoc(at, value);
                ctx.heap.alloc_value(HeapData::Vector(updated))
            }
            _ => Err(CoreError::wrong_type(
                "assoc",
                "a map, vector, or nil",
                coll.clj_type(ctx.heap),
            )),
        },
        _ => Err(CoreError::wrong_type(
            "assoc",
            "a map, vector, or nil",
            coll.clj_type(ctx.heap),
        )),
    }
}

pub(crate) fn builtin_dissoc(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_at_least("dissoc", args, 1)?;
    if matches!(args[0], Value::Nil) {
        return Ok(Value::Nil);
    }
    let mut current = args[0];
    for &key in &args[1..] {
        let Value::Ref(id) = current else {
            return Err(CoreError::wrong_type("dissoc", "a map", current.clj_type(ctx.heap)));
        };
        let HeapData::Map(m) = ctx.heap.get(id) else {
            return Err(CoreError::wrong_type("dissoc", "a map", current.clj_type(ctx.heap)));
        };
        let updated = m.dissoc(&key, ctx.heap, ctx.interns)?;
        current = ctx.heap.alloc_value(HeapData::Map(updated))?;
    }
    Ok(current)
}

pub(crate) fn builtin_disj(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_at_least("disj", args, 1)?;
    if matches!(args[0], Value::Nil) {
        return Ok(Value::Nil);
    }
    let mut current = args[0];
    for &item in &args[1..] {
        let Value::Ref(id) = current else {
            return Err(CoreError::wrong_type("disj", "a set", current.clj_type(ctx.heap)));
        };
        let HeapData::Set(s) = ctx.heap.get(id) else {
            return Err(CoreError::wrong_type("disj", "a set", current.clj_type(ctx.heap)));
        };
        let updated = s.disj(&item, ctx.heap, ctx.interns)?;
        current = ctx.heap.alloc_value(HeapData::Set(updated))?;
    }
    Ok(current)
}

pub(crate) fn builtin_contains(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("contains?", args, 2)?;
    let (coll, key) = (args[0], args[1]);
    match coll {
        Value::Nil => Ok(Value::Bool(false)),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Map(m) => Ok(Value::Bool(m.index_of(&key, ctx.heap, ctx.interns)?.is_some())),
            HeapData::Set(s) => Ok(Value::Bool(s.index_of(&key, ctx.heap, ctx.interns)?.is_some())),
            HeapData::Vector(v) => Ok(Value::Bool(matches!(
                key,
                Value::Int(i) if i >= 0 && (i as u64) < v.count() as u64
            ))),
            HeapData::Str(s) => Ok(Value::Bool(matches!(
                key,
                Value::Int(i) if i >= 0 && (i as u64) < s.chars().count() as u64
            ))),
            _ => Err(CoreError::wrong_type(
                "contains?",
                "an associative collection",
                coll.clj_type(ctx.heap),
            )),
        },
        _ => Err(CoreError::wrong_type(
            "contains?",
            "an associative collection",
            coll.clj_type(ctx.heap),
        )),
    }
}

pub(crate) fn builtin_count(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("count", args, 1)?;
    if matches!(args[0], Value::Nil) {
        return Ok(Value::Int(0));
    }
    if let Value::Ref(id) = args[0]
        && let HeapData::Str(s) = ctx.heap.get(id)
    {
        return Ok(Value::Int(s.chars().count() as i64));
    }
    if let Some(count) = args[0].clj_count(ctx.heap) {
        return Ok(Value::Int(count as i64));
    }
    if seq::is_seqable(args[0], ctx.heap) {
        // Uncounted chain or lazy-seq: walk it.
        let items = seq::seq_to_vec(ctx, args[0])?;
        return Ok(Value::Int(items.len() as i64));
    }
    Err(CoreError::wrong_type(
        "count",
        "a countable collection",
        args[0].clj_type(ctx.heap),
    ))
}

pub(crate) fn builtin_empty(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("empty", args, 1)?;
    match args[0] {
        Value::EmptyList => Ok(Value::EmptyList),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::List(_) | HeapData::LazySeq(_) => Ok(Value::EmptyList),
            HeapData::Vector(_) => seq::empty_vector(ctx),
            HeapData::Map(m) => {
                let empty = if m.is_sorted() {
                    PersistentMap::new_sorted()
                } else {
                    PersistentMap::new()
                };
                ctx.heap.alloc_value(HeapData::Map(empty))
            }
            HeapData::Set(s) => {
                let empty = if s.is_sorted() {
                    PersistentSet::new_sorted()
                } else {
                    PersistentSet::new()
                };
                ctx.heap.alloc_value(HeapData::Set(empty))
            }
            _ => Ok(Value::Nil),
        },
        _ => Ok(Value::Nil),
    }
}

pub(crate) fn builtin_seq(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("seq", args, 1)?;
    let s = seq::seq(ctx, args[0])?;
    match s {
        Value::Nil => Ok(Value::Nil),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::List(_) => Ok(s),
            // Vector and string views become explicit seqs.
            HeapData::Vector(_) | HeapData::Str(_) => {
                let items = seq::seq_to_vec(ctx, s)?;
                ctx.heap.alloc_list(&items)
            }
            _ => Ok(s),
        },
        _ => Ok(s),
    }
}

pub(crate) fn builtin_keys(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("keys", args, 1)?;
    map_projection(ctx, args[0], "keys", |entry| entry.key)
}

pub(crate) fn builtin_vals(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("vals", args, 1)?;
    map_projection(ctx, args[0], "vals", |entry| entry.value)
}

fn map_projection(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    coll: Value,
    name: &str,
    project: impl Fn(&MapEntry) -> Value,
) -> RunResult<Value> {
    match coll {
        Value::Nil => Ok(Value::Nil),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Map(m) => {
                let items: Vec<Value> = m.entries().iter().map(project).collect();
                if items.is_empty() {
                    return Ok(Value::Nil);
                }
                ctx.heap.alloc_list(&items)
            }
            _ => Err(CoreError::wrong_type(name, "a map", coll.clj_type(ctx.heap))),
        },
        _ => Err(CoreError::wrong_type(name, "a map", coll.clj_type(ctx.heap))),
    }
}

pub(crate) fn builtin_peek(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("peek", args, 1)?;
    match args[0] {
        Value::Nil | Value::EmptyList => Ok(Value::Nil),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Vector(v) => Ok(v.peek().unwrap_or(Value::Nil)),
            HeapData::List(node) => Ok(node.first),
            _ => Err(CoreError::wrong_type(
                "peek",
                "a vector or list",
                args[0].clj_type(ctx.heap),
            )),
        },
        _ => Err(CoreError::wrong_type(
            "peek",
            "a vector or list",
            args[0].clj_type(ctx.heap),
        )),
    }
}

pub(crate) fn builtin_pop(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("pop", args, 1)?;
    match args[0] {
        Value::EmptyList => Err(CoreError::empty("pop")),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Vector(v) => {
                if v.is_empty() {
                    return Err(CoreError::empty("pop"));
                }
                let popped = v.pop();
                ctx.heap.alloc_value(HeapData::Vector(popped))
            }
            HeapData::List(node) => Ok(match node.rest {
                Value::Nil => Value::EmptyList,
                rest => rest,
            }),
            _ => Err(CoreError::wrong_type(
                "pop",
                "a vector or list",
                args[0].clj_type(ctx.heap),
            )),
        },
        _ => Err(CoreError::wrong_type(
            "pop",
            "a vector or list",
            args[0].clj_type(ctx.heap),
        )),
    }
}

pub(crate) fn builtin_subvec(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_between("subvec", args, 2, 3)?;
    let Value::Ref(id) = args[0] else {
        return Err(CoreError::wrong_type("subvec", "a vector", args[0].clj_type(ctx.heap)));
    };
    let HeapData::Vector(v) = ctx.heap.get(id) else {
        return Err(CoreError::wrong_type("subvec", "a vector", args[0].clj_type(ctx.heap)));
    };
    let count = v.count();
    let start = as_int("subvec", args[1], ctx.heap)?;
    let end = match args.get(2) {
        Some(&e) => as_int("subvec", e, ctx.heap)?,
        None => count as i64,
    };
    let start_usize =
        usize::try_from(start).map_err(|_| CoreError::index_out_of_bounds(start, count))?;
    let end_usize = usize::try_from(end).map_err(|_| CoreError::index_out_of_bounds(end, count))?;
    if start_usize > end_usize || end_usize > count {
        return Err(CoreError::index_error(format!(
            "subvec: invalid range [{start}, {end}) for count {count}"
        )));
    }
    let slice = v.subvec(start_usize, end_usize);
    ctx.heap.alloc_value(HeapData::Vector(slice))
}

pub(crate) fn builtin_into(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("into", args, 2)?;
    let items = seq::seq_to_vec(ctx, args[1])?;
    let mut coll = args[0];
    for item in items {
        coll = conj_one(ctx, coll, item)?;
    }
    Ok(coll)
}

pub(crate) fn builtin_reverse(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("reverse", args, 1)?;
    let mut items = seq::seq_to_vec(ctx, args[0])?;
    items.reverse();
    ctx.heap.alloc_list(&items)
}
