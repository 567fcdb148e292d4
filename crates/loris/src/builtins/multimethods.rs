//! Multimethod and hierarchy built-ins.
//!
//! Dispatch: compute the dispatch value, try an exact method, then
//! collect `isa?` candidates against the multi-fn's hierarchy (or the
//! global one). One candidate wins outright; several resolve through the
//! prefer table and `isa?` dominance; an unresolved tie is an
//! AmbiguousDispatchError, and no candidate falls back to the default
//! method or NoMethodError.

use crate::{
    args::{check_between, check_exact},
    builtins::call_value,
    exception::{CoreError, RunResult},
    heap::{HeapData, HeapId},
    hierarchy,
    host::Ctx,
    resource::ResourceTracker,
    types::{
        multi_fn::{prefers_over, table_position},
        CljTrait, MapEntry, MultiFn, PersistentMap, PersistentSet, PrintMode,
    },
    value::Value,
};

/// Reads a cloned snapshot of the multi-fn cell at `id`.
fn multi_snapshot(
    ctx: &Ctx<'_, impl ResourceTracker>,
    name: &str,
    v: Value,
) -> RunResult<(HeapId, MultiFn)> {
    if let Value::Ref(id) = v
        && let HeapData::MultiFn(mf) = ctx.heap.get(id)
    {
        return Ok((id, mf.clone()));
    }
    Err(CoreError::wrong_type(name, "a multi-fn", v.clj_type(ctx.heap)))
}

/// Writes an edited snapshot back into the cell.
fn multi_store(ctx: &mut Ctx<'_, impl ResourceTracker>, id: HeapId, mf: MultiFn) {
    let HeapData::MultiFn(cell) = ctx.heap.get_mut(id) else {
        unreachable!("snapshot came from a multi-fn cell")
    };
    *cell = mf;
}

/// Invokes the multi-fn at `id` with `args`.
pub(crate) fn dispatch_call(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    id: HeapId,
    args: &[Value],
) -> RunResult<Value> {
    let dispatch_fn = {
        let HeapData::MultiFn(mf) = ctx.heap.get(id) else {
            unreachable!("caller matched a multi-fn")
        };
        mf.dispatch_fn
    };
    let dispatch_value = call_value(ctx, dispatch_fn, args)?;

    let (_, mf) = multi_snapshot(ctx, "multi-fn", Value::Ref(id))?;
    if let Some(method) = mf.find_method(&dispatch_value, ctx.heap, ctx.interns) {
        return call_value(ctx, method, args);
    }

    let h = match mf.hierarchy {
        Some(h) => Some(h),
        None => ctx.hierarchy.get(),
    };
    let mut candidates: Vec<(Value, Value)> = Vec::new();
    for (key, method) in &mf.methods {
        if hierarchy::isa(h, &dispatch_value, key, ctx.heap, ctx.interns)? {
            candidates.push((*key, *method));
        }
    }

    let name = ctx.interns.symbol_parts(mf.name).1.to_owned();
    match candidates.len() {
        0 => match mf.default_method {
            Some(method) => call_value(ctx, method, args),
            None => Err(CoreError::no_method(
                &name,
                &dispatch_value.to_print_string(ctx.heap, ctx.interns, PrintMode::Readable),
            )),
        },
        1 => call_value(ctx, candidates[0].1, args),
        _ => {
            let winner = resolve_preferred(ctx, &mf, h, &candidates)?;
            match winner {
                Some(method) => call_value(ctx, method, args),
                None => Err(CoreError::ambiguous_dispatch(
                    &name,
                    &candidates[0].0.to_print_string(ctx.heap, ctx.interns, PrintMode::Readable),
                    &candidates[1].0.to_print_string(ctx.heap, ctx.interns, PrintMode::Readable),
                )),
            }
        }
    }
}

/// The uniquely dominant candidate, if one exists.
///
/// `a` dominates `b` when the prefer table says so (transitively) or
/// when `isa?(a, b)` holds, which makes the more specific dispatch value
/// win without an explicit preference.
fn resolve_preferred(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    mf: &MultiFn,
    h: Option<Value>,
    candidates: &[(Value, Value)],
) -> RunResult<Option<Value>> {
    'outer: for (i, (key, method)) in candidates.iter().enumerate() {
        for (j, (other, _)) in candidates.iter().enumerate() {
            if i == j {
                continue;
            }
            let preferred = prefers_over(&mf.prefers, key, other, ctx.heap, ctx.interns)
                || hierarchy::isa(h, key, other, ctx.heap, ctx.interns)?;
            if !preferred {
                continue 'outer;
            }
        }
        return Ok(Some(*method));
    }
    Ok(None)
}

/// The multi-fn name argument: a symbol or a string.
fn name_symbol(
    name: &str,
    v: Value,
    ctx: &mut Ctx<'_, impl ResourceTracker>,
) -> RunResult<crate::intern::SymbolId> {
    match v {
        Value::Symbol(id) => Ok(id),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Str(s) => {
                let spelling = s.clone();
                Ok(ctx.interns.symbol_from_str(&spelling))
            }
            _ => Err(CoreError::wrong_type(name, "a symbol or string", v.clj_type(ctx.heap))),
        },
        _ => Err(CoreError::wrong_type(name, "a symbol or string", v.clj_type(ctx.heap))),
    }
}

pub(crate) fn builtin_multi_fn(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_between("multi-fn", args, 2, 3)?;
    let name = name_symbol("multi-fn", args[0], ctx)?;
    let hierarchy = match args.get(2) {
        Some(&h) => {
            if !matches!(h, Value::Ref(id) if matches!(ctx.heap.get(id), HeapData::Map(_))) {
                return Err(CoreError::wrong_type(
                    "multi-fn",
                    "a hierarchy map",
                    h.clj_type(ctx.heap),
                ));
            }
            Some(h)
        }
        None => None,
    };
    ctx.heap
        .alloc_value(HeapData::MultiFn(MultiFn::new(name, args[1], hierarchy)))
}

pub(crate) fn builtin_add_method(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("add-method", args, 3)?;
    let (id, mut mf) = multi_snapshot(ctx, "add-method", args[0])?;
    let dispatch_value = args[1];
    let method = args[2];
    match table_position(&mf.methods, &dispatch_value, ctx.heap, ctx.interns) {
        Some(at) => mf.methods[at].1 = method,
        None => mf.methods.push((dispatch_value, method)),
    }
    multi_store(ctx, id, mf);
    Ok(args[0])
}

pub(crate) fn builtin_remove_method(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("remove-method", args, 2)?;
    let (id, mut mf) = multi_snapshot(ctx, "remove-method", args[0])?;
    if let Some(at) = table_position(&mf.methods, &args[1], ctx.heap, ctx.interns) {
        mf.methods.remove(at);
    }
    multi_store(ctx, id, mf);
    Ok(args[0])
}

pub(crate) fn builtin_remove_all_methods(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("remove-all-methods", args, 1)?;
    let (id, mut mf) = multi_snapshot(ctx, "remove-all-methods", args[0])?;
    mf.methods.clear();
    mf.default_method = None;
    multi_store(ctx, id, mf);
    Ok(args[0])
}

pub(crate) fn builtin_prefer_method(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("prefer-method", args, 3)?;
    let (id, mut mf) = multi_snapshot(ctx, "prefer-method", args[0])?;
    let (preferred, over) = (args[1], args[2]);
    if prefers_over(&mf.prefers, &over, &preferred, ctx.heap, ctx.interns) {
        return Err(CoreError::state_error(format!(
            "preference conflict: {} is already preferred to {}",
            over.to_print_string(ctx.heap, ctx.interns, PrintMode::Readable),
            preferred.to_print_string(ctx.heap, ctx.interns, PrintMode::Readable),
        )));
    }
    match table_position(&mf.prefers, &preferred, ctx.heap, ctx.interns) {
        Some(at) => {
            if !mf.prefers[at].1.iter().any(|v| v.clj_eql(&over, ctx.heap, ctx.interns)) {
                mf.prefers[at].1.push(over);
            }
        }
        None => mf.prefers.push((preferred, vec![over])),
    }
    multi_store(ctx, id, mf);
    Ok(args[0])
}

pub(crate) fn builtin_prefers(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("prefers", args, 1)?;
    let (_, mf) = multi_snapshot(ctx, "prefers", args[0])?;
    let mut entries = Vec::with_capacity(mf.prefers.len());
    for (preferred, beaten) in mf.prefers {
        let set = ctx
            .heap
            .alloc_value(HeapData::Set(PersistentSet::from_items(beaten, false)))?;
        entries.push(MapEntry {
            key: preferred,
            value: set,
        });
    }
    ctx.heap
        .alloc_value(HeapData::Map(PersistentMap::from_entries(entries, false)))
}

pub(crate) fn builtin_methods(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("methods", args, 1)?;
    let (_, mf) = multi_snapshot(ctx, "methods", args[0])?;
    let entries = mf
        .methods
        .into_iter()
        .map(|(key, value)| MapEntry { key, value })
        .collect();
    ctx.heap
        .alloc_value(HeapData::Map(PersistentMap::from_entries(entries, false)))
}

pub(crate) fn builtin_get_method(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("get-method", args, 2)?;
    let (_, mf) = multi_snapshot(ctx, "get-method", args[0])?;
    let dispatch_value = args[1];
    if let Some(method) = mf.find_method(&dispatch_value, ctx.heap, ctx.interns) {
        return Ok(method);
    }
    let h = match mf.hierarchy {
        Some(h) => Some(h),
        None => ctx.hierarchy.get(),
    };
    let mut candidates: Vec<(Value, Value)> = Vec::new();
    for (key, method) in &mf.methods {
        if hierarchy::isa(h, &dispatch_value, key, ctx.heap, ctx.interns)? {
            candidates.push((*key, *method));
        }
    }
    match candidates.len() {
        0 => Ok(mf.default_method.unwrap_or(Value::Nil)),
        1 => Ok(candidates[0].1),
        _ => Ok(resolve_preferred(ctx, &mf, h, &candidates)?.unwrap_or(Value::Nil)),
    }
}

pub(crate) fn builtin_make_hierarchy(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("make-hierarchy", args, 0)?;
    hierarchy::new_hierarchy(ctx.heap, ctx.interns)
}

/// Shared argument shape of `derive`/`underive`: two values act on the
/// global hierarchy and return nil, three act on an explicit hierarchy
/// and return the new one.
fn edit_hierarchy<T: ResourceTracker>(
    name: &str,
    ctx: &mut Ctx<'_, T>,
    args: &[Value],
    edit: impl Fn(Value, &Value, &Value, &mut Ctx<'_, T>) -> RunResult<Value>,
) -> RunResult<Value> {
    check_between(name, args, 2, 3)?;
    if args.len() == 2 {
        let h = ctx.hierarchy.get_or_init(ctx.heap, ctx.interns)?;
        let updated = edit(h, &args[0], &args[1], ctx)?;
        ctx.hierarchy.set(updated);
        return Ok(Value::Nil);
    }
    edit(args[0], &args[1], &args[2], ctx)
}

pub(crate) fn builtin_derive(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    edit_hierarchy("derive", ctx, args, |h, child, parent, ctx| {
        hierarchy::derive(h, child, parent, ctx.heap, ctx.interns)
    })
}

pub(crate) fn builtin_underive(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    edit_hierarchy("underive", ctx, args, |h, child, parent, ctx| {
        hierarchy::underive(h, child, parent, ctx.heap, ctx.interns)
    })
}

pub(crate) fn builtin_isa(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_between("isa?", args, 2, 3)?;
    let (h, child, parent) = if args.len() == 2 {
        (ctx.hierarchy.get(), args[0], args[1])
    } else {
        (Some(args[0]), args[1], args[2])
    };
    Ok(Value::Bool(hierarchy::isa(
        h,
        &child,
        &parent,
        ctx.heap,
        ctx.interns,
    )?))
}

/// Shared argument shape of `parents`/`ancestors`/`descendants`.
fn relation_query<T: ResourceTracker>(
    name: &str,
    ctx: &mut Ctx<'_, T>,
    args: &[Value],
    query: impl Fn(Value, &Value, &crate::heap::Heap<T>, &crate::intern::Interns) -> RunResult<Vec<Value>>,
) -> RunResult<Value> {
    check_between(name, args, 1, 2)?;
    let (h, x) = if args.len() == 1 {
        match ctx.hierarchy.get() {
            Some(h) => (h, args[0]),
            None => return Ok(Value::Nil),
        }
    } else {
        (args[0], args[1])
    };
    let items = query(h, &x, ctx.heap, ctx.interns)?;
    if items.is_empty() {
        return Ok(Value::Nil);
    }
    ctx.heap
        .alloc_value(HeapData::Set(PersistentSet::from_items(items, false)))
}

pub(crate) fn builtin_parents(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    relation_query("parents", ctx, args, |h, x, heap, interns| {
        hierarchy::parents_of(h, x, heap, interns)
    })
}

pub(crate) fn builtin_ancestors(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    relation_query("ancestors", ctx, args, |h, x, heap, interns| {
        hierarchy::ancestors_of(h, x, heap, interns)
    })
}

pub(crate) fn builtin_descendants(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    relation_query("descendants", ctx, args, |h, x, heap, interns| {
        hierarchy::descendants_of(h, x, heap, interns)
    })
}

pub(crate) fn builtin_reset_global_hierarchy(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("reset-global-hierarchy!", args, 0)?;
    ctx.hierarchy.reset();
    Ok(Value::Nil)
}
