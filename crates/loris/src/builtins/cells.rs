//! Reference-cell built-ins: atoms, volatiles, delays, promises, vars,
//! and transients.
//!
//! All mutation goes through `heap.get_mut`; the single-threaded core
//! sequences side effects left-to-right, and atom CAS is
//! load-modify-store.

use crate::{
    args::{as_heap_id, check_at_least, check_exact},
    builtins::call_value,
    exception::{CoreError, RunResult},
    heap::{HeapData, HeapId},
    host::Ctx,
    resource::ResourceTracker,
    types::{
        Atom, CljTrait, Delay, DelayState, MapEntry, PersistentMap, PersistentSet,
        PersistentVector, Promise, Transient, TransientData, Type, Volatile,
    },
    value::Value,
};

pub(crate) fn builtin_atom(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("atom", args, 1)?;
    ctx.heap.alloc_value(HeapData::Atom(Atom { value: args[0] }))
}

pub(crate) fn builtin_deref(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("deref", args, 1)?;
    let Value::Ref(id) = args[0] else {
        return Err(CoreError::wrong_type(
            "deref",
            "a reference cell",
            args[0].clj_type(ctx.heap),
        ));
    };
    match ctx.heap.get(id) {
        HeapData::Atom(a) => Ok(a.value),
        HeapData::Volatile(v) => Ok(v.value),
        HeapData::Var(v) => Ok(v.root),
        HeapData::Reduced(inner) => Ok(*inner),
        HeapData::Delay(_) => force_delay(ctx, id),
        HeapData::Promise(p) => {
            if p.delivered {
                Ok(p.value)
            } else {
                // Single-threaded: nothing can ever deliver it.
                Err(CoreError::deadlock("deref of an undelivered promise"))
            }
        }
        _ => Err(CoreError::wrong_type(
            "deref",
            "a reference cell",
            args[0].clj_type(ctx.heap),
        )),
    }
}

pub(crate) fn builtin_reset(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("reset!", args, 2)?;
    let id = as_heap_id("reset!", args[0], ctx.heap, Type::Atom)?;
    let HeapData::Atom(a) = ctx.heap.get_mut(id) else {
        unreachable!("probed as atom")
    };
    a.value = args[1];
    Ok(args[1])
}

pub(crate) fn builtin_swap(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_at_least("swap!", args, 2)?;
    let id = as_heap_id("swap!", args[0], ctx.heap, Type::Atom)?;
    let HeapData::Atom(a) = ctx.heap.get(id) else {
        unreachable!("probed as atom")
    };
    let mut call_args = Vec::with_capacity(args.len() - 1);
    call_args.push(a.value);
    call_args.extend_from_slice(&args[2..]);
    let updated = call_value(ctx, args[1], &call_args)?;
    let HeapData::Atom(a) = ctx.heap.get_mut(id) else {
        unreachable!("probed as atom")
    };
    a.value = updated;
    Ok(updated)
}

pub(crate) fn builtin_compare_and_set(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("compare-and-set!", args, 3)?;
    let id = as_heap_id("compare-and-set!", args[0], ctx.heap, Type::Atom)?;
    let HeapData::Atom(a) = ctx.heap.get(id) else {
        unreachable!("probed as atom")
    };
    let current = a.value;
    if current.clj_eql(&args[1], ctx.heap, ctx.interns) {
        let HeapData::Atom(a) = ctx.heap.get_mut(id) else {
            unreachable!("probed as atom")
        };
        a.value = args[2];
        Ok(Value::Bool(true))
    } else {
        Ok(Value::Bool(false))
    }
}

pub(crate) fn builtin_volatile(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("volatile!", args, 1)?;
    ctx.heap
        .alloc_value(HeapData::Volatile(Volatile { value: args[0] }))
}

pub(crate) fn builtin_vreset(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("vreset!", args, 2)?;
    let id = as_heap_id("vreset!", args[0], ctx.heap, Type::Volatile)?;
    let HeapData::Volatile(v) = ctx.heap.get_mut(id) else {
        unreachable!("probed as volatile")
    };
    v.value = args[1];
    Ok(args[1])
}

pub(crate) fn builtin_vswap(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_at_least("vswap!", args, 2)?;
    let id = as_heap_id("vswap!", args[0], ctx.heap, Type::Volatile)?;
    let HeapData::Volatile(v) = ctx.heap.get(id) else {
        unreachable!("probed as volatile")
    };
    let mut call_args = Vec::with_capacity(args.len() - 1);
    call_args.push(v.value);
    call_args.extend_from_slice(&args[2..]);
    let updated = call_value(ctx, args[1], &call_args)?;
    let HeapData::Volatile(v) = ctx.heap.get_mut(id) else {
        unreachable!("probed as volatile")
    };
    v.value = updated;
    Ok(updated)
}

pub(crate) fn builtin_delay(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("delay", args, 1)?;
    ctx.heap.alloc_value(HeapData::Delay(Delay::new(args[0])))
}

/// Forces the delay at `id`: runs the thunk once and caches the result.
///
/// Re-entrant forcing finds the in-progress marker and raises StateError;
/// a failed thunk is restored so forcing can be retried.
fn force_delay(ctx: &mut Ctx<'_, impl ResourceTracker>, id: HeapId) -> RunResult<Value> {
    let thunk = {
        let HeapData::Delay(cell) = ctx.heap.get_mut(id) else {
            unreachable!("caller checked")
        };
        match cell.state {
            DelayState::Done(v) => return Ok(v),
            DelayState::Forcing => {
                return Err(CoreError::state_error("delay force re-entered its own thunk"));
            }
            DelayState::Pending(t) => {
                cell.state = DelayState::Forcing;
                t
            }
        }
    };
    let result = call_value(ctx, thunk, &[]);
    let state = match &result {
        Ok(v) => DelayState::Done(*v),
        Err(_) => DelayState::Pending(thunk),
    };
    if let HeapData::Delay(cell) = ctx.heap.get_mut(id) {
        cell.state = state;
    }
    result
}

pub(crate) fn builtin_force(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("force", args, 1)?;
    if let Value::Ref(id) = args[0]
        && matches!(ctx.heap.get(id), HeapData::Delay(_))
    {
        return force_delay(ctx, id);
    }
    // Anything that is not a delay forces to itself.
    Ok(args[0])
}

pub(crate) fn builtin_promise(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("promise", args, 0)?;
    ctx.heap.alloc_value(HeapData::Promise(Promise::new()))
}

pub(crate) fn builtin_deliver(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("deliver", args, 2)?;
    let id = as_heap_id("deliver", args[0], ctx.heap, Type::Promise)?;
    let HeapData::Promise(p) = ctx.heap.get_mut(id) else {
        unreachable!("probed as promise")
    };
    if p.delivered {
        // Second delivery is a silent no-op.
        return Ok(Value::Nil);
    }
    p.delivered = true;
    p.value = args[1];
    Ok(args[0])
}

pub(crate) fn builtin_var_get(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("var-get", args, 1)?;
    let id = as_heap_id("var-get", args[0], ctx.heap, Type::Var)?;
    let HeapData::Var(v) = ctx.heap.get(id) else {
        unreachable!("probed as var")
    };
    Ok(v.root)
}

pub(crate) fn builtin_var_set(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("var-set", args, 2)?;
    let id = as_heap_id("var-set", args[0], ctx.heap, Type::Var)?;
    let HeapData::Var(v) = ctx.heap.get_mut(id) else {
        unreachable!("probed as var")
    };
    v.root = args[1];
    Ok(args[1])
}

pub(crate) fn builtin_transient(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("transient", args, 1)?;
    let Value::Ref(id) = args[0] else {
        return Err(CoreError::wrong_type(
            "transient",
            "a vector, map, or set",
            args[0].clj_type(ctx.heap),
        ));
    };
    let data = match ctx.heap.get(id) {
        HeapData::Vector(v) => TransientData::Vector(v.as_slice().to_vec()),
        HeapData::Map(m) => {
            if m.is_sorted() {
                return Err(CoreError::type_error("transient: sorted maps have no transient form"));
            }
            TransientData::Map(m.entries().to_vec())
        }
        HeapData::Set(s) => {
            if s.is_sorted() {
                return Err(CoreError::type_error("transient: sorted sets have no transient form"));
            }
            TransientData::Set(s.items().to_vec())
        }
        _ => {
            return Err(CoreError::wrong_type(
                "transient",
                "a vector, map, or set",
                args[0].clj_type(ctx.heap),
            ));
        }
    };
    ctx.heap.alloc_value(HeapData::Transient(Transient::new(data)))
}

pub(crate) fn builtin_persistent(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("persistent!", args, 1)?;
    let id = as_heap_id("persistent!", args[0], ctx.heap, Type::Transient)?;
    let HeapData::Transient(t) = ctx.heap.get_mut(id) else {
        unreachable!("probed as transient")
    };
    let data = t.freeze()?;
    match data {
        TransientData::Vector(items) => {
            ctx.heap.alloc_value(HeapData::Vector(PersistentVector::new(items)))
        }
        TransientData::Map(entries) => ctx
            .heap
            .alloc_value(HeapData::Map(PersistentMap::from_entries(entries, false))),
        TransientData::Set(items) => ctx
            .heap
            .alloc_value(HeapData::Set(PersistentSet::from_items(items, false))),
    }
}

pub(crate) fn builtin_conj_bang(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("conj!", args, 2)?;
    let id = as_heap_id("conj!", args[0], ctx.heap, Type::Transient)?;
    let x = args[1];
    // Decide the mutation with shared borrows, then apply it.
    enum Op {
        Push,
        MapPut(Value, Value, Option<usize>),
        SetAdd(bool),
    }
    let op = match transient_data(ctx.heap, id)? {
        TransientData::Vector(_) => Op::Push,
        TransientData::Map(_) => {
            let (k, v) = entry_pair(ctx, x)?;
            let TransientData::Map(entries) = transient_data(ctx.heap, id)? else {
                unreachable!("matched above")
            };
            let at = entries
                .iter()
                .position(|e| e.key.clj_eql(&k, ctx.heap, ctx.interns));
            Op::MapPut(k, v, at)
        }
        TransientData::Set(items) => {
            let present = items
                .iter()
                .any(|item| item.clj_eql(&x, ctx.heap, ctx.interns));
            Op::SetAdd(present)
        }
    };
    let HeapData::Transient(t) = ctx.heap.get_mut(id) else {
        unreachable!("probed as transient")
    };
    match (op, t.data_mut()?) {
        (Op::Push, TransientData::Vector(items)) => items.push(x),
        (Op::MapPut(k, v, Some(at)), TransientData::Map(entries)) => {
            entries[at] = MapEntry { key: k, value: v };
        }
        (Op::MapPut(k, v, None), TransientData::Map(entries)) => {
            entries.push(MapEntry { key: k, value: v });
        }
        (Op::SetAdd(false), TransientData::Set(items)) => items.push(x),
        (Op::SetAdd(true), TransientData::Set(_)) => {}
        _ => unreachable!("op decided against the same data kind"),
    }
    Ok(args[0])
}

/// The live builder data of the transient at `id`.
fn transient_data(
    heap: &crate::heap::Heap<impl ResourceTracker>,
    id: HeapId,
) -> RunResult<&TransientData> {
    let HeapData::Transient(t) = heap.get(id) else {
        unreachable!("probed as transient")
    };
    t.data()
}

/// Reads a `[k v]` entry vector for transient map conj.
fn entry_pair(
    ctx: &Ctx<'_, impl ResourceTracker>,
    x: Value,
) -> RunResult<(Value, Value)> {
    if let Value::Ref(id) = x
        && let HeapData::Vector(pair) = ctx.heap.get(id)
        && pair.count() == 2
    {
        return Ok((pair.get(0).expect("len 2"), pair.get(1).expect("len 2")));
    }
    Err(CoreError::type_error("conj! on a transient map takes a [k v] entry"))
}

pub(crate) fn builtin_assoc_bang(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("assoc!", args, 3)?;
    let id = as_heap_id("assoc!", args[0], ctx.heap, Type::Transient)?;
    let (key, value) = (args[1], args[2]);
    enum Op {
        VecSet(usize),
        MapPut(Option<usize>),
    }
    let op = {
        let HeapData::Transient(t) = ctx.heap.get(id) else {
            unreachable!("probed as transient")
        };
        match t.data()? {
            TransientData::Vector(items) => {
                let index = crate::args::as_int("assoc!", key, ctx.heap)?;
                let at = usize::try_from(index)
                    .ok()
                    .filter(|&i| i <= items.len())
                    .ok_or_else(|| CoreError::index_out_of_bounds(index, items.len()))?;
                Op::VecSet(at)
            }
            TransientData::Map(entries) => Op::MapPut(
                entries
                    .iter()
                    .position(|e| e.key.clj_eql(&key, ctx.heap, ctx.interns)),
            ),
            TransientData::Set(_) => {
                return Err(CoreError::type_error("assoc! is not supported on a transient set"));
            }
        }
    };
    let HeapData::Transient(t) = ctx.heap.get_mut(id) else {
        unreachable!("probed as transient")
    };
    match (op, t.data_mut()?) {
        (Op::VecSet(at), TransientData::Vector(items)) => {
            if at == items.len() {
                items.push(value);
            } else {
                items[at] = value;
            }
        }
        (Op::MapPut(Some(at)), TransientData::Map(entries)) => entries[at].value = value,
        (Op::MapPut(None), TransientData::Map(entries)) => {
            entries.push(MapEntry { key, value });
        }
        _ => unreachable!("op decided against the same data kind"),
    }
    Ok(args[0])
}

pub(crate) fn builtin_dissoc_bang(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("dissoc!", args, 2)?;
    let id = as_heap_id("dissoc!", args[0], ctx.heap, Type::Transient)?;
    let key = args[1];
    let at = {
        let HeapData::Transient(t) = ctx.heap.get(id) else {
            unreachable!("probed as transient")
        };
        match t.data()? {
            TransientData::Map(entries) => entries
                .iter()
                .position(|e| e.key.clj_eql(&key, ctx.heap, ctx.interns)),
            _ => return Err(CoreError::type_error("dissoc! requires a transient map")),
        }
    };
    if let Some(at) = at {
        let HeapData::Transient(t) = ctx.heap.get_mut(id) else {
            unreachable!("probed as transient")
        };
        let TransientData::Map(entries) = t.data_mut()? else {
            unreachable!("matched above")
        };
        entries.remove(at);
    }
    Ok(args[0])
}

pub(crate) fn builtin_disj_bang(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("disj!", args, 2)?;
    let id = as_heap_id("disj!", args[0], ctx.heap, Type::Transient)?;
    let item = args[1];
    let at = {
        let HeapData::Transient(t) = ctx.heap.get(id) else {
            unreachable!("probed as transient")
        };
        match t.data()? {
            TransientData::Set(items) => items
                .iter()
                .position(|x| x.clj_eql(&item, ctx.heap, ctx.interns)),
            _ => return Err(CoreError::type_error("disj! requires a transient set")),
        }
    };
    if let Some(at) = at {
        let HeapData::Transient(t) = ctx.heap.get_mut(id) else {
            unreachable!("probed as transient")
        };
        let TransientData::Set(items) = t.data_mut()? else {
            unreachable!("matched above")
        };
        items.remove(at);
    }
    Ok(args[0])
}
