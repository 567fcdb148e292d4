//! Comparison built-ins and language-level equality.
//!
//! `=` is structural equality that additionally compares sequential
//! collections (lists, vectors, realised lazy-seqs) across kinds; `==` is
//! numeric equality with coercion; `< <= > >=` are chained variadic
//! numeric comparisons.

use std::cmp::Ordering;

use crate::{
    args::{as_int, as_num, check_at_least, check_exact, Num},
    exception::RunResult,
    heap::HeapData,
    host::Ctx,
    resource::ResourceTracker,
    seq::seq_to_vec,
    types::CljTrait,
    value::Value,
};

/// Whether a value is a sequential collection for `=` purposes.
fn is_sequential(v: Value, ctx: &Ctx<'_, impl ResourceTracker>) -> bool {
    match v {
        Value::EmptyList => true,
        Value::Ref(id) => matches!(
            ctx.heap.get(id),
            HeapData::List(_) | HeapData::Vector(_) | HeapData::LazySeq(_)
        ),
        _ => false,
    }
}

/// Language-level equality (`=`).
///
/// Sequential collections compare element-wise across kinds, realising
/// lazy-seqs; maps and sets compare as their entry sets with `=` on keys
/// and values; everything else falls back to structural `eql`, so a long
/// is never `=` to a double.
pub(crate) fn values_equal(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    a: Value,
    b: Value,
) -> RunResult<bool> {
    if is_sequential(a, ctx) && is_sequential(b, ctx) {
        let left = seq_to_vec(ctx, a)?;
        let right = seq_to_vec(ctx, b)?;
        if left.len() != right.len() {
            return Ok(false);
        }
        for (x, y) in left.into_iter().zip(right) {
            if !values_equal(ctx, x, y)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }
    if let (Value::Ref(ia), Value::Ref(ib)) = (a, b) {
        match (ctx.heap.get(ia), ctx.heap.get(ib)) {
            (HeapData::Map(ma), HeapData::Map(mb)) => {
                let left: Vec<(Value, Value)> = ma.entries().iter().map(|e| (e.key, e.value)).collect();
                let right: Vec<(Value, Value)> = mb.entries().iter().map(|e| (e.key, e.value)).collect();
                if left.len() != right.len() {
                    return Ok(false);
                }
                'outer: for (k, v) in left {
                    for &(ok, ov) in &right {
                        if values_equal(ctx, k, ok)? {
                            if values_equal(ctx, v, ov)? {
                                continue 'outer;
                            }
                            return Ok(false);
                        }
                    }
                    return Ok(false);
                }
                return Ok(true);
            }
            (HeapData::Set(sa), HeapData::Set(sb)) => {
                let left = sa.items().to_vec();
                let right = sb.items().to_vec();
                if left.len() != right.len() {
                    return Ok(false);
                }
                'elems: for x in left {
                    for &y in &right {
                        if values_equal(ctx, x, y)? {
                            continue 'elems;
                        }
                    }
                    return Ok(false);
                }
                return Ok(true);
            }
            _ => {}
        }
    }
    Ok(a.clj_eql(&b, ctx.heap, ctx.interns))
}

pub(crate) fn builtin_eq(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_at_least("=", args, 1)?;
    for pair in args.windows(2) {
        if !values_equal(ctx, pair[0], pair[1])? {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

pub(crate) fn builtin_not_eq(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_at_least("not=", args, 1)?;
    let all_equal = builtin_eq(ctx, args)?;
    Ok(Value::Bool(!all_equal.is_truthy()))
}

pub(crate) fn builtin_num_eq(
    _ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_at_least("==", args, 1)?;
    for pair in args.windows(2) {
        if !pair[0].numeric_eq(&pair[1]) {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// Chained variadic numeric comparison: holds iff it holds for every
/// adjacent pair.
fn chained(
    name: &str,
    ctx: &Ctx<'_, impl ResourceTracker>,
    args: &[Value],
    accept: impl Fn(Ordering) -> bool,
) -> RunResult<Value> {
    check_at_least(name, args, 1)?;
    let mut prev = as_num(name, args[0], ctx.heap)?;
    for &arg in &args[1..] {
        let next = as_num(name, arg, ctx.heap)?;
        let ordering = match (prev, next) {
            (Num::Int(a), Num::Int(b)) => a.cmp(&b),
            (a, b) => match a.as_f64().partial_cmp(&b.as_f64()) {
                Some(ordering) => ordering,
                // NaN compares false against everything.
                None => return Ok(Value::Bool(false)),
            },
        };
        if !accept(ordering) {
            return Ok(Value::Bool(false));
        }
        prev = next;
    }
    Ok(Value::Bool(true))
}

pub(crate) fn builtin_lt(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    chained("<", ctx, args, |o| o == Ordering::Less)
}

pub(crate) fn builtin_le(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    chained("<=", ctx, args, |o| o != Ordering::Greater)
}

pub(crate) fn builtin_gt(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    chained(">", ctx, args, |o| o == Ordering::Greater)
}

pub(crate) fn builtin_ge(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    chained(">=", ctx, args, |o| o != Ordering::Less)
}

pub(crate) fn builtin_compare(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("compare", args, 2)?;
    let ordering = args[0].compare(&args[1], ctx.heap, ctx.interns)?;
    Ok(Value::Int(match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }))
}

pub(crate) fn builtin_zero(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("zero?", args, 1)?;
    Ok(Value::Bool(match as_num("zero?", args[0], ctx.heap)? {
        Num::Int(i) => i == 0,
        Num::Float(x) => x == 0.0,
    }))
}

pub(crate) fn builtin_pos(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("pos?", args, 1)?;
    Ok(Value::Bool(match as_num("pos?", args[0], ctx.heap)? {
        Num::Int(i) => i > 0,
        Num::Float(x) => x > 0.0,
    }))
}

pub(crate) fn builtin_neg(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("neg?", args, 1)?;
    Ok(Value::Bool(match as_num("neg?", args[0], ctx.heap)? {
        Num::Int(i) => i < 0,
        Num::Float(x) => x < 0.0,
    }))
}

pub(crate) fn builtin_even(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("even?", args, 1)?;
    Ok(Value::Bool(as_int("even?", args[0], ctx.heap)? % 2 == 0))
}

pub(crate) fn builtin_odd(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("odd?", args, 1)?;
    Ok(Value::Bool(as_int("odd?", args[0], ctx.heap)? % 2 != 0))
}
