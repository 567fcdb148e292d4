//! Arithmetic built-ins.
//!
//! Unchecked integer ops wrap (two's complement); the primed forms raise
//! ArithmeticOverflow instead. Mixed int/float arguments promote to float
//! at the first float operand. `/` always yields a double and rejects any
//! zero divisor; `mod` floors, `rem` truncates, `quot` truncates.

use num_integer::Integer;

use crate::{
    args::{as_num, check_at_least, check_exact, Num},
    exception::{CoreError, RunResult},
    host::Ctx,
    resource::ResourceTracker,
    value::Value,
};

/// Folds variadic numeric arguments with wrapping int and plain float
/// steps.
fn fold_unchecked(
    name: &str,
    ctx: &Ctx<'_, impl ResourceTracker>,
    init: Num,
    args: &[Value],
    int_op: impl Fn(i64, i64) -> i64,
    float_op: impl Fn(f64, f64) -> f64,
) -> RunResult<Num> {
    let mut acc = init;
    for &arg in args {
        let operand = as_num(name, arg, ctx.heap)?;
        acc = match (acc, operand) {
            (Num::Int(a), Num::Int(b)) => Num::Int(int_op(a, b)),
            (a, b) => Num::Float(float_op(a.as_f64(), b.as_f64())),
        };
    }
    Ok(acc)
}

/// Folds variadic numeric arguments with checked int steps.
fn fold_checked(
    name: &str,
    ctx: &Ctx<'_, impl ResourceTracker>,
    init: Num,
    args: &[Value],
    int_op: impl Fn(i64, i64) -> Option<i64>,
    float_op: impl Fn(f64, f64) -> f64,
) -> RunResult<Num> {
    let mut acc = init;
    for &arg in args {
        let operand = as_num(name, arg, ctx.heap)?;
        acc = match (acc, operand) {
            (Num::Int(a), Num::Int(b)) => {
                Num::Int(int_op(a, b).ok_or_else(|| CoreError::overflow(name))?)
            }
            (a, b) => Num::Float(float_op(a.as_f64(), b.as_f64())),
        };
    }
    Ok(acc)
}

pub(crate) fn builtin_add(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    fold_unchecked("+", ctx, Num::Int(0), args, i64::wrapping_add, |a, b| a + b).map(Value::from)
}

pub(crate) fn builtin_sub(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_at_least("-", args, 1)?;
    let first = as_num("-", args[0], ctx.heap)?;
    if args.len() == 1 {
        // Unary minus: negate.
        return Ok(match first {
            Num::Int(i) => Value::Int(i.wrapping_neg()),
            Num::Float(x) => Value::Float(-x),
        });
    }
    fold_unchecked("-", ctx, first, &args[1..], i64::wrapping_sub, |a, b| a - b).map(Value::from)
}

pub(crate) fn builtin_mul(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    fold_unchecked("*", ctx, Num::Int(1), args, i64::wrapping_mul, |a, b| a * b).map(Value::from)
}

pub(crate) fn builtin_div(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_at_least("/", args, 1)?;
    let first = as_num("/", args[0], ctx.heap)?;
    let (mut acc, divisors) = if args.len() == 1 {
        // Unary (/ x) is 1/x.
        (1.0f64, &args[..])
    } else {
        (first.as_f64(), &args[1..])
    };
    for &arg in divisors {
        let divisor = as_num("/", arg, ctx.heap)?.as_f64();
        if divisor == 0.0 {
            return Err(CoreError::division_by_zero("/"));
        }
        acc /= divisor;
    }
    Ok(Value::Float(acc))
}

pub(crate) fn builtin_inc(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("inc", args, 1)?;
    Ok(match as_num("inc", args[0], ctx.heap)? {
        Num::Int(i) => Value::Int(i.wrapping_add(1)),
        Num::Float(x) => Value::Float(x + 1.0),
    })
}

pub(crate) fn builtin_dec(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("dec", args, 1)?;
    Ok(match as_num("dec", args[0], ctx.heap)? {
        Num::Int(i) => Value::Int(i.wrapping_sub(1)),
        Num::Float(x) => Value::Float(x - 1.0),
    })
}

/// Shared shape of `mod`/`rem`/`quot`: two numeric operands, zero divisor
/// rejected.
fn div_like(
    name: &str,
    ctx: &Ctx<'_, impl ResourceTracker>,
    args: &[Value],
    int_op: impl Fn(i64, i64) -> i64,
    float_op: impl Fn(f64, f64) -> f64,
) -> RunResult<Value> {
    check_exact(name, args, 2)?;
    let a = as_num(name, args[0], ctx.heap)?;
    let b = as_num(name, args[1], ctx.heap)?;
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => {
            if y == 0 {
                return Err(CoreError::division_by_zero(name));
            }
            Ok(Value::Int(int_op(x, y)))
        }
        (x, y) => {
            let divisor = y.as_f64();
            if divisor == 0.0 {
                return Err(CoreError::division_by_zero(name));
            }
            Ok(Value::Float(float_op(x.as_f64(), divisor)))
        }
    }
}

pub(crate) fn builtin_mod(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    // Mathematical floor semantics: the result carries the divisor's sign.
    div_like("mod", ctx, args, |x, y| x.mod_floor(&y), |x, y| {
        x - y * (x / y).floor()
    })
}

pub(crate) fn builtin_rem(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    // Truncates toward zero: the result carries the dividend's sign.
    div_like("rem", ctx, args, i64::wrapping_rem, |x, y| x % y)
}

pub(crate) fn builtin_quot(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    div_like("quot", ctx, args, i64::wrapping_div, |x, y| (x / y).trunc())
}

/// Shared implementation for `min` and `max`.
///
/// Comparison coerces int↔float, but the returned value keeps the variant
/// of the winning argument; ties keep the earlier one.
fn min_max(
    name: &str,
    ctx: &Ctx<'_, impl ResourceTracker>,
    args: &[Value],
    want_greater: bool,
) -> RunResult<Value> {
    check_at_least(name, args, 1)?;
    let mut best = as_num(name, args[0], ctx.heap)?;
    for &arg in &args[1..] {
        let candidate = as_num(name, arg, ctx.heap)?;
        let beats = match (candidate, best) {
            (Num::Int(c), Num::Int(b)) => {
                if want_greater { c > b } else { c < b }
            }
            (c, b) => {
                if want_greater {
                    c.as_f64() > b.as_f64()
                } else {
                    c.as_f64() < b.as_f64()
                }
            }
        };
        if beats {
            best = candidate;
        }
    }
    Ok(best.into())
}

pub(crate) fn builtin_min(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    min_max("min", ctx, args, false)
}

pub(crate) fn builtin_max(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    min_max("max", ctx, args, true)
}

pub(crate) fn builtin_abs(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("abs", args, 1)?;
    Ok(match as_num("abs", args[0], ctx.heap)? {
        Num::Int(i) => Value::Int(i.wrapping_abs()),
        Num::Float(x) => Value::Float(x.abs()),
    })
}

pub(crate) fn builtin_add_checked(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    fold_checked("+'", ctx, Num::Int(0), args, i64::checked_add, |a, b| a + b).map(Value::from)
}

pub(crate) fn builtin_sub_checked(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_at_least("-'", args, 1)?;
    let first = as_num("-'", args[0], ctx.heap)?;
    if args.len() == 1 {
        return Ok(match first {
            Num::Int(i) => Value::Int(i.checked_neg().ok_or_else(|| CoreError::overflow("-'"))?),
            Num::Float(x) => Value::Float(-x),
        });
    }
    fold_checked("-'", ctx, first, &args[1..], i64::checked_sub, |a, b| a - b).map(Value::from)
}

pub(crate) fn builtin_mul_checked(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    fold_checked("*'", ctx, Num::Int(1), args, i64::checked_mul, |a, b| a * b).map(Value::from)
}

pub(crate) fn builtin_inc_checked(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("inc'", args, 1)?;
    Ok(match as_num("inc'", args[0], ctx.heap)? {
        Num::Int(i) => Value::Int(i.checked_add(1).ok_or_else(|| CoreError::overflow("inc'"))?),
        Num::Float(x) => Value::Float(x + 1.0),
    })
}

pub(crate) fn builtin_dec_checked(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("dec'", args, 1)?;
    Ok(match as_num("dec'", args[0], ctx.heap)? {
        Num::Int(i) => Value::Int(i.checked_sub(1).ok_or_else(|| CoreError::overflow("dec'"))?),
        Num::Float(x) => Value::Float(x - 1.0),
    })
}
