//! Bit-operation built-ins over longs.
//!
//! Shift counts and bit indices are clamped to 0..63.
//! `unsigned-bit-shift-right` reinterprets the operand as u64.

use crate::{
    args::{as_int, check_exact},
    exception::RunResult,
    host::Ctx,
    resource::ResourceTracker,
    value::Value,
};

fn shift_amount(n: i64) -> u32 {
    n.clamp(0, 63) as u32
}

fn binary(
    name: &str,
    ctx: &Ctx<'_, impl ResourceTracker>,
    args: &[Value],
    op: impl Fn(i64, i64) -> i64,
) -> RunResult<Value> {
    check_exact(name, args, 2)?;
    let a = as_int(name, args[0], ctx.heap)?;
    let b = as_int(name, args[1], ctx.heap)?;
    Ok(Value::Int(op(a, b)))
}

pub(crate) fn builtin_bit_and(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    binary("bit-and", ctx, args, |a, b| a & b)
}

pub(crate) fn builtin_bit_or(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    binary("bit-or", ctx, args, |a, b| a | b)
}

pub(crate) fn builtin_bit_xor(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    binary("bit-xor", ctx, args, |a, b| a ^ b)
}

pub(crate) fn builtin_bit_not(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("bit-not", args, 1)?;
    let a = as_int("bit-not", args[0], ctx.heap)?;
    Ok(Value::Int(!a))
}

pub(crate) fn builtin_bit_and_not(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    binary("bit-and-not", ctx, args, |a, b| a & !b)
}

pub(crate) fn builtin_bit_shift_left(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    binary("bit-shift-left", ctx, args, |a, n| a.wrapping_shl(shift_amount(n)))
}

pub(crate) fn builtin_bit_shift_right(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    binary("bit-shift-right", ctx, args, |a, n| a.wrapping_shr(shift_amount(n)))
}

pub(crate) fn builtin_unsigned_bit_shift_right(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    binary("unsigned-bit-shift-right", ctx, args, |a, n| {
        ((a as u64) >> shift_amount(n)) as i64
    })
}

pub(crate) fn builtin_bit_set(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    binary("bit-set", ctx, args, |a, n| a | (1i64 << shift_amount(n)))
}

pub(crate) fn builtin_bit_clear(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    binary("bit-clear", ctx, args, |a, n| a & !(1i64 << shift_amount(n)))
}

pub(crate) fn builtin_bit_flip(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    binary("bit-flip", ctx, args, |a, n| a ^ (1i64 << shift_amount(n)))
}

pub(crate) fn builtin_bit_test(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("bit-test", args, 2)?;
    let a = as_int("bit-test", args[0], ctx.heap)?;
    let n = as_int("bit-test", args[1], ctx.heap)?;
    Ok(Value::Bool(a & (1i64 << shift_amount(n)) != 0))
}
