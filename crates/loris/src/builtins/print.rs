//! Print built-ins.
//!
//! The `pr` family writes readable forms, the `print` family display
//! forms; `-str` variants build the string instead of writing it, and —
//! like `str` — force lazy-seq arguments first. The writing family never
//! forces: an unrealised lazy-seq prints as its placeholder.

use crate::{
    args::check_exact,
    exception::RunResult,
    heap::HeapData,
    host::Ctx,
    resource::ResourceTracker,
    seq::seq_to_vec,
    types::{CljTrait, PrintMode},
    value::Value,
};

fn write_values(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
    mode: PrintMode,
    newline: bool,
) -> RunResult<Value> {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            ctx.print.push(' ');
        }
        let text = arg.to_print_string(ctx.heap, ctx.interns, mode);
        ctx.print.write(text.into());
    }
    if newline {
        ctx.print.push('\n');
    }
    Ok(Value::Nil)
}

pub(crate) fn builtin_pr(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    write_values(ctx, args, PrintMode::Readable, false)
}

pub(crate) fn builtin_prn(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    write_values(ctx, args, PrintMode::Readable, true)
}

pub(crate) fn builtin_print(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    write_values(ctx, args, PrintMode::Display, false)
}

pub(crate) fn builtin_println(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    write_values(ctx, args, PrintMode::Display, true)
}

pub(crate) fn builtin_newline(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("newline", args, 0)?;
    ctx.print.push('\n');
    Ok(Value::Nil)
}

fn build_str(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
    newline: bool,
) -> RunResult<Value> {
    let mut out = String::new();
    for (i, &arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        if let Value::Ref(id) = arg
            && matches!(ctx.heap.get(id), HeapData::LazySeq(_))
        {
            seq_to_vec(ctx, arg)?;
        }
        out.push_str(&arg.to_print_string(ctx.heap, ctx.interns, PrintMode::Display));
    }
    if newline {
        out.push('\n');
    }
    ctx.heap.alloc_str(out)
}

pub(crate) fn builtin_print_str(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    build_str(ctx, args, false)
}

pub(crate) fn builtin_println_str(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    build_str(ctx, args, true)
}
