//! Host-bridged built-ins: `read-string`, `eval`, `load-string`,
//! `resolve`.
//!
//! The reader, analyser, and interpreter live outside the core; these
//! built-ins route through the `Host` trait and normalise upstream
//! failures to EvalError.

use crate::{
    args::{as_str, as_symbol, check_exact},
    exception::{CoreError, ErrorKind, RunResult},
    host::Ctx,
    resource::ResourceTracker,
    value::Value,
};

/// Wraps any non-EvalError host failure as EvalError.
fn normalize(err: CoreError) -> CoreError {
    if err.kind() == ErrorKind::EvalError {
        err
    } else {
        CoreError::eval_error(err.to_string())
    }
}

pub(crate) fn builtin_read_string(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("read-string", args, 1)?;
    let source = as_str("read-string", args[0], ctx.heap)?.to_owned();
    let form = ctx
        .host
        .read(ctx.heap, ctx.interns, &source)
        .map_err(normalize)?;
    Ok(form.unwrap_or(Value::Nil))
}

pub(crate) fn builtin_eval(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("eval", args, 1)?;
    ctx.host
        .eval(ctx.heap, ctx.interns, args[0])
        .map_err(normalize)
}

pub(crate) fn builtin_load_string(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("load-string", args, 1)?;
    let source = as_str("load-string", args[0], ctx.heap)?.to_owned();
    let forms = ctx
        .host
        .read_all(ctx.heap, ctx.interns, &source)
        .map_err(normalize)?;
    let mut result = Value::Nil;
    for form in forms {
        result = ctx
            .host
            .eval(ctx.heap, ctx.interns, form)
            .map_err(normalize)?;
    }
    Ok(result)
}

pub(crate) fn builtin_resolve(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("resolve", args, 1)?;
    let symbol = as_symbol("resolve", args[0], ctx.heap)?;
    let var = ctx
        .host
        .resolve(ctx.heap, ctx.interns, symbol)
        .map_err(normalize)?;
    Ok(var.unwrap_or(Value::Nil))
}
