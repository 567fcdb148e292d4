//! Function combinators: `apply`, `partial`, `comp`.

use crate::{
    args::check_at_least,
    builtins::call_value,
    exception::RunResult,
    heap::HeapData,
    host::Ctx,
    resource::ResourceTracker,
    seq::seq_to_vec,
    types::{Comp, Partial},
    value::Value,
};

pub(crate) fn builtin_apply(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_at_least("apply", args, 2)?;
    let f = args[0];
    let mut call_args: Vec<Value> = args[1..args.len() - 1].to_vec();
    let spread = seq_to_vec(ctx, args[args.len() - 1])?;
    call_args.extend(spread);
    call_value(ctx, f, &call_args)
}

pub(crate) fn builtin_partial(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_at_least("partial", args, 1)?;
    if args.len() == 1 {
        return Ok(args[0]);
    }
    ctx.heap.alloc_value(HeapData::Partial(Partial {
        target: args[0],
        args: args[1..].to_vec(),
    }))
}

pub(crate) fn builtin_comp(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    if args.len() == 1 {
        return Ok(args[0]);
    }
    ctx.heap.alloc_value(HeapData::Comp(Comp {
        fns: args.to_vec(),
    }))
}
