//! Protocol built-ins: named method-signature sets dispatched on the
//! type tag of the first argument.

use crate::{
    args::{as_heap_id, as_keyword, check_at_least, check_exact},
    builtins::call_value,
    exception::{CoreError, RunResult},
    heap::{HeapData, HeapId},
    host::Ctx,
    resource::ResourceTracker,
    types::{CljTrait, Protocol, ProtocolFn, Type},
    value::Value,
};

/// A symbol-ish argument: symbol, keyword, or string.
fn as_name(
    name: &str,
    v: Value,
    ctx: &mut Ctx<'_, impl ResourceTracker>,
) -> RunResult<crate::intern::SymbolId> {
    match v {
        Value::Symbol(id) => Ok(id),
        Value::Keyword(id) => {
            let (ns, n) = ctx.interns.keyword_parts(id);
            let (ns, n) = (ns.map(str::to_owned), n.to_owned());
            Ok(ctx.interns.symbol(ns.as_deref(), &n))
        }
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Str(s) => {
                let spelling = s.clone();
                Ok(ctx.interns.symbol_from_str(&spelling))
            }
            _ => Err(CoreError::wrong_type(name, "a name", v.clj_type(ctx.heap))),
        },
        _ => Err(CoreError::wrong_type(name, "a name", v.clj_type(ctx.heap))),
    }
}

pub(crate) fn builtin_protocol(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_at_least("protocol", args, 1)?;
    let name = as_name("protocol", args[0], ctx)?;
    let mut methods = Vec::with_capacity(args.len() - 1);
    for &m in &args[1..] {
        methods.push(as_name("protocol", m, ctx)?);
    }
    ctx.heap
        .alloc_value(HeapData::Protocol(Protocol { name, methods }))
}

pub(crate) fn builtin_protocol_fn(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("protocol-fn", args, 2)?;
    let proto_id = as_heap_id("protocol-fn", args[0], ctx.heap, Type::Protocol)?;
    let method = as_name("protocol-fn", args[1], ctx)?;
    let HeapData::Protocol(proto) = ctx.heap.get(proto_id) else {
        unreachable!("probed as protocol")
    };
    if !proto.methods.contains(&method) {
        let (_, method_name) = ctx.interns.symbol_parts(method);
        let (_, proto_name) = ctx.interns.symbol_parts(proto.name);
        return Err(CoreError::type_error(format!(
            "protocol {proto_name} declares no method {method_name}"
        )));
    }
    ctx.heap.alloc_value(HeapData::ProtocolFn(ProtocolFn {
        name: method,
        protocol: proto_id,
        impls: Vec::new(),
    }))
}

pub(crate) fn builtin_extend_type(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("extend-type!", args, 3)?;
    let pfn_id = as_heap_id("extend-type!", args[0], ctx.heap, Type::ProtocolFn)?;
    let tag_kw = as_keyword("extend-type!", args[1], ctx.heap)?;
    let (ns, tag_name) = ctx.interns.keyword_parts(tag_kw);
    if ns.is_some() {
        return Err(CoreError::type_error(
            "extend-type!: type tag must be an unqualified keyword",
        ));
    }
    let tag: Type = tag_name
        .parse()
        .map_err(|_| CoreError::type_error(format!("extend-type!: unknown type tag :{tag_name}")))?;
    let HeapData::ProtocolFn(pfn) = ctx.heap.get_mut(pfn_id) else {
        unreachable!("probed as protocol-fn")
    };
    pfn.extend(tag, args[2]);
    Ok(args[0])
}

/// Invokes the protocol-fn at `id`: dispatch on the type tag of the
/// first argument.
pub(crate) fn dispatch_call(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    id: HeapId,
    args: &[Value],
) -> RunResult<Value> {
    let Some(&receiver) = args.first() else {
        let HeapData::ProtocolFn(pfn) = ctx.heap.get(id) else {
            unreachable!("caller matched a protocol-fn")
        };
        let (_, name) = ctx.interns.symbol_parts(pfn.name);
        return Err(CoreError::arity_at_least(name, 1, 0));
    };
    let tag = receiver.clj_type(ctx.heap);
    let HeapData::ProtocolFn(pfn) = ctx.heap.get(id) else {
        unreachable!("caller matched a protocol-fn")
    };
    match pfn.find_impl(tag) {
        Some(implementation) => call_value(ctx, implementation, args),
        None => {
            let (_, name) = ctx.interns.symbol_parts(pfn.name);
            Err(CoreError::new(
                crate::exception::ErrorKind::NoMethodError,
                format!("no implementation of {name} for type {tag}"),
            ))
        }
    }
}
