//! Type and identity predicates, plus `type`/`class`/`identity`/`not`.

use crate::{
    args::{as_keyword, check_exact},
    builtins::BuiltinFn,
    exception::{CoreError, RunResult},
    heap::HeapData,
    host::Ctx,
    resource::ResourceTracker,
    seq::{self, is_seqable},
    types::{CljTrait, Type},
    value::Value,
};

/// Whether the value is callable in function position.
fn is_ifn(v: Value, ctx: &Ctx<'_, impl ResourceTracker>) -> bool {
    match v {
        Value::Builtin(_) | Value::Keyword(_) => true,
        Value::Ref(id) => matches!(
            ctx.heap.get(id),
            HeapData::Closure(_)
                | HeapData::Partial(_)
                | HeapData::Comp(_)
                | HeapData::MultiFn(_)
                | HeapData::ProtocolFn(_)
                | HeapData::Var(_)
                | HeapData::Map(_)
                | HeapData::Set(_)
                | HeapData::Vector(_)
        ),
        _ => false,
    }
}

/// Whether the value is a function proper.
fn is_fn(v: Value, ctx: &Ctx<'_, impl ResourceTracker>) -> bool {
    match v {
        Value::Builtin(_) => true,
        Value::Ref(id) => matches!(
            ctx.heap.get(id),
            HeapData::Closure(_) | HeapData::Partial(_) | HeapData::Comp(_)
        ),
        _ => false,
    }
}

/// The single-argument type predicates, dispatched by variant.
pub(crate) fn builtin_predicate(
    which: BuiltinFn,
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact(which.name(), args, 1)?;
    let v = args[0];
    let heap_kind = |expected: fn(&HeapData) -> bool| match v {
        Value::Ref(id) => expected(ctx.heap.get(id)),
        _ => false,
    };
    let result = match which {
        BuiltinFn::NilQ => matches!(v, Value::Nil),
        BuiltinFn::SomeQ => !matches!(v, Value::Nil),
        BuiltinFn::TrueQ => matches!(v, Value::Bool(true)),
        BuiltinFn::FalseQ => matches!(v, Value::Bool(false)),
        BuiltinFn::NumberQ => matches!(v, Value::Int(_) | Value::Float(_)),
        BuiltinFn::IntQ => matches!(v, Value::Int(_)),
        BuiltinFn::FloatQ | BuiltinFn::DoubleQ => matches!(v, Value::Float(_)),
        BuiltinFn::BooleanQ => matches!(v, Value::Bool(_)),
        BuiltinFn::StringQ => heap_kind(|d| matches!(d, HeapData::Str(_))),
        BuiltinFn::CharQ => matches!(v, Value::Char(_)),
        BuiltinFn::KeywordQ => matches!(v, Value::Keyword(_)),
        BuiltinFn::SymbolQ => matches!(v, Value::Symbol(_)),
        BuiltinFn::FnQ => is_fn(v, ctx),
        BuiltinFn::IfnQ => is_ifn(v, ctx),
        BuiltinFn::CollQ => {
            matches!(v, Value::EmptyList)
                || heap_kind(|d| {
                    matches!(
                        d,
                        HeapData::List(_)
                            | HeapData::Vector(_)
                            | HeapData::Map(_)
                            | HeapData::Set(_)
                            | HeapData::LazySeq(_)
                    )
                })
        }
        BuiltinFn::ListQ => {
            matches!(v, Value::EmptyList) || heap_kind(|d| matches!(d, HeapData::List(_)))
        }
        BuiltinFn::VectorQ => heap_kind(|d| matches!(d, HeapData::Vector(_))),
        BuiltinFn::MapQ => heap_kind(|d| matches!(d, HeapData::Map(_))),
        BuiltinFn::SetQ => heap_kind(|d| matches!(d, HeapData::Set(_))),
        BuiltinFn::SeqQ => {
            matches!(v, Value::EmptyList)
                || heap_kind(|d| matches!(d, HeapData::List(_) | HeapData::LazySeq(_)))
        }
        BuiltinFn::SeqableQ => is_seqable(v, ctx.heap),
        BuiltinFn::SequentialQ => {
            matches!(v, Value::EmptyList)
                || heap_kind(|d| {
                    matches!(d, HeapData::List(_) | HeapData::Vector(_) | HeapData::LazySeq(_))
                })
        }
        BuiltinFn::CountedQ => {
            matches!(v, Value::EmptyList)
                || match v {
                    Value::Ref(id) => match ctx.heap.get(id) {
                        HeapData::List(node) => node.count.is_some(),
                        HeapData::Vector(_) | HeapData::Map(_) | HeapData::Set(_) => true,
                        _ => false,
                    },
                    _ => false,
                }
        }
        BuiltinFn::ReducedQ => heap_kind(|d| matches!(d, HeapData::Reduced(_))),
        BuiltinFn::RealizedQ => match v {
            Value::Ref(id) => match ctx.heap.get(id) {
                HeapData::LazySeq(ls) => ls.is_realized(),
                HeapData::Delay(d) => d.is_realized(),
                HeapData::Promise(p) => p.delivered,
                _ => {
                    return Err(CoreError::wrong_type(
                        "realized?",
                        "a delay, lazy-seq, or promise",
                        v.clj_type(ctx.heap),
                    ));
                }
            },
            _ => {
                return Err(CoreError::wrong_type(
                    "realized?",
                    "a delay, lazy-seq, or promise",
                    v.clj_type(ctx.heap),
                ));
            }
        },
        BuiltinFn::DelayQ => heap_kind(|d| matches!(d, HeapData::Delay(_))),
        BuiltinFn::VarQ => heap_kind(|d| matches!(d, HeapData::Var(_))),
        BuiltinFn::VolatileQ => heap_kind(|d| matches!(d, HeapData::Volatile(_))),
        _ => unreachable!("non-predicate routed to builtin_predicate"),
    };
    Ok(Value::Bool(result))
}

pub(crate) fn builtin_empty_q(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("empty?", args, 1)?;
    let s = seq::seq(ctx, args[0])?;
    Ok(Value::Bool(matches!(s, Value::Nil)))
}

pub(crate) fn builtin_not_empty(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("not-empty", args, 1)?;
    let s = seq::seq(ctx, args[0])?;
    Ok(if matches!(s, Value::Nil) {
        Value::Nil
    } else {
        args[0]
    })
}

/// `(instance-of? :vector x)` — tests the runtime type tag.
pub(crate) fn builtin_instance_of(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("instance-of?", args, 2)?;
    let tag = as_keyword("instance-of?", args[0], ctx.heap)?;
    let (ns, tag_name) = ctx.interns.keyword_parts(tag);
    if ns.is_some() {
        return Err(CoreError::type_error(
            "instance-of?: type tag must be an unqualified keyword",
        ));
    }
    let expected: Type = tag_name
        .parse()
        .map_err(|_| CoreError::type_error(format!("instance-of?: unknown type tag :{tag_name}")))?;
    Ok(Value::Bool(args[1].clj_type(ctx.heap) == expected))
}

/// `type` — the short symbolic tag as a symbol; nil for nil.
pub(crate) fn builtin_type(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("type", args, 1)?;
    if matches!(args[0], Value::Nil) {
        return Ok(Value::Nil);
    }
    let tag: &'static str = args[0].clj_type(ctx.heap).into();
    Ok(Value::Symbol(ctx.interns.symbol(None, tag)))
}

/// `class` — the host-style class tag as a string; nil for nil. Sorted
/// maps and sets report their tree-backed class names.
pub(crate) fn builtin_class(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("class", args, 1)?;
    if let Value::Ref(id) = args[0] {
        match ctx.heap.get(id) {
            HeapData::Map(m) if m.is_sorted() => {
                return ctx.heap.alloc_str("loris.lang.PersistentTreeMap");
            }
            HeapData::Set(s) if s.is_sorted() => {
                return ctx.heap.alloc_str("loris.lang.PersistentTreeSet");
            }
            _ => {}
        }
    }
    match args[0].clj_type(ctx.heap).class_name() {
        Some(name) => ctx.heap.alloc_str(name),
        None => Ok(Value::Nil),
    }
}

pub(crate) fn builtin_identity(
    _ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("identity", args, 1)?;
    Ok(args[0])
}

pub(crate) fn builtin_not(
    _ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("not", args, 1)?;
    Ok(Value::Bool(!args[0].is_truthy()))
}
