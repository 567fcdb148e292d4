//! Numeric casts and the string parsers.
//!
//! The parsers trim ASCII whitespace and return nil on failure — they
//! never raise.

use crate::{
    args::{as_str, check_exact},
    exception::{CoreError, RunResult},
    host::Ctx,
    resource::ResourceTracker,
    types::CljTrait,
    value::Value,
};

pub(crate) fn builtin_long(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("long", args, 1)?;
    match args[0] {
        Value::Int(i) => Ok(Value::Int(i)),
        // Truncates toward zero; saturates at the i64 range.
        Value::Float(x) => Ok(Value::Int(x as i64)),
        Value::Char(c) => Ok(Value::Int(i64::from(u32::from(c)))),
        v => Err(CoreError::wrong_type("long", "a number or character", v.clj_type(ctx.heap))),
    }
}

pub(crate) fn builtin_double(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("double", args, 1)?;
    match args[0] {
        Value::Int(i) => Ok(Value::Float(i as f64)),
        Value::Float(x) => Ok(Value::Float(x)),
        v => Err(CoreError::wrong_type("double", "a number", v.clj_type(ctx.heap))),
    }
}

pub(crate) fn builtin_char(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("char", args, 1)?;
    match args[0] {
        Value::Char(c) => Ok(Value::Char(c)),
        Value::Int(i) => {
            let scalar = u32::try_from(i)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| CoreError::type_error(format!("char: {i} is not a unicode scalar")))?;
            Ok(Value::Char(scalar))
        }
        v => Err(CoreError::wrong_type("char", "a character or long", v.clj_type(ctx.heap))),
    }
}

pub(crate) fn builtin_boolean(
    _ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("boolean", args, 1)?;
    Ok(Value::Bool(args[0].is_truthy()))
}

fn trimmed<'h>(
    name: &str,
    args: &[Value],
    ctx: &'h Ctx<'_, impl ResourceTracker>,
) -> RunResult<&'h str> {
    check_exact(name, args, 1)?;
    Ok(as_str(name, args[0], ctx.heap)?.trim_matches(|c: char| c.is_ascii_whitespace()))
}

pub(crate) fn builtin_parse_long(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    let s = trimmed("parse-long", args, ctx)?;
    Ok(s.parse::<i64>().map_or(Value::Nil, Value::Int))
}

pub(crate) fn builtin_parse_double(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    let s = trimmed("parse-double", args, ctx)?;
    Ok(s.parse::<f64>().map_or(Value::Nil, Value::Float))
}

pub(crate) fn builtin_parse_boolean(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    let s = trimmed("parse-boolean", args, ctx)?;
    Ok(match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Nil,
    })
}
