//! Shared helpers for the behavioural tests: a session wrapper and value
//! constructors/extractors over the public API.
#![allow(dead_code)]

use loris::{BuiltinFn, NoHost, NoPrint, PrintMode, Rt, RunResult, Value};

/// Calls a built-in against a session with no host and no output.
pub fn call(rt: &mut Rt, f: BuiltinFn, args: &[Value]) -> RunResult<Value> {
    let mut host = NoHost;
    let mut print = NoPrint;
    let mut ctx = rt.ctx(&mut host, &mut print);
    f.call(&mut ctx, args)
}

/// Calls a built-in, panicking on error.
pub fn call_ok(rt: &mut Rt, f: BuiltinFn, args: &[Value]) -> Value {
    call(rt, f, args).unwrap_or_else(|err| panic!("{}: {err}", f.name()))
}

/// Invokes any callable value (partials, keywords, multi-fns, …).
pub fn invoke(rt: &mut Rt, target: Value, args: &[Value]) -> RunResult<Value> {
    let mut host = NoHost;
    let mut print = NoPrint;
    let mut ctx = rt.ctx(&mut host, &mut print);
    loris::call_value(&mut ctx, target, args)
}

pub fn int(v: Value) -> i64 {
    match v {
        Value::Int(i) => i,
        other => panic!("expected a long, got {other:?}"),
    }
}

pub fn float(v: Value) -> f64 {
    match v {
        Value::Float(x) => x,
        other => panic!("expected a double, got {other:?}"),
    }
}

pub fn boolean(v: Value) -> bool {
    match v {
        Value::Bool(b) => b,
        other => panic!("expected a boolean, got {other:?}"),
    }
}

pub fn str_val(rt: &mut Rt, s: &str) -> Value {
    rt.heap.alloc_str(s).unwrap()
}

pub fn kw(rt: &mut Rt, name: &str) -> Value {
    Value::Keyword(rt.interns.keyword(None, name))
}

pub fn kw_ns(rt: &mut Rt, ns: &str, name: &str) -> Value {
    Value::Keyword(rt.interns.keyword(Some(ns), name))
}

pub fn sym(rt: &mut Rt, name: &str) -> Value {
    Value::Symbol(rt.interns.symbol(None, name))
}

pub fn vector(rt: &mut Rt, items: &[Value]) -> Value {
    call_ok(rt, BuiltinFn::VectorCtor, items)
}

pub fn list(rt: &mut Rt, items: &[Value]) -> Value {
    call_ok(rt, BuiltinFn::ListCtor, items)
}

pub fn readable(rt: &Rt, v: Value) -> String {
    v.to_print_string(&rt.heap, &rt.interns, PrintMode::Readable)
}

pub fn display(rt: &Rt, v: Value) -> String {
    v.to_print_string(&rt.heap, &rt.interns, PrintMode::Display)
}

/// A callable ignoring up to one trailing argument and returning `v`,
/// built from `(partial get {0 v} 0)`.
pub fn constantly(rt: &mut Rt, v: Value) -> Value {
    let table = call_ok(rt, BuiltinFn::HashMapCtor, &[Value::Int(0), v]);
    call_ok(rt, BuiltinFn::PartialCtor, &[Value::Builtin(BuiltinFn::Get), table, Value::Int(0)])
}

/// The string content of a string value.
pub fn as_string(rt: &Rt, v: Value) -> String {
    display(rt, v)
}

/// Collects a seqable into a vector of values.
pub fn to_vec(rt: &mut Rt, v: Value) -> Vec<Value> {
    let mut host = NoHost;
    let mut print = NoPrint;
    let mut ctx = rt.ctx(&mut host, &mut print);
    loris::seq_to_vec(&mut ctx, v).unwrap()
}
