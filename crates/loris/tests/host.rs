//! The host seam: registration table, hostless failure modes, and
//! resource-limited sessions.

mod common;

use common::{call, call_ok, int, str_val};
use loris::{
    builtin_table, BuiltinFn as B, ErrorKind, Family, HeapData, LimitedTracker, NoHost, NoPrint,
    PersistentVector, Rt, Value,
};
use pretty_assertions::assert_eq;

#[test]
fn registration_table_names_the_library() {
    let table = builtin_table();
    let lookup = |name: &str| {
        table
            .iter()
            .find(|(n, _)| *n == name)
            .unwrap_or_else(|| panic!("missing builtin {name}"))
            .1
    };
    assert_eq!(lookup("+"), B::Add);
    assert_eq!(lookup("swap!"), B::SwapBang);
    assert_eq!(lookup("re-seq"), B::ReSeq);
    assert_eq!(lookup("unsigned-bit-shift-right"), B::UnsignedBitShiftRight);
    assert_eq!(lookup("prefer-method"), B::PreferMethod);
    // Families partition the table.
    assert_eq!(B::Add.family(), Family::Arithmetic);
    assert_eq!(B::ReSeq.family(), Family::Regex);
    assert_eq!(B::EvalFn.family(), Family::Eval);
    // Internal lazy steps never register.
    assert!(table.iter().all(|(n, _)| !n.ends_with('*')));
}

#[test]
fn host_bridged_builtins_fail_without_a_host() {
    let mut rt = Rt::new();
    let src = str_val(&mut rt, "(+ 1 2)");
    let err = call(&mut rt, B::ReadString, &[src]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EvalError);
    let err = call(&mut rt, B::EvalFn, &[Value::Int(1)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EvalError);
    let err = call(&mut rt, B::LoadString, &[src]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EvalError);
    let name = common::sym(&mut rt, "inc");
    let err = call(&mut rt, B::Resolve, &[name]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EvalError);
}

#[test]
fn closures_need_an_interpreter() {
    let mut rt = Rt::new();
    let closure = rt
        .heap
        .alloc_value(HeapData::Closure(loris::Closure {
            name: None,
            arity: loris::FnArity {
                required: 0,
                variadic: true,
            },
            body: loris::NodeId(0),
            env: loris::EnvId(0),
        }))
        .unwrap();
    let err = common::invoke(&mut rt, closure, &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);
}

#[test]
fn non_callables_are_rejected() {
    let mut rt = Rt::new();
    let err = common::invoke(&mut rt, Value::Int(3), &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);
}

#[test]
fn limited_tracker_bounds_allocation() {
    let mut rt: Rt<LimitedTracker> = Rt::with_tracker(LimitedTracker::new(Some(4), None));
    let mut host = NoHost;
    let mut print = NoPrint;
    let mut ctx = rt.ctx(&mut host, &mut print);
    let mut last = Ok(Value::Nil);
    for _ in 0..8 {
        last = ctx.heap.alloc_value(HeapData::Vector(PersistentVector::default()));
        if last.is_err() {
            break;
        }
    }
    let err = last.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceError);
}

#[test]
fn heap_stats_break_down_by_type() {
    let mut rt = Rt::new();
    let _ = str_val(&mut rt, "x");
    let _ = call_ok(&mut rt, B::AtomCtor, &[Value::Int(1)]);
    let stats = rt.heap.stats();
    assert_eq!(stats.objects_by_type.get("Str"), Some(&1));
    assert_eq!(stats.objects_by_type.get("Atom"), Some(&1));
    assert_eq!(stats.live_objects, 2);
}

#[test]
fn vars_deref_and_set() {
    let mut rt = Rt::new();
    let name = rt.interns.symbol(Some("user"), "x");
    let var = rt
        .heap
        .alloc_value(HeapData::Var(loris::Var {
            sym: name,
            root: Value::Int(1),
        }))
        .unwrap();
    assert_eq!(int(call_ok(&mut rt, B::VarGet, &[var])), 1);
    call_ok(&mut rt, B::VarSet, &[var, Value::Int(2)]);
    assert_eq!(int(call_ok(&mut rt, B::Deref, &[var])), 2);
    // Calling a var calls its root.
    call_ok(&mut rt, B::VarSet, &[var, Value::Builtin(B::Inc)]);
    assert_eq!(int(common::invoke(&mut rt, var, &[Value::Int(4)]).unwrap()), 5);
}
