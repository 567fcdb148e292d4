//! Lazy sequences and the deferred cells: realisation-once, infinite
//! prefixes, delays, promises, volatiles, and the reduced sentinel.

mod common;

use common::{call, call_ok, int, readable, to_vec};
use loris::{BuiltinFn as B, ErrorKind, Rt, Value};
use pretty_assertions::assert_eq;

/// A thunk `(comp vector (partial swap! counter inc))`: bumps the
/// counter and yields a one-element vector, so realisations are
/// observable.
fn counting_thunk(rt: &mut Rt, counter: Value) -> Value {
    let bump = call_ok(
        rt,
        B::PartialCtor,
        &[Value::Builtin(B::SwapBang), counter, Value::Builtin(B::Inc)],
    );
    call_ok(rt, B::CompCtor, &[Value::Builtin(B::VectorCtor), bump])
}

#[test]
fn lazy_seq_realises_exactly_once() {
    let mut rt = Rt::new();
    let counter = call_ok(&mut rt, B::AtomCtor, &[Value::Int(0)]);
    let thunk = counting_thunk(&mut rt, counter);
    let lazy = call_ok(&mut rt, B::LazySeqCtor, &[thunk]);

    assert_eq!(readable(&rt, lazy), "#<lazy-seq>");

    let first = call_ok(&mut rt, B::First, &[lazy]);
    let again = call_ok(&mut rt, B::First, &[lazy]);
    assert_eq!(int(first), 1);
    assert_eq!(int(again), 1);
    // The producer ran once.
    let runs = call_ok(&mut rt, B::Deref, &[counter]);
    assert_eq!(int(runs), 1);
    // A cached realisation prints its contents.
    assert_eq!(readable(&rt, lazy), "(1)");
}

#[test]
fn re_entrant_realisation_is_trapped() {
    let mut rt = Rt::new();
    let cell = call_ok(&mut rt, B::AtomCtor, &[Value::Nil]);
    // (comp first (partial deref cell)) — the thunk forces the lazy-seq
    // holding it.
    let deref_cell = call_ok(&mut rt, B::PartialCtor, &[Value::Builtin(B::Deref), cell]);
    let thunk = call_ok(&mut rt, B::CompCtor, &[Value::Builtin(B::First), deref_cell]);
    let lazy = call_ok(&mut rt, B::LazySeqCtor, &[thunk]);
    call_ok(&mut rt, B::ResetBang, &[cell, lazy]);

    let err = call(&mut rt, B::First, &[lazy]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateError);
}

#[test]
fn infinite_sequences_support_finite_prefixes() {
    let mut rt = Rt::new();
    // (take 5 (range))
    let naturals = call_ok(&mut rt, B::Range, &[]);
    let prefix = call_ok(&mut rt, B::Take, &[Value::Int(5), naturals]);
    let items = to_vec(&mut rt, prefix);
    let longs: Vec<i64> = items.into_iter().map(int).collect();
    assert_eq!(longs, vec![0, 1, 2, 3, 4]);

    // (take 3 (repeat :x))
    let x = common::kw(&mut rt, "x");
    let xs = call_ok(&mut rt, B::Repeat, &[x]);
    let prefix = call_ok(&mut rt, B::Take, &[Value::Int(3), xs]);
    let doall = call_ok(&mut rt, B::Doall, &[prefix]);
    assert_eq!(readable(&rt, doall), "(:x :x :x)");
}

#[test]
fn range_shapes() {
    let mut rt = Rt::new();
    let r = call_ok(&mut rt, B::Range, &[Value::Int(3)]);
    assert_eq!(
        to_vec(&mut rt, r).into_iter().map(int).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    let r = call_ok(&mut rt, B::Range, &[Value::Int(5), Value::Int(1), Value::Int(-2)]);
    assert_eq!(
        to_vec(&mut rt, r).into_iter().map(int).collect::<Vec<_>>(),
        vec![5, 3]
    );
    let r = call_ok(&mut rt, B::Range, &[Value::Int(2), Value::Int(2)]);
    assert!(to_vec(&mut rt, r).is_empty());
}

#[test]
fn map_filter_concat_and_iterate() {
    let mut rt = Rt::new();
    let v = common::vector(&mut rt, &[Value::Int(1), Value::Int(2), Value::Int(3)]);
    let mapped = call_ok(&mut rt, B::MapFn, &[Value::Builtin(B::Inc), v]);
    let doall = call_ok(&mut rt, B::Doall, &[mapped]);
    assert_eq!(readable(&rt, doall), "(2 3 4)");

    let evens = call_ok(&mut rt, B::FilterFn, &[Value::Builtin(B::EvenQ), v]);
    let doall = call_ok(&mut rt, B::Doall, &[evens]);
    assert_eq!(readable(&rt, doall), "(2)");

    // map over two collections stops at the shorter one
    let w = common::vector(&mut rt, &[Value::Int(10), Value::Int(20)]);
    let sums = call_ok(&mut rt, B::MapFn, &[Value::Builtin(B::Add), v, w]);
    let doall = call_ok(&mut rt, B::Doall, &[sums]);
    assert_eq!(readable(&rt, doall), "(11 22)");

    let tail = common::list(&mut rt, &[Value::Int(9)]);
    let joined = call_ok(&mut rt, B::Concat, &[w, tail]);
    let doall = call_ok(&mut rt, B::Doall, &[joined]);
    assert_eq!(readable(&rt, doall), "(10 20 9)");

    // (take 4 (iterate inc 0))
    let iterated = call_ok(&mut rt, B::Iterate, &[Value::Builtin(B::Inc), Value::Int(0)]);
    let prefix = call_ok(&mut rt, B::Take, &[Value::Int(4), iterated]);
    assert_eq!(
        to_vec(&mut rt, prefix).into_iter().map(int).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );

    let dropped = call_ok(&mut rt, B::Drop, &[Value::Int(2), v]);
    let doall = call_ok(&mut rt, B::Doall, &[dropped]);
    assert_eq!(readable(&rt, doall), "(3)");
}

#[test]
fn reduce_sums_and_honours_reduced() {
    let mut rt = Rt::new();
    let r = call_ok(&mut rt, B::Range, &[Value::Int(5)]);
    let total = call_ok(&mut rt, B::Reduce, &[Value::Builtin(B::Add), r]);
    assert_eq!(int(total), 10);

    // With get as the reducer, the first step yields a reduced sentinel
    // out of the table; the driver must unwrap it and stop.
    let sentinel = call_ok(&mut rt, B::ReducedCtor, &[Value::Int(42)]);
    let table = call_ok(&mut rt, B::HashMapCtor, &[Value::Int(1), sentinel]);
    let coll = common::vector(&mut rt, &[Value::Int(1), Value::Int(2), Value::Int(3)]);
    let result = call_ok(&mut rt, B::Reduce, &[Value::Builtin(B::Get), table, coll]);
    assert_eq!(int(result), 42);
}

#[test]
fn delay_forces_once_and_traps_reentry() {
    let mut rt = Rt::new();
    let counter = call_ok(&mut rt, B::AtomCtor, &[Value::Int(0)]);
    let bump = call_ok(
        &mut rt,
        B::PartialCtor,
        &[Value::Builtin(B::SwapBang), counter, Value::Builtin(B::Inc)],
    );
    let d = call_ok(&mut rt, B::DelayCtor, &[bump]);
    assert!(!common::boolean(call_ok(&mut rt, B::RealizedQ, &[d])));
    assert_eq!(readable(&rt, d), "#<delay pending>");

    assert_eq!(int(call_ok(&mut rt, B::Force, &[d])), 1);
    assert_eq!(int(call_ok(&mut rt, B::Force, &[d])), 1);
    assert_eq!(int(call_ok(&mut rt, B::Deref, &[counter])), 1);
    assert!(common::boolean(call_ok(&mut rt, B::RealizedQ, &[d])));
    assert_eq!(readable(&rt, d), "#<delay 1>");

    // force of a non-delay returns it unchanged
    assert_eq!(int(call_ok(&mut rt, B::Force, &[Value::Int(9)])), 9);
}

#[test]
fn promise_delivery_and_deadlock() {
    let mut rt = Rt::new();
    let p = call_ok(&mut rt, B::PromiseCtor, &[]);
    let err = call(&mut rt, B::Deref, &[p]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeadlockError);

    call_ok(&mut rt, B::Deliver, &[p, Value::Int(5)]);
    assert_eq!(int(call_ok(&mut rt, B::Deref, &[p])), 5);

    // Second delivery is a silent no-op.
    call_ok(&mut rt, B::Deliver, &[p, Value::Int(9)]);
    assert_eq!(int(call_ok(&mut rt, B::Deref, &[p])), 5);
    assert_eq!(readable(&rt, p), "#<promise 5>");
}

#[test]
fn volatile_updates_without_cas() {
    let mut rt = Rt::new();
    let v = call_ok(&mut rt, B::VolatileCtor, &[Value::Int(1)]);
    call_ok(&mut rt, B::VresetBang, &[v, Value::Int(2)]);
    assert_eq!(int(call_ok(&mut rt, B::Deref, &[v])), 2);
    let bumped = call_ok(&mut rt, B::VswapBang, &[v, Value::Builtin(B::Inc)]);
    assert_eq!(int(bumped), 3);
}

#[test]
fn atom_compare_and_set() {
    let mut rt = Rt::new();
    let a = call_ok(&mut rt, B::AtomCtor, &[Value::Int(1)]);
    let swapped = call_ok(
        &mut rt,
        B::CompareAndSetBang,
        &[a, Value::Int(1), Value::Int(2)],
    );
    assert!(common::boolean(swapped));
    let rejected = call_ok(
        &mut rt,
        B::CompareAndSetBang,
        &[a, Value::Int(1), Value::Int(3)],
    );
    assert!(!common::boolean(rejected));
    assert_eq!(int(call_ok(&mut rt, B::Deref, &[a])), 2);
}

#[test]
fn realising_twice_yields_equal_results() {
    let mut rt = Rt::new();
    let v = common::vector(&mut rt, &[Value::Int(1), Value::Int(2)]);
    let mapped = call_ok(&mut rt, B::MapFn, &[Value::Builtin(B::Inc), v]);
    let once = to_vec(&mut rt, mapped);
    let twice = to_vec(&mut rt, mapped);
    assert_eq!(once.len(), twice.len());
    let expect = common::vector(&mut rt, &[Value::Int(2), Value::Int(3)]);
    assert!(common::boolean(call_ok(&mut rt, B::Eq, &[mapped, expect])));
}
