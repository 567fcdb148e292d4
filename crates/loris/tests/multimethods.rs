//! Multimethod dispatch and the derivation hierarchy.

mod common;

use common::{boolean, call, call_ok, constantly, display, invoke, kw_ns, readable, str_val, sym};
use loris::{BuiltinFn as B, ErrorKind, Rt, Value};
use pretty_assertions::assert_eq;

fn fresh(rt: &mut Rt) {
    call_ok(rt, B::ResetGlobalHierarchyBang, &[]);
}

#[test]
fn isa_is_reflexive_and_transitive() {
    let mut rt = Rt::new();
    fresh(&mut rt);
    let kitten = kw_ns(&mut rt, "zoo", "kitten");
    let cat = kw_ns(&mut rt, "zoo", "cat");
    let animal = kw_ns(&mut rt, "zoo", "animal");

    assert!(boolean(call_ok(&mut rt, B::IsaQ, &[kitten, kitten])));

    call_ok(&mut rt, B::Derive, &[kitten, cat]);
    call_ok(&mut rt, B::Derive, &[cat, animal]);
    assert!(boolean(call_ok(&mut rt, B::IsaQ, &[kitten, animal])));
    assert!(!boolean(call_ok(&mut rt, B::IsaQ, &[animal, kitten])));

    // ancestors has both, without duplicates
    let ancestors = call_ok(&mut rt, B::Ancestors, &[kitten]);
    assert_eq!(readable(&rt, ancestors), "#{:zoo/cat :zoo/animal}");
    let descendants = call_ok(&mut rt, B::Descendants, &[animal]);
    assert_eq!(readable(&rt, descendants), "#{:zoo/kitten :zoo/cat}");
    fresh(&mut rt);
}

#[test]
fn vectors_relate_elementwise() {
    let mut rt = Rt::new();
    fresh(&mut rt);
    let cat = kw_ns(&mut rt, "zoo", "cat");
    let animal = kw_ns(&mut rt, "zoo", "animal");
    call_ok(&mut rt, B::Derive, &[cat, animal]);

    let pair = common::vector(&mut rt, &[cat, cat]);
    let target = common::vector(&mut rt, &[animal, animal]);
    assert!(boolean(call_ok(&mut rt, B::IsaQ, &[pair, target])));

    let short = common::vector(&mut rt, &[cat]);
    assert!(!boolean(call_ok(&mut rt, B::IsaQ, &[short, target])));
    fresh(&mut rt);
}

#[test]
fn derive_rejects_cycles_and_self() {
    let mut rt = Rt::new();
    fresh(&mut rt);
    let a = kw_ns(&mut rt, "h", "a");
    let b = kw_ns(&mut rt, "h", "b");
    call_ok(&mut rt, B::Derive, &[a, b]);

    let err = call(&mut rt, B::Derive, &[b, a]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateError);
    let err = call(&mut rt, B::Derive, &[a, a]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateError);
    fresh(&mut rt);
}

#[test]
fn underive_removes_edges_and_empty_entries() {
    let mut rt = Rt::new();
    fresh(&mut rt);
    let a = kw_ns(&mut rt, "h", "a");
    let b = kw_ns(&mut rt, "h", "b");
    call_ok(&mut rt, B::Derive, &[a, b]);
    call_ok(&mut rt, B::Underive, &[a, b]);
    assert!(!boolean(call_ok(&mut rt, B::IsaQ, &[a, b])));
    assert!(matches!(call_ok(&mut rt, B::Parents, &[a]), Value::Nil));
    fresh(&mut rt);
}

#[test]
fn local_hierarchies_are_pure() {
    let mut rt = Rt::new();
    fresh(&mut rt);
    let h0 = call_ok(&mut rt, B::MakeHierarchy, &[]);
    let a = kw_ns(&mut rt, "h", "a");
    let b = kw_ns(&mut rt, "h", "b");
    let h1 = call_ok(&mut rt, B::Derive, &[h0, a, b]);
    // Three-arg derive returns a new hierarchy, leaving the old one and
    // the global one untouched.
    assert!(boolean(call_ok(&mut rt, B::IsaQ, &[h1, a, b])));
    assert!(!boolean(call_ok(&mut rt, B::IsaQ, &[h0, a, b])));
    assert!(!boolean(call_ok(&mut rt, B::IsaQ, &[a, b])));
}

#[test]
fn no_method_without_default_fails() {
    let mut rt = Rt::new();
    fresh(&mut rt);
    let name = sym(&mut rt, "render");
    let mf = call_ok(&mut rt, B::MultiFnCtor, &[name, Value::Builtin(B::Identity)]);
    let stray = kw_ns(&mut rt, "ui", "button");
    let err = invoke(&mut rt, mf, &[stray]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoMethodError);
}

#[test]
fn ambiguous_dispatch_without_preference_fails() {
    let mut rt = Rt::new();
    fresh(&mut rt);
    let child = kw_ns(&mut rt, "d", "child");
    let left = kw_ns(&mut rt, "d", "left");
    let right = kw_ns(&mut rt, "d", "right");
    call_ok(&mut rt, B::Derive, &[child, left]);
    call_ok(&mut rt, B::Derive, &[child, right]);

    let name = sym(&mut rt, "pick");
    let mf = call_ok(&mut rt, B::MultiFnCtor, &[name, Value::Builtin(B::Identity)]);
    let l = str_val(&mut rt, "left");
    let r = str_val(&mut rt, "right");
    let left_method = constantly(&mut rt, l);
    let right_method = constantly(&mut rt, r);
    call_ok(&mut rt, B::AddMethod, &[mf, left, left_method]);
    call_ok(&mut rt, B::AddMethod, &[mf, right, right_method]);

    let err = invoke(&mut rt, mf, &[child]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AmbiguousDispatchError);

    // prefer-method resolves the tie
    call_ok(&mut rt, B::PreferMethod, &[mf, left, right]);
    let picked = invoke(&mut rt, mf, &[child]).unwrap();
    assert_eq!(display(&rt, picked), "left");

    // and the reverse preference now conflicts
    let err = call(&mut rt, B::PreferMethod, &[mf, right, left]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateError);
    fresh(&mut rt);
}

#[test]
fn more_specific_dispatch_value_dominates() {
    let mut rt = Rt::new();
    fresh(&mut rt);
    let kitten = kw_ns(&mut rt, "s", "kitten");
    let cat = kw_ns(&mut rt, "s", "cat");
    let animal = kw_ns(&mut rt, "s", "animal");
    call_ok(&mut rt, B::Derive, &[kitten, cat]);
    call_ok(&mut rt, B::Derive, &[cat, animal]);

    let name = sym(&mut rt, "noise");
    let mf = call_ok(&mut rt, B::MultiFnCtor, &[name, Value::Builtin(B::Identity)]);
    let purr = str_val(&mut rt, "purr");
    let noise = str_val(&mut rt, "noise");
    let cat_method = constantly(&mut rt, purr);
    let animal_method = constantly(&mut rt, noise);
    call_ok(&mut rt, B::AddMethod, &[mf, cat, cat_method]);
    call_ok(&mut rt, B::AddMethod, &[mf, animal, animal_method]);

    // kitten matches both; cat is more specific via isa?.
    let heard = invoke(&mut rt, mf, &[kitten]).unwrap();
    assert_eq!(display(&rt, heard), "purr");
    fresh(&mut rt);
}

#[test]
fn default_method_and_remove_all() {
    let mut rt = Rt::new();
    fresh(&mut rt);
    let name = sym(&mut rt, "describe");
    let mf = call_ok(&mut rt, B::MultiFnCtor, &[name, Value::Builtin(B::Identity)]);
    let tag = kw_ns(&mut rt, "m", "tag");
    let known = str_val(&mut rt, "known");
    let method = constantly(&mut rt, known);
    call_ok(&mut rt, B::AddMethod, &[mf, tag, method]);

    let methods = call_ok(&mut rt, B::MethodsFn, &[mf]);
    assert_eq!(common::int(call_ok(&mut rt, B::Count, &[methods])), 1);

    let found = call_ok(&mut rt, B::GetMethod, &[mf, tag]);
    let via_table = invoke(&mut rt, found, &[tag]).unwrap();
    assert_eq!(display(&rt, via_table), "known");

    call_ok(&mut rt, B::RemoveAllMethods, &[mf]);
    let methods = call_ok(&mut rt, B::MethodsFn, &[mf]);
    assert_eq!(common::int(call_ok(&mut rt, B::Count, &[methods])), 0);
}

#[test]
fn protocol_fns_dispatch_on_type_tag() {
    let mut rt = Rt::new();
    let proto_name = sym(&mut rt, "Countable");
    let method_name = sym(&mut rt, "width");
    let proto = call_ok(&mut rt, B::ProtocolCtor, &[proto_name, method_name]);
    let width = call_ok(&mut rt, B::ProtocolFnCtor, &[proto, method_name]);

    let vector_tag = common::kw(&mut rt, "vector");
    call_ok(&mut rt, B::ExtendTypeBang, &[width, vector_tag, Value::Builtin(B::Count)]);

    let v = common::vector(&mut rt, &[Value::Int(1), Value::Int(2)]);
    assert_eq!(common::int(invoke(&mut rt, width, &[v]).unwrap()), 2);

    // No implementation for longs.
    let err = invoke(&mut rt, width, &[Value::Int(3)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoMethodError);
}
