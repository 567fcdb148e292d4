//! The concrete end-to-end scenarios the core pins down.

mod common;

use common::{boolean, call, call_ok, constantly, float, int, kw_ns, str_val, sym, to_vec};
use loris::{BuiltinFn as B, ErrorKind, Rt, Value};
use pretty_assertions::assert_eq;

#[test]
fn addition_of_longs() {
    let mut rt = Rt::new();
    let result = call_ok(&mut rt, B::Add, &[Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(int(result), 6);
}

#[test]
fn addition_promotes_to_double() {
    let mut rt = Rt::new();
    let result = call_ok(&mut rt, B::Add, &[Value::Int(1), Value::Float(2.0)]);
    assert_eq!(float(result), 3.0);
}

#[test]
fn division_always_yields_double() {
    let mut rt = Rt::new();
    let result = call_ok(&mut rt, B::Div, &[Value::Int(10), Value::Int(4)]);
    assert_eq!(float(result), 2.5);
}

#[test]
fn division_by_zero_fails() {
    let mut rt = Rt::new();
    let err = call(&mut rt, B::Div, &[Value::Int(1), Value::Int(0)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DivisionByZero);
    let err = call(&mut rt, B::Div, &[Value::Int(1), Value::Float(0.0)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DivisionByZero);
}

#[test]
fn chained_comparison() {
    let mut rt = Rt::new();
    let ascending = call_ok(&mut rt, B::Lt, &[Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert!(boolean(ascending));
    let broken = call_ok(&mut rt, B::Lt, &[Value::Int(1), Value::Int(3), Value::Int(2)]);
    assert!(!boolean(broken));
}

#[test]
fn checked_increment_at_the_edge() {
    let mut rt = Rt::new();
    let near_max = call_ok(&mut rt, B::IncChecked, &[Value::Int(i64::MAX - 1)]);
    let equal = call_ok(&mut rt, B::Eq, &[near_max, Value::Int(i64::MAX)]);
    assert!(boolean(equal));

    let err = call(&mut rt, B::IncChecked, &[Value::Int(i64::MAX)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArithmeticOverflow);
}

#[test]
fn mod_floors_and_rem_truncates() {
    let mut rt = Rt::new();
    let floored = call_ok(&mut rt, B::Mod, &[Value::Int(-7), Value::Int(3)]);
    assert_eq!(int(floored), 2);
    let truncated = call_ok(&mut rt, B::Rem, &[Value::Int(-7), Value::Int(3)]);
    assert_eq!(int(truncated), -1);
    let quotient = call_ok(&mut rt, B::Quot, &[Value::Int(-7), Value::Int(3)]);
    assert_eq!(int(quotient), -2);
}

#[test]
fn re_find_returns_group_vector() {
    let mut rt = Rt::new();
    let pattern_src = str_val(&mut rt, r"(\d+)-(\d+)");
    let pattern = call_ok(&mut rt, B::RePattern, &[pattern_src]);
    let input = str_val(&mut rt, "x12-34y");
    let found = call_ok(&mut rt, B::ReFind, &[pattern, input]);
    let groups = to_vec(&mut rt, found);
    let rendered: Vec<String> = groups.iter().map(|g| common::display(&rt, *g)).collect();
    assert_eq!(rendered, vec!["12-34", "12", "34"]);
}

#[test]
fn regex_replace_every_digit() {
    let mut rt = Rt::new();
    let s = str_val(&mut rt, "a1b2");
    let pattern_src = str_val(&mut rt, r"\d");
    let pattern = call_ok(&mut rt, B::RePattern, &[pattern_src]);
    let replacement = str_val(&mut rt, "_");
    let replaced = call_ok(&mut rt, B::StringReplace, &[s, pattern, replacement]);
    assert_eq!(common::display(&rt, replaced), "a_b_");
}

#[test]
fn derive_establishes_isa() {
    let mut rt = Rt::new();
    let cat = kw_ns(&mut rt, "user", "cat");
    let animal = kw_ns(&mut rt, "user", "animal");
    let result = call_ok(&mut rt, B::Derive, &[cat, animal]);
    assert!(matches!(result, Value::Nil));
    let related = call_ok(&mut rt, B::IsaQ, &[cat, animal]);
    assert!(boolean(related));
    call_ok(&mut rt, B::ResetGlobalHierarchyBang, &[]);
}

#[test]
fn multimethod_falls_back_along_the_hierarchy() {
    let mut rt = Rt::new();
    let cat = kw_ns(&mut rt, "user", "cat");
    let animal = kw_ns(&mut rt, "user", "animal");
    call_ok(&mut rt, B::Derive, &[cat, animal]);

    let name = sym(&mut rt, "speak");
    let dispatch = Value::Builtin(B::Identity);
    let mf = call_ok(&mut rt, B::MultiFnCtor, &[name, dispatch]);

    let meow = str_val(&mut rt, "meow");
    let growl = str_val(&mut rt, "growl");
    let cat_method = constantly(&mut rt, meow);
    let animal_method = constantly(&mut rt, growl);
    call_ok(&mut rt, B::AddMethod, &[mf, cat, cat_method]);
    call_ok(&mut rt, B::AddMethod, &[mf, animal, animal_method]);

    let heard = common::invoke(&mut rt, mf, &[cat]).unwrap();
    assert_eq!(common::display(&rt, heard), "meow");

    call_ok(&mut rt, B::RemoveMethod, &[mf, cat]);
    let heard = common::invoke(&mut rt, mf, &[cat]).unwrap();
    assert_eq!(common::display(&rt, heard), "growl");

    call_ok(&mut rt, B::ResetGlobalHierarchyBang, &[]);
}

#[test]
fn shift_counts_clamp_to_sixty_three() {
    let mut rt = Rt::new();
    let shifted = call_ok(&mut rt, B::BitShiftLeft, &[Value::Int(1), Value::Int(65)]);
    assert_eq!(int(shifted), 1i64.wrapping_shl(63));
    let negative = call_ok(&mut rt, B::BitShiftLeft, &[Value::Int(1), Value::Int(-4)]);
    assert_eq!(int(negative), 1);
}
