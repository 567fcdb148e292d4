//! The regex layer: find/matches/seq, matcher state, and replacement.

mod common;

use common::{call, call_ok, display, readable, str_val, to_vec};
use loris::{BuiltinFn as B, ErrorKind, Rt, Value};
use pretty_assertions::assert_eq;

fn pattern(rt: &mut Rt, source: &str) -> Value {
    let src = str_val(rt, source);
    call_ok(rt, B::RePattern, &[src])
}

#[test]
fn re_pattern_is_idempotent_and_prints_its_source() {
    let mut rt = Rt::new();
    let p = pattern(&mut rt, r"\d+");
    let again = call_ok(&mut rt, B::RePattern, &[p]);
    assert!(matches!((p, again), (Value::Ref(a), Value::Ref(b)) if a == b));
    assert_eq!(readable(&rt, p), "#\"\\d+\"");

    let bad = str_val(&mut rt, "(unclosed");
    let err = call(&mut rt, B::RePattern, &[bad]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EvalError);
}

#[test]
fn groupless_matches_are_bare_strings() {
    let mut rt = Rt::new();
    let p = pattern(&mut rt, r"\d+");
    let s = str_val(&mut rt, "a123b");
    let found = call_ok(&mut rt, B::ReFind, &[p, s]);
    assert_eq!(display(&rt, found), "123");
}

#[test]
fn non_participating_groups_are_nil() {
    let mut rt = Rt::new();
    let p = pattern(&mut rt, "(a)|(b)");
    let s = str_val(&mut rt, "b");
    let found = call_ok(&mut rt, B::ReFind, &[p, s]);
    assert_eq!(readable(&rt, found), "[\"b\" nil \"b\"]");
}

#[test]
fn re_matches_requires_the_whole_input() {
    let mut rt = Rt::new();
    let p = pattern(&mut rt, "a|ab");
    let s = str_val(&mut rt, "ab");
    // Leftmost-first alone would stop at "a"; whole-input matching must
    // still succeed.
    let matched = call_ok(&mut rt, B::ReMatches, &[p, s]);
    assert_eq!(display(&rt, matched), "ab");

    let partial = str_val(&mut rt, "abc");
    let missed = call_ok(&mut rt, B::ReMatches, &[p, partial]);
    assert!(matches!(missed, Value::Nil));
}

#[test]
fn re_seq_is_eager_and_non_overlapping() {
    let mut rt = Rt::new();
    let p = pattern(&mut rt, r"\d+");
    let s = str_val(&mut rt, "a12b345c6");
    let matches = call_ok(&mut rt, B::ReSeq, &[p, s]);
    let items = to_vec(&mut rt, matches);
    let texts: Vec<String> = items.iter().map(|m| display(&rt, *m)).collect();
    assert_eq!(texts, vec!["12", "345", "6"]);
    // Disjoint coverage: summed match lengths never exceed the input.
    let total: usize = texts.iter().map(String::len).sum();
    assert!(total <= "a12b345c6".len());

    let none = str_val(&mut rt, "xyz");
    let empty = call_ok(&mut rt, B::ReSeq, &[p, none]);
    assert!(matches!(empty, Value::Nil));
}

#[test]
fn zero_width_matches_advance() {
    let mut rt = Rt::new();
    let p = pattern(&mut rt, "a*");
    let s = str_val(&mut rt, "baab");
    let matches = call_ok(&mut rt, B::ReSeq, &[p, s]);
    assert_eq!(readable(&rt, matches), "(\"\" \"aa\" \"\" \"\")");
}

#[test]
fn matcher_advances_and_remembers_groups() {
    let mut rt = Rt::new();
    let p = pattern(&mut rt, r"(\d)(\d)");
    let s = str_val(&mut rt, "12 34");
    let m = call_ok(&mut rt, B::ReMatcher, &[p, s]);
    assert_eq!(readable(&rt, m), "#<matcher \"(\\d)(\\d)\">");

    let first = call_ok(&mut rt, B::ReFind, &[m]);
    assert_eq!(readable(&rt, first), "[\"12\" \"1\" \"2\"]");
    let saved = call_ok(&mut rt, B::ReGroups, &[m]);
    assert_eq!(readable(&rt, saved), "[\"12\" \"1\" \"2\"]");

    let second = call_ok(&mut rt, B::ReFind, &[m]);
    assert_eq!(readable(&rt, second), "[\"34\" \"3\" \"4\"]");

    // Exhausted: nil, and the saved groups are cleared.
    let done = call_ok(&mut rt, B::ReFind, &[m]);
    assert!(matches!(done, Value::Nil));
    let err = call(&mut rt, B::ReGroups, &[m]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateError);
}

#[test]
fn replacement_back_references() {
    let mut rt = Rt::new();
    let p = pattern(&mut rt, r"(\d+)-(\d+)");
    let s = str_val(&mut rt, "x12-34y56-78z");
    let template = str_val(&mut rt, "$2:$1");
    let swapped = call_ok(&mut rt, B::StringReplace, &[s, p, template]);
    assert_eq!(display(&rt, swapped), "x34:12y78:56z");

    let first_only = call_ok(&mut rt, B::StringReplaceFirst, &[s, p, template]);
    assert_eq!(display(&rt, first_only), "x34:12y56-78z");

    // \$ is a literal dollar; a nil group substitutes nothing.
    let p = pattern(&mut rt, "(a)|(b)");
    let s = str_val(&mut rt, "ab");
    let template = str_val(&mut rt, "<$1$2\\$>");
    let out = call_ok(&mut rt, B::StringReplace, &[s, p, template]);
    assert_eq!(display(&rt, out), "<a$><b$>");
}

#[test]
fn literal_replacement_and_split() {
    let mut rt = Rt::new();
    let s = str_val(&mut rt, "a,b,,c,,");
    let comma = str_val(&mut rt, ",");
    let dash = str_val(&mut rt, "-");
    let replaced = call_ok(&mut rt, B::StringReplace, &[s, comma, dash]);
    assert_eq!(display(&rt, replaced), "a-b--c--");

    let parts = call_ok(&mut rt, B::StringSplit, &[s, comma]);
    assert_eq!(readable(&rt, parts), "[\"a\" \"b\" \"\" \"c\"]");

    let limited = call_ok(&mut rt, B::StringSplit, &[s, comma, Value::Int(2)]);
    assert_eq!(readable(&rt, limited), "[\"a\" \"b,,c,,\"]");

    let p = pattern(&mut rt, r"\d");
    let digits = str_val(&mut rt, "a1b2c");
    let parts = call_ok(&mut rt, B::StringSplit, &[digits, p]);
    assert_eq!(readable(&rt, parts), "[\"a\" \"b\" \"c\"]");
}
