//! String built-ins, parsers, casts, and the keyword/symbol
//! constructors.

mod common;

use common::{boolean, call, call_ok, display, int, kw, list, readable, str_val, vector};
use loris::{BuiltinFn as B, ErrorKind, Rt, Value};
use pretty_assertions::assert_eq;

#[test]
fn str_concatenates_display_forms() {
    let mut rt = Rt::new();
    let s = str_val(&mut rt, "n=");
    let joined = call_ok(&mut rt, B::Str, &[s, Value::Int(4), Value::Nil, Value::Char('!')]);
    assert_eq!(display(&rt, joined), "n=4!");

    let empty = call_ok(&mut rt, B::Str, &[]);
    assert_eq!(display(&rt, empty), "");
}

#[test]
fn str_forces_lazy_sequences() {
    let mut rt = Rt::new();
    let v = vector(&mut rt, &[Value::Int(1), Value::Int(2)]);
    let mapped = call_ok(&mut rt, B::MapFn, &[Value::Builtin(B::Inc), v]);
    let rendered = call_ok(&mut rt, B::Str, &[mapped]);
    assert_eq!(display(&rt, rendered), "(2 3)");
}

#[test]
fn pr_str_is_readable() {
    let mut rt = Rt::new();
    let s = str_val(&mut rt, "hi\nthere");
    let rendered = call_ok(&mut rt, B::PrStr, &[s, Value::Char('a')]);
    assert_eq!(display(&rt, rendered), "\"hi\\nthere\" \\a");
}

#[test]
fn subs_bounds() {
    let mut rt = Rt::new();
    let s = str_val(&mut rt, "héllo");
    let tail = call_ok(&mut rt, B::Subs, &[s, Value::Int(1)]);
    assert_eq!(display(&rt, tail), "éllo");
    let middle = call_ok(&mut rt, B::Subs, &[s, Value::Int(1), Value::Int(3)]);
    assert_eq!(display(&rt, middle), "él");

    let err = call(&mut rt, B::Subs, &[s, Value::Int(2), Value::Int(9)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndexError);
    // end before start is a range problem, not a type problem
    let err = call(&mut rt, B::Subs, &[s, Value::Int(3), Value::Int(1)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndexError);
}

#[test]
fn case_trim_and_search() {
    let mut rt = Rt::new();
    let s = str_val(&mut rt, "  Grüß  ");
    let trimmed = call_ok(&mut rt, B::Trim, &[s]);
    assert_eq!(display(&rt, trimmed), "Grüß");
    let upper = call_ok(&mut rt, B::UpperCase, &[trimmed]);
    assert_eq!(display(&rt, upper), "GRÜSS");

    let hay = str_val(&mut rt, "one two one");
    let needle = str_val(&mut rt, "one");
    assert!(boolean(call_ok(&mut rt, B::StringIncludesQ, &[hay, needle])));
    assert!(boolean(call_ok(&mut rt, B::StartsWithQ, &[hay, needle])));
    assert!(boolean(call_ok(&mut rt, B::EndsWithQ, &[hay, needle])));
    assert_eq!(int(call_ok(&mut rt, B::IndexOf, &[hay, needle])), 0);
    assert_eq!(
        int(call_ok(&mut rt, B::IndexOf, &[hay, needle, Value::Int(1)])),
        8
    );
    assert_eq!(int(call_ok(&mut rt, B::LastIndexOf, &[hay, needle])), 8);

    let absent = str_val(&mut rt, "zzz");
    assert!(matches!(call_ok(&mut rt, B::IndexOf, &[hay, absent]), Value::Nil));

    let blank = str_val(&mut rt, " \t ");
    assert!(boolean(call_ok(&mut rt, B::BlankQ, &[blank])));
    assert!(boolean(call_ok(&mut rt, B::BlankQ, &[Value::Nil])));
}

#[test]
fn join_over_a_seq() {
    let mut rt = Rt::new();
    let sep = str_val(&mut rt, ", ");
    let items = list(&mut rt, &[Value::Int(1), Value::Int(2), Value::Int(3)]);
    let joined = call_ok(&mut rt, B::StringJoin, &[sep, items]);
    assert_eq!(display(&rt, joined), "1, 2, 3");
}

#[test]
fn parsers_trim_and_never_raise() {
    let mut rt = Rt::new();
    let ok = str_val(&mut rt, "  42 ");
    assert_eq!(int(call_ok(&mut rt, B::ParseLong, &[ok])), 42);
    let bad = str_val(&mut rt, "4x2");
    assert!(matches!(call_ok(&mut rt, B::ParseLong, &[bad]), Value::Nil));

    let d = str_val(&mut rt, " 2.5");
    assert!(matches!(call_ok(&mut rt, B::ParseDouble, &[d]), Value::Float(x) if x == 2.5));
    let bad = str_val(&mut rt, "two");
    assert!(matches!(call_ok(&mut rt, B::ParseDouble, &[bad]), Value::Nil));

    let t = str_val(&mut rt, "true");
    assert!(boolean(call_ok(&mut rt, B::ParseBoolean, &[t])));
    let not_quite = str_val(&mut rt, "True");
    assert!(matches!(call_ok(&mut rt, B::ParseBoolean, &[not_quite]), Value::Nil));
}

#[test]
fn casts() {
    let mut rt = Rt::new();
    assert_eq!(int(call_ok(&mut rt, B::Long, &[Value::Float(2.9)])), 2);
    assert_eq!(int(call_ok(&mut rt, B::Long, &[Value::Char('A')])), 65);
    assert!(matches!(
        call_ok(&mut rt, B::Double, &[Value::Int(3)]),
        Value::Float(x) if x == 3.0
    ));
    assert!(matches!(
        call_ok(&mut rt, B::CharCast, &[Value::Int(97)]),
        Value::Char('a')
    ));
    let err = call(&mut rt, B::CharCast, &[Value::Int(-1)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);
    assert!(boolean(call_ok(&mut rt, B::Boolean, &[Value::Int(0)])));
    assert!(!boolean(call_ok(&mut rt, B::Boolean, &[Value::Nil])));
}

#[test]
fn name_namespace_and_constructors() {
    let mut rt = Rt::new();
    let qualified = common::kw_ns(&mut rt, "user", "cat");
    let n = call_ok(&mut rt, B::Name, &[qualified]);
    assert_eq!(display(&rt, n), "cat");
    let ns = call_ok(&mut rt, B::Namespace, &[qualified]);
    assert_eq!(display(&rt, ns), "user");
    let bare = kw(&mut rt, "cat");
    assert!(matches!(call_ok(&mut rt, B::Namespace, &[bare]), Value::Nil));

    // (keyword "a/b") splits on the last slash
    let spelled = str_val(&mut rt, "a/b");
    let k = call_ok(&mut rt, B::KeywordCtor, &[spelled]);
    assert_eq!(readable(&rt, k), ":a/b");
    let ns_arg = str_val(&mut rt, "user");
    let name_arg = str_val(&mut rt, "dog");
    let k = call_ok(&mut rt, B::KeywordCtor, &[ns_arg, name_arg]);
    assert_eq!(readable(&rt, k), ":user/dog");

    let s = call_ok(&mut rt, B::SymbolCtor, &[k]);
    assert_eq!(readable(&rt, s), "user/dog");
    // Interning means the same spelling is the same keyword.
    let again = call_ok(&mut rt, B::KeywordCtor, &[s]);
    assert!(boolean(call_ok(&mut rt, B::Eq, &[k, again])));
}

#[test]
fn char_tables() {
    let mut rt = Rt::new();
    let names = call_ok(&mut rt, B::CharNameString, &[]);
    let newline_name = call_ok(&mut rt, B::Get, &[names, Value::Char('\n')]);
    assert_eq!(display(&rt, newline_name), "newline");
    assert_eq!(int(call_ok(&mut rt, B::Count, &[names])), 6);

    let escapes = call_ok(&mut rt, B::CharEscapeString, &[]);
    let quote_escape = call_ok(&mut rt, B::Get, &[escapes, Value::Char('"')]);
    assert_eq!(display(&rt, quote_escape), "\\\"");
    assert_eq!(int(call_ok(&mut rt, B::Count, &[escapes])), 7);
    // \space is named but not escaped
    let space = call_ok(&mut rt, B::Get, &[escapes, Value::Char(' ')]);
    assert!(matches!(space, Value::Nil));
}

#[test]
fn string_reverse_and_capitalize() {
    let mut rt = Rt::new();
    let s = str_val(&mut rt, "abC");
    let reversed = call_ok(&mut rt, B::StringReverse, &[s]);
    assert_eq!(display(&rt, reversed), "Cba");
    let capped = call_ok(&mut rt, B::Capitalize, &[s]);
    assert_eq!(display(&rt, capped), "Abc");
}
