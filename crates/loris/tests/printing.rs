//! The printed-form contract: every variant's rendering is pinned.

mod common;

use common::{call_ok, display, kw_ns, readable, str_val, sym, vector};
use loris::{
    BuiltinFn as B, CollectStringPrint, FnArity, HeapData, NoHost, NodeId, Rt, Value, Var,
};
use pretty_assertions::assert_eq;

#[test]
fn primitive_forms() {
    let rt = Rt::new();
    assert_eq!(readable(&rt, Value::Nil), "nil");
    assert_eq!(readable(&rt, Value::Bool(true)), "true");
    assert_eq!(readable(&rt, Value::Int(-7)), "-7");
    assert_eq!(readable(&rt, Value::Float(3.0)), "3.0");
    assert_eq!(readable(&rt, Value::Float(2.5)), "2.5");
    assert_eq!(readable(&rt, Value::Float(f64::NAN)), "##NaN");
    assert_eq!(readable(&rt, Value::EmptyList), "()");
}

#[test]
fn char_forms() {
    let rt = Rt::new();
    assert_eq!(readable(&rt, Value::Char('a')), "\\a");
    assert_eq!(readable(&rt, Value::Char('\n')), "\\newline");
    assert_eq!(readable(&rt, Value::Char(' ')), "\\space");
    assert_eq!(readable(&rt, Value::Char('\t')), "\\tab");
    assert_eq!(readable(&rt, Value::Char('\r')), "\\return");
    assert_eq!(display(&rt, Value::Char('a')), "a");
}

#[test]
fn string_forms_depend_on_mode() {
    let mut rt = Rt::new();
    let s = str_val(&mut rt, "a\"b\\c\nd");
    assert_eq!(readable(&rt, s), "\"a\\\"b\\\\c\\nd\"");
    assert_eq!(display(&rt, s), "a\"b\\c\nd");
}

#[test]
fn symbolic_forms() {
    let mut rt = Rt::new();
    let qualified = kw_ns(&mut rt, "user", "cat");
    assert_eq!(readable(&rt, qualified), ":user/cat");
    let bare = common::kw(&mut rt, "cat");
    assert_eq!(readable(&rt, bare), ":cat");
    let s = sym(&mut rt, "inc");
    assert_eq!(readable(&rt, s), "inc");
    assert_eq!(readable(&rt, Value::Builtin(B::Add)), "#<built-in +>");
}

#[test]
fn collection_forms() {
    let mut rt = Rt::new();
    let a = common::kw(&mut rt, "a");
    let v = vector(&mut rt, &[Value::Int(1), Value::Float(2.0), Value::Char('x')]);
    assert_eq!(readable(&rt, v), "[1 2.0 \\x]");
    let l = common::list(&mut rt, &[Value::Int(1), Value::Int(2)]);
    assert_eq!(readable(&rt, l), "(1 2)");
    let m = call_ok(&mut rt, B::HashMapCtor, &[a, Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(readable(&rt, m), "{:a 1, 2 3}");
    let s = call_ok(&mut rt, B::HashSetCtor, &[Value::Int(1)]);
    assert_eq!(readable(&rt, s), "#{1}");
    // Strings inside collections stay readable in readable mode.
    let inner = str_val(&mut rt, "q");
    let v = vector(&mut rt, &[inner]);
    assert_eq!(readable(&rt, v), "[\"q\"]");
    assert_eq!(display(&rt, v), "[q]");
}

#[test]
fn cell_forms() {
    let mut rt = Rt::new();
    let atom = call_ok(&mut rt, B::AtomCtor, &[Value::Int(1)]);
    assert_eq!(readable(&rt, atom), "#<atom 1>");
    let vol = call_ok(&mut rt, B::VolatileCtor, &[Value::Int(2)]);
    assert_eq!(readable(&rt, vol), "#<volatile 2>");
    let p = call_ok(&mut rt, B::PromiseCtor, &[]);
    assert_eq!(readable(&rt, p), "#<promise pending>");
    let reduced = call_ok(&mut rt, B::ReducedCtor, &[Value::Int(3)]);
    assert_eq!(readable(&rt, reduced), "#<reduced 3>");
    let thunk = common::constantly(&mut rt, Value::Nil);
    let d = call_ok(&mut rt, B::DelayCtor, &[thunk]);
    assert_eq!(readable(&rt, d), "#<delay pending>");
    assert_eq!(readable(&rt, thunk), "#<partial-fn>");
}

#[test]
fn var_and_fn_forms() {
    let mut rt = Rt::new();
    let name = rt.interns.symbol(Some("user"), "speak");
    let var = rt
        .heap
        .alloc_value(HeapData::Var(Var {
            sym: name,
            root: Value::Nil,
        }))
        .unwrap();
    assert_eq!(readable(&rt, var), "#'user/speak");

    let closure = rt
        .heap
        .alloc_value(HeapData::Closure(loris::Closure {
            name: Some(name),
            arity: FnArity {
                required: 1,
                variadic: false,
            },
            body: NodeId(0),
            env: loris::EnvId(0),
        }))
        .unwrap();
    assert_eq!(readable(&rt, closure), "#<fn user/speak>");

    let mf_name = sym(&mut rt, "render");
    let mf = call_ok(&mut rt, B::MultiFnCtor, &[mf_name, Value::Builtin(B::Identity)]);
    assert_eq!(readable(&rt, mf), "#<multi-fn render>");
}

#[test]
fn transient_form() {
    let mut rt = Rt::new();
    let v = vector(&mut rt, &[]);
    let t = call_ok(&mut rt, B::TransientCtor, &[v]);
    assert_eq!(readable(&rt, t), "#<transient vector>");
}

#[test]
fn print_builtins_write_through_the_writer() {
    let mut rt = Rt::new();
    let mut host = NoHost;
    let mut out = CollectStringPrint::new();
    {
        let mut ctx = rt.ctx(&mut host, &mut out);
        let s = ctx.heap.alloc_str("hi").unwrap();
        B::Prn.call(&mut ctx, &[s, Value::Int(3)]).unwrap();
        B::PrintFn.call(&mut ctx, &[s]).unwrap();
        B::Newline.call(&mut ctx, &[]).unwrap();
    }
    assert_eq!(out.output(), "\"hi\" 3\nhi\n");
}

#[test]
fn print_str_builds_instead_of_writing() {
    let mut rt = Rt::new();
    let s = str_val(&mut rt, "a");
    let built = call_ok(&mut rt, B::PrintStr, &[s, Value::Int(1)]);
    assert_eq!(display(&rt, built), "a 1");
    let with_newline = call_ok(&mut rt, B::PrintlnStr, &[s]);
    assert_eq!(display(&rt, with_newline), "a\n");
}

#[test]
fn type_and_class_views() {
    let mut rt = Rt::new();
    let v = vector(&mut rt, &[]);
    let tag = call_ok(&mut rt, B::TypeOf, &[v]);
    assert_eq!(readable(&rt, tag), "vector");
    assert!(matches!(call_ok(&mut rt, B::TypeOf, &[Value::Nil]), Value::Nil));

    let class = call_ok(&mut rt, B::ClassOf, &[v]);
    assert_eq!(display(&rt, class), "loris.lang.PersistentVector");
    let sorted = call_ok(&mut rt, B::SortedMapCtor, &[]);
    let class = call_ok(&mut rt, B::ClassOf, &[sorted]);
    assert_eq!(display(&rt, class), "loris.lang.PersistentTreeMap");
}
