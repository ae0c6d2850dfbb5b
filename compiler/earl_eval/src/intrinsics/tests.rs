#![allow(clippy::unwrap_used, reason = "tests unwrap known-good results")]

use pretty_assertions::assert_eq;

use super::*;
use crate::errors::{EvalError, ErrorCategory};
use crate::interpreter::InterpreterBuilder;
use crate::print_handler::buffer_handler;
use crate::value::{DictValue, KeyKind};

fn strs(items: &[&str]) -> Value {
    Value::List(items.iter().map(|s| Value::string(*s)).collect())
}

fn ints(items: &[i64]) -> Value {
    Value::List(items.iter().copied().map(Value::Int).collect())
}

fn read(kind: ValueKind, name: &str, recv: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match Intrinsics::new().member(kind, name) {
        Some(MemberFn::Read(f)) => f(recv, args),
        _ => panic!("{name} is not a read member of {kind}"),
    }
}

fn mutate(kind: ValueKind, name: &str, recv: &mut Value, args: &[Value]) -> Result<Value, EvalError> {
    match Intrinsics::new().member(kind, name) {
        Some(MemberFn::Mutate(f)) => f(recv, args),
        _ => panic!("{name} is not a mutating member of {kind}"),
    }
}

fn free(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    let mut interp = InterpreterBuilder::new()
        .print_handler(buffer_handler())
        .argv(["prog", "--flag"])
        .build();
    let f = interp.intrinsics().free(name).unwrap();
    f(&mut interp, args)
}

#[test]
fn registry_lists_names() {
    let table = Intrinsics::new();
    assert!(table.is_intrinsic("print"));
    assert!(!table.is_intrinsic("println"));
    assert!(table.is_member_intrinsic(ValueKind::List, "append"));
    assert!(!table.is_member_intrinsic(ValueKind::Tuple, "append"));
    assert!(table.member_names(ValueKind::Option).contains(&"unwrap_or"));
    let names = table.free_names();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[test]
fn split_keeps_empty_pieces() {
    let hello = Value::string("hello");
    assert_eq!(
        read(ValueKind::Str, "split", &hello, &[Value::string(",")]).unwrap(),
        strs(&["hello"])
    );
    let csv = Value::string("a,b,,c");
    assert_eq!(
        read(ValueKind::Str, "split", &csv, &[Value::string(",")]).unwrap(),
        strs(&["a", "b", "", "c"])
    );
    let trailing = Value::string("a,");
    assert_eq!(
        read(ValueKind::Str, "split", &trailing, &[Value::Char(',')]).unwrap(),
        strs(&["a", ""])
    );
    let err = read(ValueKind::Str, "split", &csv, &[Value::string("")]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn string_members() {
    let s = Value::string("héllo");
    assert_eq!(read(ValueKind::Str, "len", &s, &[]).unwrap(), Value::Int(5));
    assert_eq!(read(ValueKind::Str, "nth", &s, &[Value::Int(1)]).unwrap(), Value::Char('é'));
    assert_eq!(
        read(ValueKind::Str, "substr", &s, &[Value::Int(1), Value::Int(3)]).unwrap(),
        Value::string("éll")
    );
    assert_eq!(
        read(ValueKind::Str, "substr", &s, &[Value::Int(3), Value::Int(10)]).unwrap(),
        Value::string("lo")
    );
    assert_eq!(read(ValueKind::Str, "rev", &s, &[]).unwrap(), Value::string("olléh"));
    assert_eq!(read(ValueKind::Str, "back", &s, &[]).unwrap(), Value::Char('o'));
    assert_eq!(
        read(ValueKind::Str, "back", &Value::string(""), &[]).unwrap(),
        Value::none()
    );
    assert_eq!(
        read(ValueKind::Str, "contains", &s, &[Value::Char('l')]).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        read(ValueKind::Str, "trim", &Value::string("  x \n"), &[]).unwrap(),
        Value::string("x")
    );

    let err = read(ValueKind::Str, "nth", &s, &[Value::Int(9)]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::IndexError);
}

#[test]
fn string_mutating_members() {
    let mut s = Value::string("abc");
    mutate(ValueKind::Str, "pop", &mut s, &[Value::Int(1)]).unwrap();
    assert_eq!(s, Value::string("ac"));
    mutate(ValueKind::Str, "append", &mut s, &[Value::Char('d'), Value::string("ef")]).unwrap();
    assert_eq!(s, Value::string("acdef"));
    let err = mutate(ValueKind::Str, "append", &mut s, &[Value::Int(1)]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn list_members() {
    let xs = ints(&[1, 2, 3]);
    assert_eq!(read(ValueKind::List, "len", &xs, &[]).unwrap(), Value::Int(3));
    assert_eq!(read(ValueKind::List, "nth", &xs, &[Value::Int(0)]).unwrap(), Value::Int(1));
    assert_eq!(read(ValueKind::List, "back", &xs, &[]).unwrap(), Value::Int(3));
    assert_eq!(read(ValueKind::List, "rev", &xs, &[]).unwrap(), ints(&[3, 2, 1]));
    assert_eq!(read(ValueKind::List, "sum", &xs, &[]).unwrap(), Value::Int(6));
    assert_eq!(
        read(ValueKind::List, "contains", &xs, &[Value::Int(2)]).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(read(ValueKind::List, "sum", &ints(&[]), &[]).unwrap(), Value::Int(0));
    assert_eq!(
        read(ValueKind::List, "sum", &Value::List(vec![Value::Int(1), Value::Float(0.5)]), &[])
            .unwrap(),
        Value::Float(1.5)
    );

    let err = read(ValueKind::List, "nth", &xs, &[Value::Int(5)]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::IndexError);
    let err = read(ValueKind::List, "nth", &xs, &[]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ArityError);
    let err = read(ValueKind::List, "nth", &xs, &[Value::string("0")]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn list_mutating_members() {
    let mut xs = ints(&[1, 2, 3]);
    mutate(ValueKind::List, "append", &mut xs, &[Value::Int(4), Value::Int(5)]).unwrap();
    assert_eq!(xs, ints(&[1, 2, 3, 4, 5]));
    mutate(ValueKind::List, "pop", &mut xs, &[Value::Int(0)]).unwrap();
    assert_eq!(xs, ints(&[2, 3, 4, 5]));
    let err = mutate(ValueKind::List, "pop", &mut xs, &[Value::Int(-1)]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::IndexError);
}

#[test]
fn tuple_members() {
    let t = Value::Tuple(vec![Value::Int(1), Value::string("a")]);
    assert_eq!(read(ValueKind::Tuple, "len", &t, &[]).unwrap(), Value::Int(2));
    assert_eq!(
        read(ValueKind::Tuple, "rev", &t, &[]).unwrap(),
        Value::Tuple(vec![Value::string("a"), Value::Int(1)])
    );
}

#[test]
fn dict_members() {
    let mut d = Value::dict(DictValue::new(Some(KeyKind::Str)));
    mutate(ValueKind::Dict, "insert", &mut d, &[Value::string("a"), Value::Int(1)]).unwrap();
    mutate(ValueKind::Dict, "insert", &mut d, &[Value::string("b"), Value::Int(2)]).unwrap();

    assert_eq!(read(ValueKind::Dict, "len", &d, &[]).unwrap(), Value::Int(2));
    assert_eq!(
        read(ValueKind::Dict, "has_key", &d, &[Value::string("a")]).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        read(ValueKind::Dict, "get", &d, &[Value::string("b")]).unwrap(),
        Value::some(Value::Int(2))
    );
    assert_eq!(
        read(ValueKind::Dict, "get", &d, &[Value::string("z")]).unwrap(),
        Value::none()
    );
    assert_eq!(read(ValueKind::Dict, "keys", &d, &[]).unwrap(), strs(&["a", "b"]));
    assert_eq!(read(ValueKind::Dict, "values", &d, &[]).unwrap(), ints(&[1, 2]));

    let err = mutate(ValueKind::Dict, "insert", &mut d, &[Value::Int(1), Value::Int(1)])
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::TypeError);

    mutate(ValueKind::Dict, "remove", &mut d, &[Value::string("a")]).unwrap();
    let err = mutate(ValueKind::Dict, "remove", &mut d, &[Value::string("a")]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::IndexError);
}

#[test]
fn option_members() {
    let some = Value::some(Value::Int(1));
    let none = Value::none();
    assert_eq!(read(ValueKind::Option, "is_some", &some, &[]).unwrap(), Value::Bool(true));
    assert_eq!(read(ValueKind::Option, "is_none", &none, &[]).unwrap(), Value::Bool(true));
    assert_eq!(read(ValueKind::Option, "unwrap", &some, &[]).unwrap(), Value::Int(1));
    assert_eq!(
        read(ValueKind::Option, "unwrap_or", &none, &[Value::Int(7)]).unwrap(),
        Value::Int(7)
    );
    let err = read(ValueKind::Option, "unwrap", &none, &[]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Fatal);
}

#[test]
fn char_ascii() {
    assert_eq!(
        read(ValueKind::Char, "ascii", &Value::Char('A'), &[]).unwrap(),
        Value::Int(65)
    );
}

#[test]
fn len_counts_chars_and_elements() {
    assert_eq!(free("len", &[ints(&[1, 2, 3])]).unwrap(), Value::Int(3));
    assert_eq!(free("len", &[Value::string("abc")]).unwrap(), Value::Int(3));
    assert_eq!(
        free("len", &[Value::Int(3)]).unwrap_err().category(),
        ErrorCategory::TypeError
    );
    assert_eq!(free("len", &[]).unwrap_err().category(), ErrorCategory::ArityError);
}

#[test]
fn conversions() {
    assert_eq!(free("int", &[Value::string(" 42 ")]).unwrap(), Value::Int(42));
    assert_eq!(free("int", &[Value::Float(3.9)]).unwrap(), Value::Int(3));
    assert_eq!(free("int", &[Value::Char('a')]).unwrap(), Value::Int(97));
    assert_eq!(free("float", &[Value::Int(2)]).unwrap(), Value::Float(2.0));
    assert_eq!(free("str", &[Value::Float(2.0)]).unwrap(), Value::string("2.0"));
    assert_eq!(free("str", &[ints(&[1, 2])]).unwrap(), Value::string("[1, 2]"));
    assert_eq!(free("bool", &[Value::Int(0)]).unwrap(), Value::Bool(false));
    assert_eq!(free("char", &[Value::Int(98)]).unwrap(), Value::Char('b'));
    assert_eq!(free("type", &[Value::string("s")]).unwrap(), Value::string("str"));
    assert_eq!(free("some", &[Value::Int(1)]).unwrap(), Value::some(Value::Int(1)));
    assert_eq!(
        free("int", &[Value::string("x")]).unwrap_err().category(),
        ErrorCategory::TypeError
    );
}

#[test]
fn assert_reports_falsy_arguments() {
    assert_eq!(free("assert", &[Value::Bool(true), Value::Int(1)]).unwrap(), Value::Unit);
    let err = free("assert", &[Value::Bool(true), Value::Int(0)]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::AssertionError);
}

#[test]
fn exit_is_a_signal() {
    let err = free("exit", &[Value::Int(3)]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Exit);
    assert_eq!(err.exit_code(), Some(3));
}

#[test]
fn argv_exposes_program_arguments() {
    assert_eq!(free("argv", &[]).unwrap(), strs(&["prog", "--flag"]));
}

#[test]
fn print_concatenates_and_ends_line() {
    let handler = buffer_handler();
    let mut interp = InterpreterBuilder::new().print_handler(handler.clone()).build();
    let print = interp.intrinsics().free("print").unwrap();
    print(&mut interp, &[Value::string("a"), Value::Int(1), ints(&[2])]).unwrap();
    assert_eq!(handler.get_output(), "a1[2]\n");
}

#[test]
fn input_reads_supplied_lines() {
    let handler = buffer_handler();
    let mut interp = InterpreterBuilder::new()
        .print_handler(handler.clone())
        .input_lines(["alice"])
        .build();
    let input = interp.intrinsics().free("input").unwrap();
    assert_eq!(input(&mut interp, &[Value::string("name? ")]).unwrap(), Value::string("alice"));
    assert_eq!(input(&mut interp, &[]).unwrap(), Value::string(""));
    assert_eq!(handler.get_output(), "name? ");
}

#[test]
fn file_round_trip() {
    let dir = std::env::temp_dir().join(format!("earl-intrinsics-{}", std::process::id()));
    let dir_str = dir.display().to_string();
    free("mkdir", &[Value::string(dir_str.as_str())]).unwrap();

    let path = dir.join("notes.txt").display().to_string();
    let file = free("open", &[Value::string(path.as_str()), Value::string("w")]).unwrap();
    read(ValueKind::File, "write", &file, &[Value::string("hi ")]).unwrap();
    read(ValueKind::File, "writelines", &file, &[strs(&["a", "b"])]).unwrap();
    read(ValueKind::File, "close", &file, &[]).unwrap();
    assert_eq!(read(ValueKind::File, "is_open", &file, &[]).unwrap(), Value::Bool(false));

    let file = free("open", &[Value::string(path.as_str()), Value::string("r")]).unwrap();
    assert_eq!(
        read(ValueKind::File, "read", &file, &[]).unwrap(),
        Value::string("hi a\nb\n")
    );
    let err = read(ValueKind::File, "write", &file, &[Value::string("x")]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Io);

    let moved = dir.join("moved.txt").display().to_string();
    free("move", &[Value::string(path.as_str()), Value::string(moved.as_str())]).unwrap();
    assert_eq!(free("ls", &[Value::string(dir_str.as_str())]).unwrap(), strs(&[moved.as_str()]));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn open_missing_file_is_io_error() {
    let err = free(
        "open",
        &[Value::string("/definitely/not/here.txt"), Value::string("r")],
    )
    .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Io);
}
