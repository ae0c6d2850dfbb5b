//! String and char members.
//!
//! Positions count characters, not bytes.

use earl_ir::Span;

use super::helpers::{checked_index, len_to_value, require_args, require_closure_arg, require_int_arg};
use super::{Intrinsics, MemberFn};
use crate::errors::{index_out_of_bounds, type_mismatch, wrong_arg_type, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{Value, ValueKind};

pub(super) fn register(table: &mut Intrinsics) {
    use MemberFn::{Apply, Mutate, Read};

    let s = ValueKind::Str;
    table.add_member(s, "len", Read(len));
    table.add_member(s, "nth", Read(nth));
    table.add_member(s, "split", Read(split));
    table.add_member(s, "substr", Read(substr));
    table.add_member(s, "back", Read(back));
    table.add_member(s, "rev", Read(rev));
    table.add_member(s, "contains", Read(contains));
    table.add_member(s, "trim", Read(trim));
    table.add_member(s, "pop", Mutate(pop));
    table.add_member(s, "append", Mutate(append));
    table.add_member(s, "filter", Apply(filter));
    table.add_member(s, "foreach", Apply(foreach));

    table.add_member(ValueKind::Char, "ascii", Read(ascii));
}

fn text(recv: &Value) -> Result<&str, EvalError> {
    match recv {
        Value::Str(s) => Ok(s),
        other => Err(type_mismatch("str", &other.type_name())),
    }
}

fn text_mut(recv: &mut Value) -> Result<&mut String, EvalError> {
    match recv {
        Value::Str(s) => Ok(s),
        other => Err(type_mismatch("str", &other.type_name())),
    }
}

/// Byte offset of the `i`th character.
fn byte_offset(s: &str, i: usize) -> usize {
    s.char_indices().nth(i).map_or(s.len(), |(offset, _)| offset)
}

fn len(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("len", 0, args)?;
    Ok(len_to_value(text(recv)?.chars().count()))
}

fn nth(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("nth", 1, args)?;
    let s = text(recv)?;
    let index = require_int_arg("nth", args, 0)?;
    let len = s.chars().count();
    s.chars()
        .nth(checked_index(index, len)?)
        .map(Value::Char)
        .ok_or_else(|| index_out_of_bounds(index, len))
}

/// Splits on every occurrence of the delimiter, keeping empty pieces.
fn split(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("split", 1, args)?;
    let s = text(recv)?;
    let delim = match &args[0] {
        Value::Str(d) if !d.is_empty() => d.clone(),
        Value::Char(c) => c.to_string(),
        _ => return Err(wrong_arg_type("split", "a non-empty str or char delimiter")),
    };
    Ok(Value::List(
        s.split(delim.as_str()).map(Value::string).collect(),
    ))
}

/// `s.substr(start, n)`: up to `n` characters from `start`.
fn substr(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("substr", 2, args)?;
    let s = text(recv)?;
    let start = require_int_arg("substr", args, 0)?;
    let count = require_int_arg("substr", args, 1)?;
    let len = s.chars().count();
    let start_at = usize::try_from(start)
        .ok()
        .filter(|&i| i <= len)
        .ok_or_else(|| index_out_of_bounds(start, len))?;
    let count = usize::try_from(count).map_err(|_| wrong_arg_type("substr", "a non-negative length"))?;
    Ok(Value::Str(s.chars().skip(start_at).take(count).collect()))
}

/// Last character, or `none` when empty.
fn back(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("back", 0, args)?;
    Ok(text(recv)?
        .chars()
        .next_back()
        .map_or_else(Value::none, Value::Char))
}

fn rev(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("rev", 0, args)?;
    Ok(Value::Str(text(recv)?.chars().rev().collect()))
}

/// `s.contains(c)` for a char, or a substring search for a str.
fn contains(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("contains", 1, args)?;
    let s = text(recv)?;
    match &args[0] {
        Value::Char(c) => Ok(Value::Bool(s.contains(*c))),
        Value::Str(needle) => Ok(Value::Bool(s.contains(needle.as_str()))),
        _ => Err(wrong_arg_type("contains", "a char or str argument")),
    }
}

fn trim(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("trim", 0, args)?;
    Ok(Value::string(text(recv)?.trim()))
}

/// `s.pop(i)` removes the character at `i`.
fn pop(recv: &mut Value, args: &[Value]) -> EvalResult {
    require_args("pop", 1, args)?;
    let s = text_mut(recv)?;
    let i = checked_index(require_int_arg("pop", args, 0)?, s.chars().count())?;
    s.remove(byte_offset(s, i));
    Ok(Value::Unit)
}

/// `s.append(x, ...)` with str or char arguments.
fn append(recv: &mut Value, args: &[Value]) -> EvalResult {
    let s = text_mut(recv)?;
    for arg in args {
        match arg {
            Value::Str(tail) => s.push_str(tail),
            Value::Char(c) => s.push(*c),
            other => return Err(type_mismatch("str or char", &other.type_name())),
        }
    }
    Ok(Value::Unit)
}

fn filter(interp: &mut Interpreter, recv: &Value, args: &[Value], span: Span) -> EvalResult {
    require_args("filter", 1, args)?;
    let closure = require_closure_arg("filter", args, 0)?;
    let mut kept = String::new();
    for c in text(recv)?.chars() {
        if interp.call_closure(&closure, vec![Value::Char(c)], span)?.boolean() {
            kept.push(c);
        }
    }
    Ok(Value::Str(kept))
}

fn foreach(interp: &mut Interpreter, recv: &Value, args: &[Value], span: Span) -> EvalResult {
    require_args("foreach", 1, args)?;
    let closure = require_closure_arg("foreach", args, 0)?;
    for c in text(recv)?.chars() {
        interp.call_closure(&closure, vec![Value::Char(c)], span)?;
    }
    Ok(Value::Unit)
}

fn ascii(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("ascii", 0, args)?;
    match recv {
        Value::Char(c) => Ok(Value::Int(i64::from(u32::from(*c)))),
        other => Err(type_mismatch("char", &other.type_name())),
    }
}
