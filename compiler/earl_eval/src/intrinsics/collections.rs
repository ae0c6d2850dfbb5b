//! List and tuple members.

use earl_ir::Span;

use super::helpers::{checked_index, len_to_value, require_args, require_closure_arg, require_int_arg};
use super::{Intrinsics, MemberFn};
use crate::errors::{type_mismatch, wrong_arg_type, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{Value, ValueKind};

pub(super) fn register(table: &mut Intrinsics) {
    use MemberFn::{Apply, Mutate, Read};

    for kind in [ValueKind::List, ValueKind::Tuple] {
        table.add_member(kind, "len", Read(len));
        table.add_member(kind, "nth", Read(nth));
        table.add_member(kind, "back", Read(back));
        table.add_member(kind, "rev", Read(rev));
    }

    let list = ValueKind::List;
    table.add_member(list, "append", Mutate(append));
    table.add_member(list, "pop", Mutate(pop));
    table.add_member(list, "contains", Read(contains));
    table.add_member(list, "sum", Read(sum));
    table.add_member(list, "filter", Apply(filter));
    table.add_member(list, "map", Apply(map));
    table.add_member(list, "foreach", Apply(foreach));
    table.add_member(list, "fold", Apply(fold));
}

fn items(recv: &Value) -> Result<&[Value], EvalError> {
    match recv {
        Value::List(xs) | Value::Tuple(xs) => Ok(xs),
        other => Err(type_mismatch("list or tuple", &other.type_name())),
    }
}

fn list_mut(recv: &mut Value) -> Result<&mut Vec<Value>, EvalError> {
    match recv {
        Value::List(xs) => Ok(xs),
        other => Err(type_mismatch("list", &other.type_name())),
    }
}

fn len(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("len", 0, args)?;
    Ok(len_to_value(items(recv)?.len()))
}

fn nth(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("nth", 1, args)?;
    let xs = items(recv)?;
    let i = checked_index(require_int_arg("nth", args, 0)?, xs.len())?;
    Ok(xs[i].clone())
}

/// Last element, or `none` when empty.
fn back(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("back", 0, args)?;
    Ok(items(recv)?.last().cloned().unwrap_or_else(Value::none))
}

/// A reversed copy; the receiver is left alone.
fn rev(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("rev", 0, args)?;
    let reversed = items(recv)?.iter().rev().cloned().collect();
    Ok(match recv {
        Value::Tuple(_) => Value::Tuple(reversed),
        _ => Value::List(reversed),
    })
}

/// `xs.append(a, b, ...)`
fn append(recv: &mut Value, args: &[Value]) -> EvalResult {
    list_mut(recv)?.extend(args.iter().cloned());
    Ok(Value::Unit)
}

/// `xs.pop(i)` removes the element at `i`.
fn pop(recv: &mut Value, args: &[Value]) -> EvalResult {
    require_args("pop", 1, args)?;
    let xs = list_mut(recv)?;
    let i = checked_index(require_int_arg("pop", args, 0)?, xs.len())?;
    xs.remove(i);
    Ok(Value::Unit)
}

fn contains(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("contains", 1, args)?;
    Ok(Value::Bool(items(recv)?.contains(&args[0])))
}

/// Sum of a numeric list. All ints give an int (wrapping); any float makes
/// the result a float. The empty sum is `0`.
#[expect(clippy::cast_precision_loss, reason = "ints promote once a float is seen")]
fn sum(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("sum", 0, args)?;
    let mut total = Value::Int(0);
    for x in items(recv)? {
        total = match (&total, x) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(*b)),
            (Value::Int(a), Value::Float(b)) => Value::Float(*a as f64 + b),
            (Value::Float(a), Value::Int(b)) => Value::Float(a + *b as f64),
            (Value::Float(a), Value::Float(b)) => Value::Float(a + b),
            _ => return Err(wrong_arg_type("sum", "a list of numbers")),
        };
    }
    Ok(total)
}

fn filter(interp: &mut Interpreter, recv: &Value, args: &[Value], span: Span) -> EvalResult {
    require_args("filter", 1, args)?;
    let closure = require_closure_arg("filter", args, 0)?;
    let mut kept = Vec::new();
    for x in items(recv)? {
        if interp.call_closure(&closure, vec![x.clone()], span)?.boolean() {
            kept.push(x.clone());
        }
    }
    Ok(Value::List(kept))
}

fn map(interp: &mut Interpreter, recv: &Value, args: &[Value], span: Span) -> EvalResult {
    require_args("map", 1, args)?;
    let closure = require_closure_arg("map", args, 0)?;
    items(recv)?
        .iter()
        .map(|x| interp.call_closure(&closure, vec![x.clone()], span))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

fn foreach(interp: &mut Interpreter, recv: &Value, args: &[Value], span: Span) -> EvalResult {
    require_args("foreach", 1, args)?;
    let closure = require_closure_arg("foreach", args, 0)?;
    for x in items(recv)? {
        interp.call_closure(&closure, vec![x.clone()], span)?;
    }
    Ok(Value::Unit)
}

/// `xs.fold(|acc, x| ..., init)`
fn fold(interp: &mut Interpreter, recv: &Value, args: &[Value], span: Span) -> EvalResult {
    require_args("fold", 2, args)?;
    let closure = require_closure_arg("fold", args, 0)?;
    let mut acc = args[1].clone();
    for x in items(recv)? {
        acc = interp.call_closure(&closure, vec![acc, x.clone()], span)?;
    }
    Ok(acc)
}
