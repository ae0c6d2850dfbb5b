//! Free intrinsics: output, assertions, conversions and process control.

use super::helpers::{len_to_value, require_args, require_int_arg};
use super::Intrinsics;
use crate::errors::{assertion_failed, exit_signal, wrong_arg_type, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) fn register(table: &mut Intrinsics) {
    table.add_free("print", print);
    table.add_free("assert", assert);
    table.add_free("len", len);
    table.add_free("argv", argv);
    table.add_free("int", to_int);
    table.add_free("float", to_float);
    table.add_free("str", to_str);
    table.add_free("bool", to_bool);
    table.add_free("char", to_char);
    table.add_free("some", some);
    table.add_free("type", type_of);
    table.add_free("copy", copy);
    table.add_free("exit", exit);
    table.add_free("input", input);
    table.add_free("unimplemented", unimplemented);
}

fn concat(args: &[Value]) -> String {
    args.iter().map(ToString::to_string).collect()
}

/// `print(a, b, ...)`: the arguments back to back, then a newline.
fn print(interp: &mut Interpreter, args: &[Value]) -> EvalResult {
    interp.print_handler().println(&concat(args));
    Ok(Value::Unit)
}

/// `assert(a, b, ...)`: every argument must be truthy.
fn assert(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    if let Some((i, arg)) = args.iter().enumerate().find(|(_, arg)| !arg.boolean()) {
        return Err(assertion_failed(format!(
            "argument {} ({}) is falsy",
            i + 1,
            arg.type_name()
        )));
    }
    Ok(Value::Unit)
}

fn len(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("len", 1, args)?;
    match &args[0] {
        Value::Str(s) => Ok(len_to_value(s.chars().count())),
        Value::List(xs) | Value::Tuple(xs) => Ok(len_to_value(xs.len())),
        Value::Dict(d) => Ok(len_to_value(d.len())),
        _ => Err(wrong_arg_type("len", "a str, list, tuple or dict")),
    }
}

fn argv(interp: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("argv", 0, args)?;
    Ok(Value::List(
        interp.argv().iter().map(|a| Value::string(a.as_str())).collect(),
    ))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "int(x) truncates floats toward zero"
)]
fn to_int(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("int", 1, args)?;
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(f) => Ok(Value::Int(*f as i64)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Char(c) => Ok(Value::Int(i64::from(u32::from(*c)))),
        Value::Str(s) => s
            .trim()
            .parse()
            .map(Value::Int)
            .map_err(|_| wrong_arg_type("int", "a str holding an integer")),
        _ => Err(wrong_arg_type("int", "an int, float, bool, char or str")),
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "float(x) is the explicit conversion"
)]
fn to_float(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("float", 1, args)?;
    match &args[0] {
        Value::Int(n) => Ok(Value::Float(*n as f64)),
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Str(s) => s
            .trim()
            .parse()
            .map(Value::Float)
            .map_err(|_| wrong_arg_type("float", "a str holding a number")),
        _ => Err(wrong_arg_type("float", "an int, float or str")),
    }
}

fn to_str(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("str", 1, args)?;
    Ok(Value::Str(args[0].to_string()))
}

fn to_bool(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("bool", 1, args)?;
    Ok(Value::Bool(args[0].boolean()))
}

fn to_char(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("char", 1, args)?;
    match &args[0] {
        Value::Char(c) => Ok(Value::Char(*c)),
        Value::Int(n) => u32::try_from(*n)
            .ok()
            .and_then(char::from_u32)
            .map(Value::Char)
            .ok_or_else(|| wrong_arg_type("char", "an int that is a valid code point")),
        Value::Str(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(wrong_arg_type("char", "a str of exactly one character")),
            }
        }
        _ => Err(wrong_arg_type("char", "a char, int or str")),
    }
}

fn some(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("some", 1, args)?;
    Ok(Value::some(args[0].clone()))
}

fn type_of(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("type", 1, args)?;
    Ok(Value::Str(args[0].type_name()))
}

fn copy(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("copy", 1, args)?;
    Ok(args[0].copy())
}

/// `exit(code)` unwinds the whole evaluation as an `Exit` signal.
fn exit(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("exit", 1, args)?;
    let code = require_int_arg("exit", args, 0)?;
    let code = i32::try_from(code).map_err(|_| wrong_arg_type("exit", "a 32-bit exit code"))?;
    Err(exit_signal(code))
}

/// `input(prompt...)`: print the prompt without a newline and read one line.
///
/// At end of input the result is an empty string.
fn input(interp: &mut Interpreter, args: &[Value]) -> EvalResult {
    if !args.is_empty() {
        interp.print_handler().print(&concat(args));
    }
    let line = interp.read_line()?.unwrap_or_default();
    Ok(Value::Str(line))
}

fn unimplemented(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    let detail = concat(args);
    Err(if detail.is_empty() {
        EvalError::new("unimplemented")
    } else {
        EvalError::new(format!("unimplemented: {detail}"))
    })
}
