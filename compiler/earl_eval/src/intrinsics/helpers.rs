//! Argument validation shared by the intrinsics.

use std::rc::Rc;

use crate::errors::{index_out_of_bounds, wrong_arg_count, wrong_arg_type, EvalError};
use crate::value::{ClosureValue, Value};

/// Fail with `ArityError` unless exactly `expected` arguments were passed.
#[inline]
pub fn require_args(name: &str, expected: usize, args: &[Value]) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(wrong_arg_count(name, expected, args.len()))
    }
}

pub fn require_int_arg(name: &str, args: &[Value], index: usize) -> Result<i64, EvalError> {
    match args.get(index) {
        Some(Value::Int(n)) => Ok(*n),
        _ => Err(wrong_arg_type(name, "an int argument")),
    }
}

pub fn require_str_arg<'a>(name: &str, args: &'a [Value], index: usize) -> Result<&'a str, EvalError> {
    match args.get(index) {
        Some(Value::Str(s)) => Ok(s),
        _ => Err(wrong_arg_type(name, "a str argument")),
    }
}

pub fn require_closure_arg(
    name: &str,
    args: &[Value],
    index: usize,
) -> Result<Rc<ClosureValue>, EvalError> {
    match args.get(index) {
        Some(Value::Closure(cl)) => Ok(Rc::clone(cl)),
        _ => Err(wrong_arg_type(name, "a closure argument")),
    }
}

/// Convert a length to a `Value::Int`, saturating at `i64::MAX`.
#[inline]
pub fn len_to_value(len: usize) -> Value {
    Value::Int(i64::try_from(len).unwrap_or(i64::MAX))
}

/// Validate `index` against `len` and convert it to a `usize`.
pub fn checked_index(index: i64, len: usize) -> Result<usize, EvalError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| index_out_of_bounds(index, len))
}
