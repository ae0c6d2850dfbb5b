//! Binary operators.
//!
//! Direct enum dispatch over the operand pair. Operands must be
//! type-compatible (see [`Value::type_is_compatible`]); an operator the
//! pair does not support is fatal.
//!
//! Integer `+ - *` wrap at 64 bits. `/` and `%` by zero are arithmetic
//! errors for both integers and floats. Mixed int/float operands promote
//! the int.

use earl_ir::BinaryOp;

use crate::errors::{
    binary_type_mismatch, division_by_zero, invalid_arithmetic, invalid_binary_op,
    modulo_by_zero, EvalError, EvalResult,
};
use crate::value::Value;

/// Evaluate `left op right`.
///
/// `&&` and `||` are accepted for any operands and use truthiness; the
/// evaluator short-circuits them before both sides are computed.
#[expect(
    clippy::cast_precision_loss,
    reason = "mixed int/float arithmetic promotes the int"
)]
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::And => return Ok(Value::Bool(left.boolean() && right.boolean())),
        BinaryOp::Or => return Ok(Value::Bool(left.boolean() || right.boolean())),
        _ => {}
    }

    if !left.type_is_compatible(right) {
        return Err(binary_type_mismatch(
            op,
            &left.type_name(),
            &right.type_name(),
        ));
    }

    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Float(a), Value::Float(b)) => eval_float_binary(*a, *b, op),
        (Value::Int(a), Value::Float(b)) => eval_float_binary(*a as f64, *b, op),
        (Value::Float(a), Value::Int(b)) => eval_float_binary(*a, *b as f64, op),
        (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(*a, *b, op),
        (Value::Char(a), Value::Char(b)) => eval_char_binary(*a, *b, op),
        (Value::Str(a), Value::Str(b)) => eval_str_binary(a, b, op),
        (Value::Str(a), Value::Char(b)) => eval_str_char_binary(a, *b, op, false),
        (Value::Char(a), Value::Str(b)) => eval_str_char_binary(b, *a, op, true),
        (Value::List(a), Value::List(b)) => eval_seq_binary(a, b, op, Value::List, "list"),
        (Value::Tuple(a), Value::Tuple(b)) => eval_seq_binary(a, b, op, Value::Tuple, "tuple"),
        _ => eval_equality(left, right, op),
    }
}

/// `==` and `!=` for kinds that support nothing else.
fn eval_equality(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        _ => Err(invalid_binary_op(op, &left.type_name())),
    }
}

#[inline]
fn int_div(a: i64, b: i64, zero: fn() -> EvalError, f: fn(i64, i64) -> i64) -> EvalResult {
    if b == 0 {
        Err(zero())
    } else {
        Ok(Value::Int(f(a, b)))
    }
}

fn shift_amount(b: i64) -> Result<u32, EvalError> {
    u32::try_from(b)
        .ok()
        .filter(|&s| s < 64)
        .ok_or_else(|| invalid_arithmetic(format!("shift amount {b} out of range (0-63)")))
}

fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Int(a.wrapping_add(b))),
        BinaryOp::Sub => Ok(Value::Int(a.wrapping_sub(b))),
        BinaryOp::Mul => Ok(Value::Int(a.wrapping_mul(b))),
        BinaryOp::Div => int_div(a, b, division_by_zero, i64::wrapping_div),
        BinaryOp::Mod => int_div(a, b, modulo_by_zero, i64::wrapping_rem),
        BinaryOp::Pow => {
            let exp = u32::try_from(b).map_err(|_| {
                invalid_arithmetic(format!("exponent {b} must be between 0 and {}", u32::MAX))
            })?;
            Ok(Value::Int(a.wrapping_pow(exp)))
        }
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        BinaryOp::BitAnd => Ok(Value::Int(a & b)),
        BinaryOp::BitOr => Ok(Value::Int(a | b)),
        BinaryOp::BitXor => Ok(Value::Int(a ^ b)),
        BinaryOp::Shl => Ok(Value::Int(a.wrapping_shl(shift_amount(b)?))),
        BinaryOp::Shr => Ok(Value::Int(a.wrapping_shr(shift_amount(b)?))),
        BinaryOp::And | BinaryOp::Or => Err(invalid_binary_op(op, "int")),
    }
}

#[allow(clippy::float_cmp, reason = "language equality is exact")]
fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div if b == 0.0 => Err(division_by_zero()),
        BinaryOp::Div => Ok(Value::Float(a / b)),
        BinaryOp::Mod if b == 0.0 => Err(modulo_by_zero()),
        BinaryOp::Mod => Ok(Value::Float(a % b)),
        BinaryOp::Pow => Ok(Value::Float(a.powf(b))),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        _ => Err(invalid_binary_op(op, "float")),
    }
}

fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::BitAnd => Ok(Value::Bool(a & b)),
        BinaryOp::BitOr => Ok(Value::Bool(a | b)),
        BinaryOp::BitXor => Ok(Value::Bool(a ^ b)),
        _ => Err(invalid_binary_op(op, "bool")),
    }
}

fn eval_char_binary(a: char, b: char, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Str([a, b].iter().collect())),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        _ => Err(invalid_binary_op(op, "char")),
    }
}

fn eval_str_binary(a: &str, b: &str, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => {
            let mut out = String::with_capacity(a.len() + b.len());
            out.push_str(a);
            out.push_str(b);
            Ok(Value::Str(out))
        }
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        _ => Err(invalid_binary_op(op, "str")),
    }
}

/// `str op char`, or `char op str` when `char_first` is set.
fn eval_str_char_binary(s: &str, c: char, op: BinaryOp, char_first: bool) -> EvalResult {
    match op {
        BinaryOp::Add => {
            let mut out = String::with_capacity(s.len() + c.len_utf8());
            if char_first {
                out.push(c);
                out.push_str(s);
            } else {
                out.push_str(s);
                out.push(c);
            }
            Ok(Value::Str(out))
        }
        BinaryOp::Eq | BinaryOp::NotEq => {
            let equal = Value::Str(s.to_string()) == Value::Char(c);
            Ok(Value::Bool(equal == (op == BinaryOp::Eq)))
        }
        _ => Err(invalid_binary_op(op, "str")),
    }
}

fn eval_seq_binary(
    a: &[Value],
    b: &[Value],
    op: BinaryOp,
    wrap: fn(Vec<Value>) -> Value,
    type_name: &str,
) -> EvalResult {
    match op {
        BinaryOp::Add => {
            let mut out = Vec::with_capacity(a.len() + b.len());
            out.extend_from_slice(a);
            out.extend_from_slice(b);
            Ok(wrap(out))
        }
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        _ => Err(invalid_binary_op(op, type_name)),
    }
}
