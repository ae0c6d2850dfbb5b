//! Assignment rules.
//!
//! `mutate` is plain `=`: the slot keeps its kind, so the new value must
//! be of the same kind (an int may be stored into a float slot). Compound
//! assignment goes through the binary operator and then `mutate`, with
//! in-place fast paths for appending to strings and lists.

use earl_ir::MutOp;

use crate::errors::{type_mismatch, EvalError};
use crate::operators::evaluate_binary;
use crate::value::Value;

/// Replace the contents of `target` with `new`.
#[expect(clippy::cast_precision_loss, reason = "int stored into a float slot")]
pub fn mutate(target: &mut Value, new: Value) -> Result<(), EvalError> {
    let compatible = match (&*target, &new) {
        (Value::Float(_), Value::Int(_)) => true,
        (Value::Class(old), Value::Class(new)) => old.class_name() == new.class_name(),
        (old, new) => old.kind() == new.kind(),
    };
    if !compatible {
        return Err(type_mismatch(&target.type_name(), &new.type_name()));
    }
    *target = match new {
        Value::Int(n) if matches!(target, Value::Float(_)) => Value::Float(n as f64),
        other => other,
    };
    Ok(())
}

/// Apply a compound assignment (`+=`, `-=`, ...) to `target`.
///
/// Plain `=` is forwarded to [`mutate`].
pub fn mutate_with(target: &mut Value, op: MutOp, rhs: Value) -> Result<(), EvalError> {
    let Some(bin) = op.binary_op() else {
        return mutate(target, rhs);
    };
    if op == MutOp::AddAssign {
        match (&mut *target, &rhs) {
            (Value::Str(s), Value::Str(tail)) => {
                s.push_str(tail);
                return Ok(());
            }
            (Value::Str(s), Value::Char(c)) => {
                s.push(*c);
                return Ok(());
            }
            (Value::List(xs), Value::List(tail)) => {
                xs.extend(tail.iter().cloned());
                return Ok(());
            }
            _ => {}
        }
    }
    let result = evaluate_binary(target, &rhs, bin)?;
    mutate(target, result)
}
