//! Unary operators.

use earl_ir::UnaryOp;

use crate::errors::{invalid_unary_op, EvalResult};
use crate::value::Value;

/// Evaluate `op value`. `!` works on every value through truthiness.
pub fn evaluate_unary(value: &Value, op: UnaryOp) -> EvalResult {
    match (op, value) {
        (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Not, v) => Ok(Value::Bool(!v.boolean())),
        (UnaryOp::BitNot, Value::Int(n)) => Ok(Value::Int(!n)),
        (op, v) => Err(invalid_unary_op(op, &v.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use earl_ir::UnaryOp;
    use pretty_assertions::assert_eq;

    use super::evaluate_unary;
    use crate::errors::ErrorCategory;
    use crate::value::Value;

    #[test]
    fn negation_wraps_at_min() {
        assert_eq!(
            evaluate_unary(&Value::Int(i64::MIN), UnaryOp::Neg).ok(),
            Some(Value::Int(i64::MIN))
        );
        assert_eq!(
            evaluate_unary(&Value::Float(1.5), UnaryOp::Neg).ok(),
            Some(Value::Float(-1.5))
        );
    }

    #[test]
    fn not_uses_truthiness() {
        assert_eq!(
            evaluate_unary(&Value::Int(0), UnaryOp::Not).ok(),
            Some(Value::Bool(true))
        );
        assert_eq!(
            evaluate_unary(&Value::List(vec![Value::Int(1)]), UnaryOp::Not).ok(),
            Some(Value::Bool(false))
        );
        assert_eq!(
            evaluate_unary(&Value::none(), UnaryOp::Not).ok(),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn invalid_operand_is_fatal() {
        let err = evaluate_unary(&Value::string("x"), UnaryOp::Neg).err();
        assert_eq!(err.map(|e| e.category()), Some(ErrorCategory::Fatal));
        let err = evaluate_unary(&Value::Float(1.0), UnaryOp::BitNot).err();
        assert_eq!(err.map(|e| e.category()), Some(ErrorCategory::Fatal));
    }
}
