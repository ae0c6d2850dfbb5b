//! Expression evaluation.

use std::rc::Rc;

use earl_ir::{BinaryOp, Expr, ExprKind, TypeAnn};

use super::place::Place;
use super::{Arg, Interpreter};
use crate::context::ContextRef;
use crate::errors::{not_assignable, type_mismatch, undeclared_variable, EvalError, EvalResult};
use crate::operators::evaluate_binary;
use crate::stack::ensure_sufficient_stack;
use crate::unary_operators::evaluate_unary;
use crate::value::{ClosureValue, DictValue, KeyKind, Value};

impl Interpreter {
    /// Evaluate an expression in `ctx`. Errors carry the innermost span.
    pub fn eval_expr(&mut self, expr: &Expr, ctx: &ContextRef) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr, ctx))
            .map_err(|e| e.with_span(expr.span))
    }

    fn eval_expr_inner(&mut self, expr: &Expr, ctx: &ContextRef) -> EvalResult {
        match &expr.kind {
            ExprKind::Ident(name) => eval_ident(name, ctx),
            ExprKind::IntLit(n) => Ok(Value::Int(*n)),
            ExprKind::FloatLit(f) => Ok(Value::Float(*f)),
            ExprKind::StrLit(s) => Ok(Value::string(s.as_str())),
            ExprKind::CharLit(c) => Ok(Value::Char(*c)),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::NoneLit => Ok(Value::none()),

            ExprKind::Binary { lhs, op, rhs } => self.eval_binary(lhs, *op, rhs, ctx),
            ExprKind::Unary { op, expr: operand } => {
                let value = self.eval_expr(operand, ctx)?;
                evaluate_unary(&value, *op)
            }

            ExprKind::FuncCall { id, args } => {
                let args = self.eval_args(args, ctx)?;
                self.eval_call(id, args, ctx, expr.span)
            }
            ExprKind::Get { left, right } => self.eval_get(left, right, ctx),
            ExprKind::ArrayAccess { .. } => self.eval_place(expr, ctx)?.get(),

            ExprKind::ListLit(elems) => self.eval_seq(elems, ctx).map(Value::List),
            ExprKind::TupleLit(elems) => self.eval_seq(elems, ctx).map(Value::Tuple),
            ExprKind::DictLit { key_type, entries } => {
                self.eval_dict(key_type.as_ref(), entries, ctx)
            }
            ExprKind::ClosureLit(closure) => Ok(Value::Closure(Rc::new(ClosureValue::new(
                Rc::clone(closure),
                ctx,
            )))),
        }
    }

    /// `&&` and `||` short-circuit; everything else evaluates both sides
    /// left to right.
    fn eval_binary(&mut self, lhs: &Expr, op: BinaryOp, rhs: &Expr, ctx: &ContextRef) -> EvalResult {
        let left = self.eval_expr(lhs, ctx)?;
        match op {
            BinaryOp::And if !left.boolean() => Ok(Value::Bool(false)),
            BinaryOp::Or if left.boolean() => Ok(Value::Bool(true)),
            BinaryOp::And | BinaryOp::Or => Ok(Value::Bool(self.eval_expr(rhs, ctx)?.boolean())),
            _ => {
                let right = self.eval_expr(rhs, ctx)?;
                evaluate_binary(&left, &right, op)
            }
        }
    }

    fn eval_seq(&mut self, elems: &[Expr], ctx: &ContextRef) -> Result<Vec<Value>, EvalError> {
        elems.iter().map(|e| self.eval_expr(e, ctx)).collect()
    }

    fn eval_dict(
        &mut self,
        key_type: Option<&TypeAnn>,
        entries: &[(Expr, Expr)],
        ctx: &ContextRef,
    ) -> EvalResult {
        let key_kind = match key_type {
            None | Some(TypeAnn::Any) => None,
            Some(TypeAnn::Int) => Some(KeyKind::Int),
            Some(TypeAnn::Bool) => Some(KeyKind::Bool),
            Some(TypeAnn::Char) => Some(KeyKind::Char),
            Some(TypeAnn::Str) => Some(KeyKind::Str),
            Some(other) => return Err(type_mismatch("a hashable key type", &other.to_string())),
        };
        let mut dict = DictValue::new(key_kind);
        for (key, value) in entries {
            let key = self.eval_expr(key, ctx)?;
            let value = self.eval_expr(value, ctx)?;
            dict.insert(&key, value)?;
        }
        Ok(Value::dict(dict))
    }

    /// Evaluate call arguments left to right, remembering which ones were
    /// bare variable names.
    pub(crate) fn eval_args(&mut self, args: &[Expr], ctx: &ContextRef) -> Result<Vec<Arg>, EvalError> {
        args.iter()
            .map(|arg| {
                let value = self.eval_expr(arg, ctx)?;
                let var = arg
                    .as_ident()
                    .filter(|name| ctx.import_lookup(name).is_none())
                    .and_then(|name| ctx.variable_lookup(name));
                Ok(Arg { value, var })
            })
            .collect()
    }

    /// Resolve an lvalue expression to a [`Place`]. Anything else becomes a
    /// temporary.
    pub(crate) fn eval_place(&mut self, expr: &Expr, ctx: &ContextRef) -> Result<Place, EvalError> {
        let place = match &expr.kind {
            ExprKind::Ident(name) if ctx.import_lookup(name).is_none() => {
                match ctx.variable_lookup(name) {
                    Some(var) => Place::var(var),
                    None => Place::temp(eval_ident(name, ctx)?),
                }
            }
            ExprKind::ArrayAccess { left, index } => {
                let mut place = self.eval_place(left, ctx)?;
                let index = self.eval_expr(index, ctx)?;
                place.push_index(index);
                place
            }
            ExprKind::Get { left, right } if right.as_ident().is_some() => {
                self.eval_field_place(left, right, ctx)?
            }
            _ => Place::temp(self.eval_expr(expr, ctx)?),
        };
        Ok(place)
    }

    /// Resolve the left side of an assignment. Only variables, index
    /// positions and fields are assignable; there are no temporaries.
    pub(crate) fn eval_lvalue(
        &mut self,
        expr: &Expr,
        ctx: &ContextRef,
    ) -> Result<Place, EvalError> {
        match &expr.kind {
            ExprKind::Ident(name) => {
                if ctx.import_lookup(name).is_some() {
                    return Err(not_assignable(&format!("module `{name}`")));
                }
                match ctx.variable_lookup(name) {
                    Some(var) => Ok(Place::var(var)),
                    None if name == "this" && ctx.enclosing_class().is_some() => {
                        Err(not_assignable("`this`"))
                    }
                    None => Err(undeclared_variable(name)),
                }
            }
            ExprKind::ArrayAccess { left, index } => {
                let mut place = self.eval_lvalue(left, ctx)?;
                let index = self.eval_expr(index, ctx)?;
                place.push_index(index);
                Ok(place)
            }
            ExprKind::Get { left, right } if right.as_ident().is_some() => {
                self.eval_field_place(left, right, ctx)
            }
            _ => Err(not_assignable(non_place_label(&expr.kind))),
        }
    }
}

fn non_place_label(kind: &ExprKind) -> &'static str {
    match kind {
        ExprKind::FuncCall { .. } => "a call",
        ExprKind::Get { .. } => "a method call",
        ExprKind::Binary { .. } | ExprKind::Unary { .. } => "an operator expression",
        ExprKind::ClosureLit(_) => "a closure",
        _ => "a literal",
    }
}

/// Module names shadow variables; `this` names the enclosing instance.
fn eval_ident(name: &str, ctx: &ContextRef) -> EvalResult {
    if let Some(module) = ctx.import_lookup(name) {
        return Ok(Value::Module(module));
    }
    if let Some(var) = ctx.variable_lookup(name) {
        return Ok(var.get());
    }
    if name == "this" {
        if let Some(instance) = ctx.enclosing_class() {
            return Ok(Value::Class(instance));
        }
    }
    Err(undeclared_variable(name))
}
