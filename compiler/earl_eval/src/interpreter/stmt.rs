//! Statement execution and control flow.

use std::rc::Rc;

use earl_ir::{Attrs, Block, Expr, ForStmt, IfStmt, LetStmt, Stmt, StmtKind};

use super::{Flow, Interpreter};
use crate::context::{ContextRef, Function, ScopeGuard, Variable};
use crate::errors::{range_bound_not_int, EvalError};
use crate::value::{check_ann, Value};

type FlowResult = Result<Flow, EvalError>;

impl Interpreter {
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt, ctx: &ContextRef) -> FlowResult {
        self.exec_stmt_inner(stmt, ctx)
            .map_err(|e| e.with_span(stmt.span))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt, ctx: &ContextRef) -> FlowResult {
        match &stmt.kind {
            StmtKind::Let(let_stmt) => {
                self.exec_let(let_stmt, ctx)?;
                Ok(Flow::Normal(Value::Unit))
            }
            StmtKind::Mut { left, op, right } => {
                let rhs = self.eval_expr(right, ctx)?;
                let place = self.eval_lvalue(left, ctx)?;
                place.assign(*op, rhs)?;
                Ok(Flow::Normal(Value::Unit))
            }
            StmtKind::Def(decl) => {
                ctx.function_add(Rc::new(Function::new(Rc::clone(decl), ctx)))?;
                Ok(Flow::Normal(Value::Unit))
            }
            StmtKind::Class(decl) => {
                ctx.define_class(Rc::clone(decl))?;
                Ok(Flow::Normal(Value::Unit))
            }
            StmtKind::If(if_stmt) => self.exec_if(if_stmt, ctx),
            StmtKind::While { cond, body } => self.exec_while(cond, body, ctx),
            StmtKind::For(for_stmt) => self.exec_for(for_stmt, ctx),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, ctx)?,
                    None => Value::Unit,
                };
                Ok(Flow::Return(value))
            }
            StmtKind::Expr(expr) => self.eval_expr(expr, ctx).map(Flow::Normal),
            StmtKind::Import { path } => {
                self.exec_import(path, ctx)?;
                Ok(Flow::Normal(Value::Unit))
            }
            StmtKind::Module { id } => {
                ctx.set_module_name(id);
                Ok(Flow::Normal(Value::Unit))
            }
            StmtKind::Block(block) => self.exec_scoped_block(block, ctx),
        }
    }

    fn exec_let(&mut self, stmt: &LetStmt, ctx: &ContextRef) -> Result<(), EvalError> {
        let value = self.eval_expr(&stmt.expr, ctx)?;
        let value = check_ann(value, stmt.ty.as_ref())?;
        ctx.variable_add(Variable::new(stmt.id.as_str(), value, stmt.attrs))
    }

    /// Run the statements of `block` in the current scope, stopping at the
    /// first `return`.
    pub(crate) fn exec_block(&mut self, block: &Block, ctx: &ContextRef) -> FlowResult {
        for stmt in &block.stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt, ctx)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal(Value::Unit))
    }

    /// Run `block` in a fresh scope that is popped on every exit path.
    pub(crate) fn exec_scoped_block(&mut self, block: &Block, ctx: &ContextRef) -> FlowResult {
        let _scope = ScopeGuard::new(ctx);
        self.exec_block(block, ctx)
    }

    fn exec_if(&mut self, stmt: &IfStmt, ctx: &ContextRef) -> FlowResult {
        if self.eval_expr(&stmt.cond, ctx)?.boolean() {
            self.exec_scoped_block(&stmt.then, ctx)
        } else if let Some(else_) = &stmt.else_ {
            self.exec_scoped_block(else_, ctx)
        } else {
            Ok(Flow::Normal(Value::Unit))
        }
    }

    fn exec_while(&mut self, cond: &Expr, body: &Block, ctx: &ContextRef) -> FlowResult {
        while self.eval_expr(cond, ctx)?.boolean() {
            if let Flow::Return(value) = self.exec_scoped_block(body, ctx)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal(Value::Unit))
    }

    /// `for i in start..end`: `i` runs from `start` up to, but not
    /// including, `end`. The bounds are evaluated once.
    fn exec_for(&mut self, stmt: &ForStmt, ctx: &ContextRef) -> FlowResult {
        let start = self.eval_expr(&stmt.start, ctx)?;
        let end = self.eval_expr(&stmt.end, ctx)?;
        let (Value::Int(start), Value::Int(end)) = (&start, &end) else {
            let offender = if start.as_int().is_none() { &start } else { &end };
            return Err(range_bound_not_int(&offender.type_name()));
        };

        let _loop_scope = ScopeGuard::new(ctx);
        let enumerator = Variable::new(stmt.enumerator.as_str(), Value::Int(*start), Attrs::empty());
        ctx.variable_add(enumerator.clone())?;
        for i in *start..*end {
            enumerator.with_mut(|slot| {
                *slot = Value::Int(i);
                Ok(())
            })?;
            if let Flow::Return(value) = self.exec_scoped_block(&stmt.body, ctx)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal(Value::Unit))
    }
}
