//! AST nodes consumed by the runtime.
//!
//! The tree is owned (`Box`/`Vec`); declaration and closure nodes sit
//! behind `Rc` so runtime function, class and closure values can keep
//! their blueprint alive cheaply.

mod attrs;
mod expr;
mod operators;
mod stmt;

pub use attrs::{Attrs, TypeAnn};
pub use expr::{ClosureExpr, Expr, ExprKind};
pub use operators::{BinaryOp, MutOp, UnaryOp};
pub use stmt::{ClassDecl, DefDecl, ForStmt, IfStmt, LetStmt, Stmt, StmtKind};

use crate::Span;

/// A parsed source file: ordered top-level statements.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

impl Program {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Program { stmts }
    }
}

/// `{ stmts }`
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Block { stmts, span }
    }
}

/// A function, method, constructor or closure parameter.
#[derive(Clone, PartialEq, Debug)]
pub struct Param {
    pub id: String,
    pub ty: Option<TypeAnn>,
    pub attrs: Attrs,
}

impl Param {
    /// Whether the parameter aliases the caller's variable.
    #[inline]
    pub fn is_ref(&self) -> bool {
        self.attrs.is_ref()
    }
}
