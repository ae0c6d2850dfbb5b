//! EARL IR - the syntax tree handed to the runtime.
//!
//! The lexer and parser live outside this workspace. Whatever front end is
//! used, it produces a [`Program`] made of the node types in this crate and
//! the evaluator in `earl_eval` walks it.
//!
//! - Spans for source locations
//! - Statements and expressions ([`Stmt`], [`Expr`])
//! - Operators and assignment operators
//! - Declaration attributes (`pub`, `const`, `ref`)
//! - Runtime-checked type annotations
//!
//! Declarations (`def`, `class`) and closure bodies are stored behind `Rc`
//! so the runtime can hold on to a blueprint without cloning the subtree.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
pub mod build;
mod span;

pub use ast::{
    Attrs, BinaryOp, Block, ClassDecl, ClosureExpr, DefDecl, Expr, ExprKind, ForStmt, IfStmt,
    LetStmt, MutOp, Param, Program, Stmt, StmtKind, TypeAnn, UnaryOp,
};
pub use span::{Span, SpanError};
