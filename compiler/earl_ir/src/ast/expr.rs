//! Expression nodes.

use std::fmt;
use std::rc::Rc;

use super::{Block, Param, TypeAnn};
use crate::{BinaryOp, Span, UnaryOp};

/// Expression node.
#[derive(Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// The identifier if this expression is a bare name.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Expression kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// Variable, module or class name (`this` inside methods).
    Ident(String),
    IntLit(i64),
    FloatLit(f64),
    StrLit(String),
    CharLit(char),
    BoolLit(bool),
    /// The `none` option literal.
    NoneLit,

    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },

    /// `id(args)`: intrinsic, class instantiation, user function or a
    /// variable holding a closure.
    FuncCall {
        id: String,
        args: Vec<Expr>,
    },

    /// `left.right`: member/module access. `right` is an `Ident` (field)
    /// or a `FuncCall` (method).
    Get {
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `left[index]`
    ArrayAccess {
        left: Box<Expr>,
        index: Box<Expr>,
    },

    ListLit(Vec<Expr>),
    TupleLit(Vec<Expr>),
    /// `{k: v, ...}`; the key type is fixed by the annotation or by the
    /// first key.
    DictLit {
        key_type: Option<TypeAnn>,
        entries: Vec<(Expr, Expr)>,
    },

    /// `|params| { body }`
    ClosureLit(Rc<ClosureExpr>),
}

/// A closure literal: parameters plus body.
#[derive(Clone, PartialEq, Debug)]
pub struct ClosureExpr {
    pub params: Vec<Param>,
    pub body: Block,
}
