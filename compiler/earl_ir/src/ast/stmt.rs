//! Statement nodes.

use std::fmt;
use std::rc::Rc;

use super::{Attrs, Block, Expr, Param, TypeAnn};
use crate::{MutOp, Span};

/// Statement node.
#[derive(Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Statement kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// `let id: ty = expr;`
    Let(LetStmt),
    /// `left op right;` where `left` is an lvalue.
    Mut { left: Expr, op: MutOp, right: Expr },
    /// `def id(params): ret { body }`
    Def(Rc<DefDecl>),
    /// `class Id [ctor params] { members; methods }`
    Class(Rc<ClassDecl>),
    If(Box<IfStmt>),
    While { cond: Expr, body: Block },
    For(Box<ForStmt>),
    /// `return expr;` or bare `return;`
    Return(Option<Expr>),
    /// Expression evaluated for its effects.
    Expr(Expr),
    /// `import "path";`
    Import { path: String },
    /// `mod id;` names the module a file defines.
    Module { id: String },
    Block(Block),
}

/// A `let` binding; also the shape of a class member declaration.
#[derive(Clone, PartialEq, Debug)]
pub struct LetStmt {
    pub id: String,
    pub ty: Option<TypeAnn>,
    pub expr: Expr,
    pub attrs: Attrs,
    pub span: Span,
}

/// Function blueprint.
#[derive(Clone, PartialEq, Debug)]
pub struct DefDecl {
    pub id: String,
    pub params: Vec<Param>,
    pub ret: Option<TypeAnn>,
    pub body: Block,
    pub attrs: Attrs,
    pub span: Span,
}

/// Class blueprint.
///
/// `ctor_params` are the names bound while the member initialisers run;
/// a method named `constructor` is called once the members exist.
#[derive(Clone, PartialEq, Debug)]
pub struct ClassDecl {
    pub id: String,
    pub ctor_params: Vec<Param>,
    pub members: Vec<LetStmt>,
    pub methods: Vec<Rc<DefDecl>>,
    pub attrs: Attrs,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub struct IfStmt {
    pub cond: Expr,
    pub then: Block,
    /// `else if` chains nest another `If` inside this block.
    pub else_: Option<Block>,
}

/// `for enumerator in start..end { body }`
#[derive(Clone, PartialEq, Debug)]
pub struct ForStmt {
    pub enumerator: String,
    pub start: Expr,
    pub end: Expr,
    pub body: Block,
}
