//! Terse constructors for syntax trees.
//!
//! Front ends that already track spans build nodes directly; these helpers
//! use [`Span::DUMMY`] and exist for embedders that synthesize programs and
//! for tests.
//!
//! ```text
//! use earl_ir::build::*;
//! let prog = program(vec![
//!     let_("x", int(5)),
//!     expr_stmt(call("print", vec![ident("x")])),
//! ]);
//! ```

use std::rc::Rc;

use crate::{
    Attrs, BinaryOp, Block, ClassDecl, ClosureExpr, DefDecl, Expr, ExprKind, ForStmt, IfStmt,
    LetStmt, MutOp, Param, Program, Span, Stmt, StmtKind, TypeAnn, UnaryOp,
};

fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::DUMMY)
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::DUMMY)
}

pub fn program(stmts: Vec<Stmt>) -> Program {
    Program::new(stmts)
}

pub fn block(stmts: Vec<Stmt>) -> Block {
    Block::new(stmts, Span::DUMMY)
}

// Expressions

pub fn ident(name: &str) -> Expr {
    expr(ExprKind::Ident(name.to_string()))
}

pub fn int(n: i64) -> Expr {
    expr(ExprKind::IntLit(n))
}

pub fn float(f: f64) -> Expr {
    expr(ExprKind::FloatLit(f))
}

pub fn str_lit(s: &str) -> Expr {
    expr(ExprKind::StrLit(s.to_string()))
}

pub fn char_lit(c: char) -> Expr {
    expr(ExprKind::CharLit(c))
}

pub fn bool_lit(b: bool) -> Expr {
    expr(ExprKind::BoolLit(b))
}

pub fn none() -> Expr {
    expr(ExprKind::NoneLit)
}

pub fn binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Expr {
    expr(ExprKind::Binary {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
    })
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    expr(ExprKind::Unary {
        op,
        expr: Box::new(operand),
    })
}

pub fn call(id: &str, args: Vec<Expr>) -> Expr {
    expr(ExprKind::FuncCall {
        id: id.to_string(),
        args,
    })
}

pub fn get(left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Get {
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// `receiver.name(args)`
pub fn method(receiver: Expr, name: &str, args: Vec<Expr>) -> Expr {
    get(receiver, call(name, args))
}

/// `receiver.name`
pub fn field(receiver: Expr, name: &str) -> Expr {
    get(receiver, ident(name))
}

pub fn index(left: Expr, idx: Expr) -> Expr {
    expr(ExprKind::ArrayAccess {
        left: Box::new(left),
        index: Box::new(idx),
    })
}

pub fn list(elems: Vec<Expr>) -> Expr {
    expr(ExprKind::ListLit(elems))
}

pub fn tuple(elems: Vec<Expr>) -> Expr {
    expr(ExprKind::TupleLit(elems))
}

pub fn dict(key_type: Option<TypeAnn>, entries: Vec<(Expr, Expr)>) -> Expr {
    expr(ExprKind::DictLit { key_type, entries })
}

pub fn closure(params: Vec<Param>, body: Vec<Stmt>) -> Expr {
    expr(ExprKind::ClosureLit(Rc::new(ClosureExpr {
        params,
        body: block(body),
    })))
}

// Parameters

pub fn param(id: &str) -> Param {
    Param {
        id: id.to_string(),
        ty: None,
        attrs: Attrs::empty(),
    }
}

pub fn typed_param(id: &str, ty: TypeAnn) -> Param {
    Param {
        ty: Some(ty),
        ..param(id)
    }
}

pub fn ref_param(id: &str) -> Param {
    Param {
        attrs: Attrs::REF,
        ..param(id)
    }
}

// Statements

pub fn let_with(id: &str, ty: Option<TypeAnn>, value: Expr, attrs: Attrs) -> Stmt {
    stmt(StmtKind::Let(member_with(id, ty, value, attrs)))
}

pub fn let_(id: &str, value: Expr) -> Stmt {
    let_with(id, None, value, Attrs::empty())
}

pub fn let_typed(id: &str, ty: TypeAnn, value: Expr) -> Stmt {
    let_with(id, Some(ty), value, Attrs::empty())
}

pub fn let_const(id: &str, value: Expr) -> Stmt {
    let_with(id, None, value, Attrs::CONST)
}

pub fn mut_(left: Expr, op: MutOp, right: Expr) -> Stmt {
    stmt(StmtKind::Mut { left, op, right })
}

pub fn assign(left: Expr, right: Expr) -> Stmt {
    mut_(left, MutOp::Assign, right)
}

pub fn def_decl(
    id: &str,
    params: Vec<Param>,
    ret: Option<TypeAnn>,
    body: Vec<Stmt>,
    attrs: Attrs,
) -> Rc<DefDecl> {
    Rc::new(DefDecl {
        id: id.to_string(),
        params,
        ret,
        body: block(body),
        attrs,
        span: Span::DUMMY,
    })
}

pub fn def(id: &str, params: Vec<Param>, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Def(def_decl(id, params, None, body, Attrs::empty())))
}

/// Public function (`@pub def`), visible through `module.id(...)`.
pub fn pub_def(id: &str, params: Vec<Param>, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Def(def_decl(id, params, None, body, Attrs::PUB)))
}

pub fn member_with(id: &str, ty: Option<TypeAnn>, value: Expr, attrs: Attrs) -> LetStmt {
    LetStmt {
        id: id.to_string(),
        ty,
        expr: value,
        attrs,
        span: Span::DUMMY,
    }
}

/// Class member declaration.
pub fn member(id: &str, value: Expr) -> LetStmt {
    member_with(id, None, value, Attrs::empty())
}

pub fn pub_member(id: &str, value: Expr) -> LetStmt {
    member_with(id, None, value, Attrs::PUB)
}

pub fn class(
    id: &str,
    ctor_params: Vec<Param>,
    members: Vec<LetStmt>,
    methods: Vec<Rc<DefDecl>>,
) -> Stmt {
    stmt(StmtKind::Class(Rc::new(ClassDecl {
        id: id.to_string(),
        ctor_params,
        members,
        methods,
        attrs: Attrs::empty(),
        span: Span::DUMMY,
    })))
}

pub fn if_(cond: Expr, then: Vec<Stmt>, else_: Option<Vec<Stmt>>) -> Stmt {
    stmt(StmtKind::If(Box::new(IfStmt {
        cond,
        then: block(then),
        else_: else_.map(block),
    })))
}

pub fn while_(cond: Expr, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::While {
        cond,
        body: block(body),
    })
}

pub fn for_(enumerator: &str, start: Expr, end: Expr, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::For(Box::new(ForStmt {
        enumerator: enumerator.to_string(),
        start,
        end,
        body: block(body),
    })))
}

pub fn ret(value: Expr) -> Stmt {
    stmt(StmtKind::Return(Some(value)))
}

pub fn ret_unit() -> Stmt {
    stmt(StmtKind::Return(None))
}

pub fn expr_stmt(e: Expr) -> Stmt {
    stmt(StmtKind::Expr(e))
}

pub fn import(path: &str) -> Stmt {
    stmt(StmtKind::Import {
        path: path.to_string(),
    })
}

pub fn module(id: &str) -> Stmt {
    stmt(StmtKind::Module { id: id.to_string() })
}

pub fn block_stmt(stmts: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Block(block(stmts)))
}
