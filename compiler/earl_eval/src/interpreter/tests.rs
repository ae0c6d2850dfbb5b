#![allow(clippy::unwrap_used, reason = "tests unwrap known-good results")]

use std::rc::Rc;

use earl_ir::build::*;
use earl_ir::{Attrs, BinaryOp, Expr, ExprKind, MutOp, Span, Stmt, TypeAnn, UnaryOp};
use pretty_assertions::assert_eq;

use super::*;
use crate::errors::ErrorCategory;
use crate::print_handler::buffer_handler;

fn interpreter() -> (Interpreter, SharedPrintHandler) {
    let handler = buffer_handler();
    let interp = InterpreterBuilder::new()
        .print_handler(handler.clone())
        .build();
    (interp, handler)
}

/// Run statements in a fresh World; returns the World and captured output.
fn run_ok(stmts: Vec<Stmt>) -> (ContextRef, String) {
    let (mut interp, handler) = interpreter();
    let world = interp.interpret(&program(stmts)).unwrap();
    (world, handler.get_output())
}

fn run_err(stmts: Vec<Stmt>) -> EvalError {
    let (mut interp, _) = interpreter();
    interp.interpret(&program(stmts)).unwrap_err()
}

fn global(world: &ContextRef, name: &str) -> Value {
    world.variable_get(name).unwrap().get()
}

fn print(args: Vec<Expr>) -> Stmt {
    expr_stmt(call("print", args))
}

fn ints(items: &[i64]) -> Expr {
    list(items.iter().copied().map(int).collect())
}

fn int_list(items: &[i64]) -> Value {
    Value::List(items.iter().copied().map(Value::Int).collect())
}

fn fact_decl() -> Stmt {
    def(
        "fact",
        vec![param("n")],
        vec![
            if_(
                binary(ident("n"), BinaryOp::LtEq, int(1)),
                vec![ret(int(1))],
                None,
            ),
            let_(
                "rest",
                call("fact", vec![binary(ident("n"), BinaryOp::Sub, int(1))]),
            ),
            ret(binary(ident("n"), BinaryOp::Mul, ident("rest"))),
        ],
    )
}

/// `class Point [x, y] { @pub x = x; @pub y = y; label = "p"; ... }`
fn point_class() -> Stmt {
    class(
        "Point",
        vec![param("x"), param("y")],
        vec![
            pub_member("x", ident("x")),
            pub_member("y", ident("y")),
            member("label", str_lit("p")),
        ],
        vec![
            def_decl(
                "sum",
                vec![],
                None,
                vec![ret(binary(ident("x"), BinaryOp::Add, ident("y")))],
                Attrs::PUB,
            ),
            def_decl(
                "shift",
                vec![param("d")],
                None,
                vec![mut_(field(ident("this"), "x"), MutOp::AddAssign, ident("d"))],
                Attrs::PUB,
            ),
            def_decl("secret", vec![], None, vec![ret(ident("label"))], Attrs::empty()),
            def_decl(
                "reveal",
                vec![],
                None,
                vec![ret(method(ident("this"), "secret", vec![]))],
                Attrs::PUB,
            ),
        ],
    )
}

// Arithmetic

#[test]
fn integer_arithmetic_wraps() {
    let (world, _) = run_ok(vec![
        let_("a", binary(int(i64::MAX), BinaryOp::Add, int(1))),
        let_("b", binary(int(i64::MIN), BinaryOp::Sub, int(1))),
        let_("c", binary(int(i64::MAX), BinaryOp::Mul, int(2))),
    ]);
    assert_eq!(global(&world, "a"), Value::Int(i64::MIN));
    assert_eq!(global(&world, "b"), Value::Int(i64::MAX));
    assert_eq!(global(&world, "c"), Value::Int(-2));
}

#[test]
fn division_and_modulo_by_zero_fail() {
    let err = run_err(vec![let_("a", binary(int(1), BinaryOp::Div, int(0)))]);
    assert_eq!(err.category(), ErrorCategory::ArithmeticError);
    let err = run_err(vec![let_("a", binary(int(1), BinaryOp::Mod, int(0)))]);
    assert_eq!(err.category(), ErrorCategory::ArithmeticError);
}

#[test]
fn mixed_arithmetic_promotes() {
    let (world, _) = run_ok(vec![let_("a", binary(int(1), BinaryOp::Add, float(0.5)))]);
    assert_eq!(global(&world, "a"), Value::Float(1.5));
}

#[test]
fn incompatible_operands_are_type_errors() {
    let err = run_err(vec![let_("a", binary(int(1), BinaryOp::Add, str_lit("x")))]);
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn logical_operators_short_circuit() {
    let (world, out) = run_ok(vec![
        def("loud", vec![], vec![print(vec![str_lit("called")]), ret(bool_lit(true))]),
        let_("a", binary(bool_lit(false), BinaryOp::And, call("loud", vec![]))),
        let_("b", binary(bool_lit(true), BinaryOp::Or, call("loud", vec![]))),
        let_("c", binary(int(1), BinaryOp::And, call("loud", vec![]))),
        let_("d", unary(UnaryOp::Not, list(vec![]))),
    ]);
    assert_eq!(out, "called\n");
    assert_eq!(global(&world, "a"), Value::Bool(false));
    assert_eq!(global(&world, "b"), Value::Bool(true));
    assert_eq!(global(&world, "c"), Value::Bool(true));
    assert_eq!(global(&world, "d"), Value::Bool(true));
}

// Bindings and scopes

#[test]
fn binding_copies_collections() {
    let (world, _) = run_ok(vec![
        let_("a", ints(&[1, 2])),
        let_("b", ident("a")),
        expr_stmt(method(ident("b"), "append", vec![int(3)])),
        let_("s", str_lit("abc")),
        let_("t", call("copy", vec![ident("s")])),
        mut_(ident("t"), MutOp::AddAssign, str_lit("d")),
    ]);
    assert_eq!(global(&world, "a"), int_list(&[1, 2]));
    assert_eq!(global(&world, "b"), int_list(&[1, 2, 3]));
    assert_eq!(global(&world, "s"), Value::string("abc"));
    assert_eq!(global(&world, "t"), Value::string("abcd"));
}

#[test]
fn binding_aliases_instances_and_closures() {
    let (world, _) = run_ok(vec![
        point_class(),
        let_("p", call("Point", vec![int(1), int(2)])),
        let_("q", ident("p")),
        assign(field(ident("q"), "x"), int(10)),
        let_("px", field(ident("p"), "x")),
        let_("f", closure(vec![param("n")], vec![ret(ident("n"))])),
        let_("g", ident("f")),
        let_("same", binary(ident("f"), BinaryOp::Eq, ident("g"))),
        let_("r", call("copy", vec![ident("p")])),
        assign(field(ident("r"), "x"), int(99)),
        let_("px2", field(ident("p"), "x")),
    ]);
    assert_eq!(global(&world, "px"), Value::Int(10));
    assert_eq!(global(&world, "same"), Value::Bool(true));
    assert_eq!(global(&world, "px2"), Value::Int(10));
}

#[test]
fn redeclaring_in_same_scope_fails() {
    let err = run_err(vec![let_("x", int(1)), let_("x", int(2))]);
    assert_eq!(err.category(), ErrorCategory::Redeclared);
}

#[test]
fn shadowing_in_block_is_undone() {
    let (world, out) = run_ok(vec![
        let_("x", int(1)),
        block_stmt(vec![let_("x", int(2)), print(vec![ident("x")])]),
        print(vec![ident("x")]),
    ]);
    assert_eq!(out, "2\n1\n");
    assert_eq!(global(&world, "x"), Value::Int(1));
}

#[test]
fn typed_binding_accepts_reassignment() {
    let (world, _) = run_ok(vec![let_typed("x", TypeAnn::Int, int(5)), assign(ident("x"), int(6))]);
    assert_eq!(global(&world, "x"), Value::Int(6));
}

#[test]
fn const_binding_rejects_reassignment() {
    let (mut interp, _) = interpreter();
    let world = interp.new_world();
    interp.eval_stmt(&let_const("x", int(5)), &world).unwrap();
    let err = interp.eval_stmt(&assign(ident("x"), int(6)), &world).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ConstError);
    assert_eq!(global(&world, "x"), Value::Int(5));

    interp.eval_stmt(&let_const("xs", ints(&[1])), &world).unwrap();
    let err = interp
        .eval_stmt(&expr_stmt(method(ident("xs"), "append", vec![int(2)])), &world)
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ConstError);
    assert_eq!(global(&world, "xs"), int_list(&[1]));
}

#[test]
fn assignment_needs_a_storage_location() {
    let err = run_err(vec![assign(int(1), int(2))]);
    assert_eq!(err.category(), ErrorCategory::Fatal);
    assert_eq!(err.message, "cannot assign to a literal");

    let err = run_err(vec![
        def("f", vec![], vec![ret(int(1))]),
        assign(call("f", vec![]), int(5)),
    ]);
    assert_eq!(err.category(), ErrorCategory::Fatal);
    assert_eq!(err.message, "cannot assign to a call");

    let err = run_err(vec![
        def("f", vec![], vec![ret(ints(&[1]))]),
        assign(index(call("f", vec![]), int(0)), int(5)),
    ]);
    assert_eq!(err.category(), ErrorCategory::Fatal);

    let err = run_err(vec![
        let_("xs", ints(&[1])),
        mut_(method(ident("xs"), "len", vec![]), MutOp::AddAssign, int(1)),
    ]);
    assert_eq!(err.message, "cannot assign to a method call");

    let err = run_err(vec![assign(ident("ghost"), int(1))]);
    assert_eq!(err.category(), ErrorCategory::Undeclared);
}

#[test]
fn modules_and_this_are_not_assignable() {
    let mut interp = with_modules(MemoryModuleLoader::new().with_module("math.earl", math_module()));
    let err = interp
        .interpret(&program(vec![import("math.earl"), assign(ident("math"), int(1))]))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Fatal);
    assert_eq!(err.message, "cannot assign to module `math`");

    let err = run_err(vec![
        class(
            "Cell",
            vec![],
            vec![pub_member("v", int(0))],
            vec![def_decl(
                "reset",
                vec![],
                None,
                vec![assign(ident("this"), int(0))],
                Attrs::PUB,
            )],
        ),
        let_("c", call("Cell", vec![])),
        expr_stmt(method(ident("c"), "reset", vec![])),
    ]);
    assert_eq!(err.category(), ErrorCategory::Fatal);
    assert_eq!(err.message, "cannot assign to `this`");
}

#[test]
fn annotations_are_checked() {
    let err = run_err(vec![let_typed("x", TypeAnn::Int, str_lit("no"))]);
    assert_eq!(err.category(), ErrorCategory::TypeError);

    let (world, _) = run_ok(vec![let_typed("f", TypeAnn::Float, int(2))]);
    assert_eq!(global(&world, "f"), Value::Float(2.0));

    let err = run_err(vec![
        def("id", vec![typed_param("n", TypeAnn::Int)], vec![ret(ident("n"))]),
        expr_stmt(call("id", vec![str_lit("x")])),
    ]);
    assert_eq!(err.category(), ErrorCategory::TypeError);

    let err = run_err(vec![
        Stmt::new(
            earl_ir::StmtKind::Def(def_decl(
                "bad",
                vec![],
                Some(TypeAnn::Int),
                vec![ret(str_lit("x"))],
                Attrs::empty(),
            )),
            Span::DUMMY,
        ),
        expr_stmt(call("bad", vec![])),
    ]);
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn reassignment_keeps_kind() {
    let err = run_err(vec![let_("x", int(1)), assign(ident("x"), str_lit("s"))]);
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn undeclared_names_fail() {
    let err = run_err(vec![print(vec![ident("nope")])]);
    assert_eq!(err.category(), ErrorCategory::Undeclared);
    let err = run_err(vec![expr_stmt(call("nope", vec![]))]);
    assert_eq!(err.category(), ErrorCategory::Undeclared);
}

// Functions

#[test]
fn recursive_factorial_has_independent_locals() {
    let (world, _) = run_ok(vec![fact_decl(), let_("r", call("fact", vec![int(5)]))]);
    assert_eq!(global(&world, "r"), Value::Int(120));
}

#[test]
fn calls_do_not_see_caller_locals() {
    let err = run_err(vec![
        def("callee", vec![], vec![ret(ident("secret"))]),
        def(
            "caller",
            vec![],
            vec![let_("secret", int(1)), ret(call("callee", vec![]))],
        ),
        expr_stmt(call("caller", vec![])),
    ]);
    assert_eq!(err.category(), ErrorCategory::Undeclared);
}

#[test]
fn functions_see_globals() {
    let (world, _) = run_ok(vec![
        let_("base", int(10)),
        def("add", vec![param("n")], vec![ret(binary(ident("base"), BinaryOp::Add, ident("n")))]),
        let_("r", call("add", vec![int(5)])),
    ]);
    assert_eq!(global(&world, "r"), Value::Int(15));
}

#[test]
fn wrong_arity_fails() {
    let err = run_err(vec![fact_decl(), expr_stmt(call("fact", vec![]))]);
    assert_eq!(err.category(), ErrorCategory::ArityError);
}

#[test]
fn ref_parameters_alias_the_argument() {
    let (world, _) = run_ok(vec![
        def("bump", vec![ref_param("n")], vec![mut_(ident("n"), MutOp::AddAssign, int(1))]),
        def("local", vec![param("n")], vec![mut_(ident("n"), MutOp::AddAssign, int(1))]),
        let_("x", int(1)),
        expr_stmt(call("bump", vec![ident("x")])),
        expr_stmt(call("local", vec![ident("x")])),
    ]);
    assert_eq!(global(&world, "x"), Value::Int(2));
}

#[test]
fn function_without_return_yields_unit() {
    let (world, _) = run_ok(vec![def("noop", vec![], vec![]), let_("u", call("noop", vec![]))]);
    assert_eq!(global(&world, "u"), Value::Unit);
}

#[test]
fn intrinsics_take_precedence_over_user_functions() {
    let (world, _) = run_ok(vec![
        def("len", vec![param("x")], vec![ret(int(-1))]),
        let_("n", call("len", vec![ints(&[1, 2, 3])])),
    ]);
    assert_eq!(global(&world, "n"), Value::Int(3));
}

#[test]
fn variables_holding_closures_are_callable() {
    let (world, _) = run_ok(vec![
        let_(
            "double",
            closure(vec![param("n")], vec![ret(binary(ident("n"), BinaryOp::Mul, int(2)))]),
        ),
        let_("r", call("double", vec![int(21)])),
    ]);
    assert_eq!(global(&world, "r"), Value::Int(42));

    let err = run_err(vec![let_("n", int(1)), expr_stmt(call("n", vec![]))]);
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn returned_closure_keeps_captured_locals() {
    let (world, _) = run_ok(vec![
        def(
            "make_adder",
            vec![param("k")],
            vec![ret(closure(
                vec![param("n")],
                vec![ret(binary(ident("n"), BinaryOp::Add, ident("k")))],
            ))],
        ),
        let_("add5", call("make_adder", vec![int(5)])),
        let_("r", call("add5", vec![int(1)])),
    ]);
    assert_eq!(global(&world, "r"), Value::Int(6));
}

#[test]
fn dropped_world_releases_closures_and_instances() {
    let (world, _) = run_ok(vec![
        point_class(),
        let_("p", call("Point", vec![int(1), int(2)])),
        let_(
            "twice",
            closure(vec![param("n")], vec![ret(binary(ident("n"), BinaryOp::Mul, int(2)))]),
        ),
        def(
            "make_adder",
            vec![param("k")],
            vec![ret(closure(
                vec![param("n")],
                vec![ret(binary(ident("n"), BinaryOp::Add, ident("k")))],
            ))],
        ),
        let_("add5", call("make_adder", vec![int(5)])),
        let_("r", call("twice", vec![call("add5", vec![int(1)])])),
    ]);
    assert_eq!(global(&world, "r"), Value::Int(12));

    let weak = world.downgrade();
    drop(world);
    assert!(weak.upgrade().is_none());
}

#[test]
fn recursion_limit_is_fatal_with_backtrace() {
    let handler = buffer_handler();
    let mut interp = InterpreterBuilder::new()
        .print_handler(handler)
        .max_call_depth(Some(32))
        .build();
    let err = interp
        .interpret(&program(vec![
            def("spin", vec![], vec![ret(call("spin", vec![]))]),
            expr_stmt(call("spin", vec![])),
        ]))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Fatal);
    let backtrace = err.backtrace.unwrap();
    assert_eq!(backtrace.len(), 32);
    assert_eq!(backtrace.frames()[0].name, "spin");
}

#[test]
fn errors_carry_innermost_span() {
    let failing = Expr::new(
        ExprKind::Binary {
            lhs: Box::new(int(1)),
            op: BinaryOp::Div,
            rhs: Box::new(int(0)),
        },
        Span::new(8, 13),
    );
    let stmt = Stmt::new(earl_ir::StmtKind::Expr(failing), Span::new(0, 14));
    let err = run_err(vec![stmt]);
    assert_eq!(err.span, Some(Span::new(8, 13)));
}

#[test]
fn exit_unwinds_as_signal() {
    let (mut interp, handler) = interpreter();
    let err = interp
        .interpret(&program(vec![
            expr_stmt(call("exit", vec![int(4)])),
            print(vec![str_lit("unreachable")]),
        ]))
        .unwrap_err();
    assert_eq!(err.exit_code(), Some(4));
    assert_eq!(handler.get_output(), "");
}

// Control flow

#[test]
fn for_loop_counts_and_releases_enumerator() {
    let (world, _) = run_ok(vec![
        let_("total", int(0)),
        for_("i", int(0), int(5), vec![mut_(ident("total"), MutOp::AddAssign, ident("i"))]),
    ]);
    assert_eq!(global(&world, "total"), Value::Int(10));
    assert!(!world.variable_exists("i"));
}

#[test]
fn for_bounds_must_be_ints() {
    let err = run_err(vec![for_("i", int(0), str_lit("5"), vec![])]);
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn loop_body_gets_fresh_scope_each_iteration() {
    let (_, out) = run_ok(vec![for_(
        "i",
        int(0),
        int(2),
        vec![let_("sq", binary(ident("i"), BinaryOp::Mul, ident("i"))), print(vec![ident("sq")])],
    )]);
    assert_eq!(out, "0\n1\n");
}

#[test]
fn return_inside_loops_leaves_function() {
    let (world, _) = run_ok(vec![
        def(
            "first_over",
            vec![param("limit")],
            vec![
                let_("n", int(0)),
                while_(
                    bool_lit(true),
                    vec![
                        mut_(ident("n"), MutOp::AddAssign, int(3)),
                        if_(binary(ident("n"), BinaryOp::Gt, ident("limit")), vec![ret(ident("n"))], None),
                    ],
                ),
            ],
        ),
        let_("r", call("first_over", vec![int(10)])),
    ]);
    assert_eq!(global(&world, "r"), Value::Int(12));
}

#[test]
fn if_else_picks_branch_by_truthiness() {
    let (_, out) = run_ok(vec![
        if_(str_lit(""), vec![print(vec![str_lit("str")])], None),
        if_(int(0), vec![print(vec![str_lit("zero")])], Some(vec![print(vec![str_lit("else")])])),
    ]);
    assert_eq!(out, "str\nelse\n");
}

// Classes

#[test]
fn members_default_to_constructor_arguments() {
    let (world, _) = run_ok(vec![
        point_class(),
        let_("a", call("Point", vec![int(1), int(2)])),
        let_("b", call("Point", vec![int(3), int(4)])),
        expr_stmt(method(ident("a"), "shift", vec![int(10)])),
        let_("ax", field(ident("a"), "x")),
        let_("bx", field(ident("b"), "x")),
        let_("bsum", method(ident("b"), "sum", vec![])),
    ]);
    assert_eq!(global(&world, "ax"), Value::Int(11));
    assert_eq!(global(&world, "bx"), Value::Int(3));
    assert_eq!(global(&world, "bsum"), Value::Int(7));
}

#[test]
fn constructor_arguments_are_transient() {
    let (world, _) = run_ok(vec![
        class("Box", vec![param("v")], vec![pub_member("held", ident("v"))], vec![]),
        let_("b", call("Box", vec![int(1)])),
    ]);
    let Value::Class(instance) = global(&world, "b") else {
        panic!("expected an instance");
    };
    assert!(instance.variable_lookup("v").is_none());
    assert_eq!(instance.member("held").unwrap().get(), Value::Int(1));
}

#[test]
fn constructor_method_runs_after_members() {
    let (world, _) = run_ok(vec![
        class(
            "Counter",
            vec![param("start")],
            vec![pub_member("n", ident("start"))],
            vec![def_decl(
                "constructor",
                vec![],
                None,
                vec![mut_(ident("n"), MutOp::MulAssign, int(10))],
                Attrs::empty(),
            )],
        ),
        let_("c", call("Counter", vec![int(2)])),
        let_("n", field(ident("c"), "n")),
    ]);
    assert_eq!(global(&world, "n"), Value::Int(20));
}

#[test]
fn private_members_are_hidden_outside() {
    let err = run_err(vec![
        point_class(),
        let_("p", call("Point", vec![int(1), int(2)])),
        expr_stmt(field(ident("p"), "label")),
    ]);
    assert_eq!(err.category(), ErrorCategory::Fatal);

    let err = run_err(vec![
        point_class(),
        let_("p", call("Point", vec![int(1), int(2)])),
        expr_stmt(method(ident("p"), "secret", vec![])),
    ]);
    assert_eq!(err.category(), ErrorCategory::Fatal);

    let (world, _) = run_ok(vec![
        point_class(),
        let_("p", call("Point", vec![int(1), int(2)])),
        let_("l", method(ident("p"), "reveal", vec![])),
    ]);
    assert_eq!(global(&world, "l"), Value::string("p"));
}

#[test]
fn unknown_members_and_classes_fail() {
    let err = run_err(vec![
        point_class(),
        let_("p", call("Point", vec![int(1), int(2)])),
        expr_stmt(method(ident("p"), "missing", vec![])),
    ]);
    assert_eq!(err.category(), ErrorCategory::Fatal);

    let err = run_err(vec![expr_stmt(method(int(1), "frobnicate", vec![]))]);
    assert_eq!(err.category(), ErrorCategory::Fatal);

    let err = run_err(vec![point_class(), expr_stmt(call("Point", vec![int(1)]))]);
    assert_eq!(err.category(), ErrorCategory::ArityError);
}

// Indexing and member intrinsics

#[test]
fn indexing_reads_and_fails_out_of_range() {
    let (world, _) = run_ok(vec![
        let_("n", call("len", vec![ints(&[1, 2, 3])])),
        let_("m", call("len", vec![str_lit("abc")])),
        let_("c", index(str_lit("abc"), int(1))),
    ]);
    assert_eq!(global(&world, "n"), Value::Int(3));
    assert_eq!(global(&world, "m"), Value::Int(3));
    assert_eq!(global(&world, "c"), Value::Char('b'));

    let err = run_err(vec![expr_stmt(index(ints(&[1, 2, 3]), int(5)))]);
    assert_eq!(err.category(), ErrorCategory::IndexError);
}

#[test]
fn writes_through_string_positions() {
    let (world, _) = run_ok(vec![
        let_("s", str_lit("hello")),
        assign(index(ident("s"), int(0)), char_lit('j')),
    ]);
    assert_eq!(global(&world, "s"), Value::string("jello"));

    let err = run_err(vec![let_("s", str_lit("hi")), assign(index(ident("s"), int(0)), int(1))]);
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn nested_list_elements_are_assignable() {
    let (world, _) = run_ok(vec![
        let_("grid", list(vec![ints(&[1, 2]), ints(&[3])])),
        assign(index(index(ident("grid"), int(0)), int(1)), int(20)),
        expr_stmt(method(index(ident("grid"), int(1)), "append", vec![int(4)])),
        mut_(index(index(ident("grid"), int(1)), int(0)), MutOp::AddAssign, int(30)),
    ]);
    assert_eq!(
        global(&world, "grid"),
        Value::List(vec![int_list(&[1, 20]), int_list(&[33, 4])])
    );
}

#[test]
fn tuple_elements_are_not_assignable() {
    let err = run_err(vec![
        let_("t", tuple(vec![int(1), int(2)])),
        assign(index(ident("t"), int(0)), int(5)),
    ]);
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn dict_access_and_insertion() {
    let (world, _) = run_ok(vec![
        let_("d", dict(Some(TypeAnn::Str), vec![(str_lit("a"), int(1))])),
        assign(index(ident("d"), str_lit("b")), int(2)),
        assign(index(ident("d"), str_lit("a")), int(10)),
        let_("has", method(ident("d"), "has_key", vec![str_lit("b")])),
        let_("got", method(ident("d"), "get", vec![str_lit("zzz")])),
        let_("a", index(ident("d"), str_lit("a"))),
    ]);
    assert_eq!(global(&world, "has"), Value::Bool(true));
    assert_eq!(global(&world, "got"), Value::none());
    assert_eq!(global(&world, "a"), Value::Int(10));
    assert_eq!(global(&world, "d").to_string(), r#"{"a": 10, "b": 2}"#);

    let err = run_err(vec![
        let_("d", dict(None, vec![(int(1), int(1))])),
        expr_stmt(index(ident("d"), int(2))),
    ]);
    assert_eq!(err.category(), ErrorCategory::IndexError);

    let err = run_err(vec![let_("d", dict(None, vec![(int(1), int(1)), (str_lit("x"), int(2))]))]);
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn split_through_method_calls() {
    let (world, _) = run_ok(vec![
        let_("one", method(str_lit("hello"), "split", vec![str_lit(",")])),
        let_("four", method(str_lit("a,b,,c"), "split", vec![str_lit(",")])),
    ]);
    assert_eq!(global(&world, "one"), Value::List(vec![Value::string("hello")]));
    assert_eq!(
        global(&world, "four"),
        Value::List(["a", "b", "", "c"].into_iter().map(Value::string).collect())
    );
}

#[test]
fn closure_taking_members() {
    let (world, out) = run_ok(vec![
        let_("xs", ints(&[1, 2, 3, 4])),
        let_(
            "evens",
            method(
                ident("xs"),
                "filter",
                vec![closure(
                    vec![param("x")],
                    vec![ret(binary(binary(ident("x"), BinaryOp::Mod, int(2)), BinaryOp::Eq, int(0)))],
                )],
            ),
        ),
        let_(
            "squares",
            method(
                ident("xs"),
                "map",
                vec![closure(vec![param("x")], vec![ret(binary(ident("x"), BinaryOp::Mul, ident("x")))])],
            ),
        ),
        let_(
            "total",
            method(
                ident("xs"),
                "fold",
                vec![
                    closure(
                        vec![param("acc"), param("x")],
                        vec![ret(binary(ident("acc"), BinaryOp::Add, ident("x")))],
                    ),
                    int(100),
                ],
            ),
        ),
        expr_stmt(method(
            ident("xs"),
            "foreach",
            vec![closure(vec![param("x")], vec![print(vec![ident("x")])])],
        )),
        let_(
            "vowels",
            method(
                str_lit("education"),
                "filter",
                vec![closure(
                    vec![param("c")],
                    vec![ret(method(str_lit("aeiou"), "contains", vec![ident("c")]))],
                )],
            ),
        ),
    ]);
    assert_eq!(global(&world, "evens"), int_list(&[2, 4]));
    assert_eq!(global(&world, "squares"), int_list(&[1, 4, 9, 16]));
    assert_eq!(global(&world, "total"), Value::Int(110));
    assert_eq!(global(&world, "vowels"), Value::string("euaio"));
    assert_eq!(out, "1\n2\n3\n4\n");
}

#[test]
fn closures_see_enclosing_locals() {
    let (world, _) = run_ok(vec![
        def(
            "scaled",
            vec![param("xs"), param("k")],
            vec![ret(method(
                ident("xs"),
                "map",
                vec![closure(vec![param("x")], vec![ret(binary(ident("x"), BinaryOp::Mul, ident("k")))])],
            ))],
        ),
        let_("r", call("scaled", vec![ints(&[1, 2]), int(3)])),
    ]);
    assert_eq!(global(&world, "r"), int_list(&[3, 6]));
}

#[test]
fn print_renders_values() {
    let (_, out) = run_ok(vec![
        print(vec![str_lit("x = "), int(1), str_lit(", f = "), float(2.0)]),
        print(vec![list(vec![str_lit("a"), char_lit('b'), int(3)])]),
        print(vec![call("some", vec![int(1)]), str_lit(" "), none()]),
        print(vec![tuple(vec![int(1), bool_lit(true)])]),
    ]);
    assert_eq!(out, "x = 1, f = 2.0\n[\"a\", 'b', 3]\nsome(1) none\n(1, true)\n");
}

// Imports

fn math_module() -> earl_ir::Program {
    program(vec![
        module("math"),
        let_with("pi", None, int(3), Attrs::PUB),
        let_("hidden", int(0)),
        pub_def("square", vec![param("n")], vec![ret(binary(ident("n"), BinaryOp::Mul, ident("n")))]),
        def("helper", vec![], vec![ret(ident("hidden"))]),
    ])
}

fn with_modules(loader: MemoryModuleLoader) -> Interpreter {
    InterpreterBuilder::new()
        .print_handler(buffer_handler())
        .module_loader(Rc::new(loader))
        .build()
}

#[test]
fn imported_public_members_are_reachable() {
    let mut interp = with_modules(MemoryModuleLoader::new().with_module("lib/math.earl", math_module()));
    let world = interp
        .interpret(&program(vec![
            import("lib/math.earl"),
            let_("a", field(ident("math"), "pi")),
            let_("b", method(ident("math"), "square", vec![int(4)])),
        ]))
        .unwrap();
    assert_eq!(global(&world, "a"), Value::Int(3));
    assert_eq!(global(&world, "b"), Value::Int(16));
    assert!(world.import_lookup("math").is_some());
}

#[test]
fn private_module_members_are_hidden() {
    let mut interp = with_modules(MemoryModuleLoader::new().with_module("math.earl", math_module()));
    let err = interp
        .interpret(&program(vec![
            import("math.earl"),
            expr_stmt(field(ident("math"), "hidden")),
        ]))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Fatal);

    let err = interp
        .interpret(&program(vec![
            import("math.earl"),
            expr_stmt(method(ident("math"), "helper", vec![])),
        ]))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Fatal);
}

#[test]
fn module_name_defaults_to_file_stem() {
    let loader = MemoryModuleLoader::new().with_module(
        "util/strings.earl",
        program(vec![let_with("greeting", None, str_lit("hi"), Attrs::PUB)]),
    );
    let mut interp = with_modules(loader);
    let world = interp
        .interpret(&program(vec![
            import("util/strings.earl"),
            let_("g", field(ident("strings"), "greeting")),
        ]))
        .unwrap();
    assert_eq!(global(&world, "g"), Value::string("hi"));
}

#[test]
fn circular_imports_fail() {
    let loader = MemoryModuleLoader::new()
        .with_module("a.earl", program(vec![import("b.earl")]))
        .with_module("b.earl", program(vec![import("a.earl")]));
    let mut interp = with_modules(loader);
    let err = interp
        .interpret(&program(vec![import("a.earl")]))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Fatal);
    assert!(err.message.contains("circular import"));
}

#[test]
fn import_without_loader_is_io_error() {
    let err = run_err(vec![import("x.earl")]);
    assert_eq!(err.category(), ErrorCategory::Io);
}

// Statement-level API

#[test]
fn eval_stmt_yields_expression_values() {
    let (mut interp, _) = interpreter();
    let world = interp.new_world();
    interp.eval_stmt(&let_("x", int(2)), &world).unwrap();
    let v = interp
        .eval_stmt(&expr_stmt(binary(ident("x"), BinaryOp::Pow, int(10))), &world)
        .unwrap();
    assert_eq!(v, Value::Int(1024));
    let v = interp.eval_stmt(&let_("y", int(1)), &world).unwrap();
    assert_eq!(v, Value::Unit);
}

#[test]
fn call_closure_from_host() {
    let (mut interp, _) = interpreter();
    let world = interp.new_world();
    let f = interp
        .eval_stmt(
            &expr_stmt(closure(vec![param("a"), param("b")], vec![ret(binary(ident("a"), BinaryOp::Sub, ident("b")))])),
            &world,
        )
        .unwrap();
    let Value::Closure(f) = f else {
        panic!("expected a closure");
    };
    let r = interp
        .call_closure(&f, vec![Value::Int(5), Value::Int(3)], Span::DUMMY)
        .unwrap();
    assert_eq!(r, Value::Int(2));
    let err = interp.call_closure(&f, vec![], Span::DUMMY).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ArityError);
}
