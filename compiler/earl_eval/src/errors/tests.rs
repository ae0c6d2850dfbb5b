use earl_ir::{BinaryOp, Span};
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn factories_fill_message_from_kind() {
    let err = division_by_zero();
    assert_eq!(err.message, "division by zero");
    assert_eq!(err.category(), ErrorCategory::ArithmeticError);

    let err = wrong_arg_count("add", 2, 1);
    assert_eq!(err.message, "add expects 2 arguments, got 1");
    assert_eq!(err.category(), ErrorCategory::ArityError);

    let err = wrong_arg_count("len", 1, 0);
    assert_eq!(err.message, "len expects 1 argument, got 0");
}

#[test]
fn categories_cover_every_kind() {
    assert_eq!(undeclared_variable("x").category(), ErrorCategory::Undeclared);
    assert_eq!(redeclared("variable", "x").category(), ErrorCategory::Redeclared);
    assert_eq!(
        binary_type_mismatch(BinaryOp::Add, "int", "str").category(),
        ErrorCategory::TypeError
    );
    assert_eq!(index_out_of_bounds(5, 3).category(), ErrorCategory::IndexError);
    assert_eq!(key_not_found("\"k\"").category(), ErrorCategory::IndexError);
    assert_eq!(const_mutation("x").category(), ErrorCategory::ConstError);
    assert_eq!(assertion_failed("false").category(), ErrorCategory::AssertionError);
    assert_eq!(no_such_member("frob", "list").category(), ErrorCategory::Fatal);
    assert_eq!(not_assignable("a call").category(), ErrorCategory::Fatal);
    assert_eq!(EvalError::new("boom").category(), ErrorCategory::Fatal);
    assert_eq!(exit_signal(3).category(), ErrorCategory::Exit);
}

#[test]
fn exit_code_only_for_exit_signal() {
    assert_eq!(exit_signal(7).exit_code(), Some(7));
    assert_eq!(division_by_zero().exit_code(), None);
}

#[test]
fn innermost_span_wins() {
    let inner = Span::new(4, 9);
    let outer = Span::new(0, 20);
    let err = division_by_zero().with_span(inner).with_span(outer);
    assert_eq!(err.span, Some(inner));

    let err = division_by_zero().with_span(Span::DUMMY);
    assert_eq!(err.span, None);
}

#[test]
fn display_prefixes_category() {
    let err = undeclared_function("frob");
    assert_eq!(err.to_string(), "Undeclared: undeclared function `frob`");
}

#[test]
fn backtrace_display_lists_frames_innermost_first() {
    let bt = EvalBacktrace::new(vec![
        BacktraceFrame {
            name: "inner".to_string(),
            span: Some(Span::new(10, 15)),
        },
        BacktraceFrame {
            name: "outer".to_string(),
            span: None,
        },
    ]);
    assert_eq!(
        bt.to_string(),
        "stack backtrace:\n  0: inner at 10..15\n  1: outer\n"
    );
    assert_eq!(EvalBacktrace::default().to_string(), "");
}
