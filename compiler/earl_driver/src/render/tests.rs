use earl_eval::errors::{division_by_zero, undeclared_variable};
use earl_eval::{BacktraceFrame, EvalBacktrace};
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn bare_error_is_one_line() {
    let err = undeclared_variable("x");
    assert_eq!(
        render_error(&err, None),
        format!("error[Undeclared]: {}", err.message)
    );
}

#[test]
fn span_uses_line_and_column_with_source() {
    let src = "let a = 1;\nlet b = a / 0;\n";
    let err = division_by_zero().with_span(Span::new(19, 24));
    let rendered = render_error(&err, Some(src));
    assert!(rendered.ends_with("\n  --> 2:9"), "{rendered}");

    let rendered = render_error(&err, None);
    assert!(rendered.ends_with("\n  --> 19..24"), "{rendered}");
}

#[test]
fn backtrace_lists_innermost_first() {
    let err = division_by_zero().with_backtrace(EvalBacktrace::new(vec![
        BacktraceFrame {
            name: "inner".to_string(),
            span: Some(Span::new(4, 5)),
        },
        BacktraceFrame {
            name: "outer".to_string(),
            span: None,
        },
    ]));
    let rendered = render_error(&err, Some("abc\ndef"));
    let lines: Vec<&str> = rendered.lines().skip(1).collect();
    assert_eq!(
        lines,
        vec!["stack backtrace:", "  0: inner at 2:1", "  1: outer"]
    );
}

#[test]
fn foreign_span_in_multibyte_source_does_not_panic() {
    let src = "let s = \"héllo\";\nprint(s / 2);\n";
    let err = division_by_zero().with_span(Span::new(11, 12));
    let rendered = render_error(&err, Some(src));
    assert!(rendered.ends_with("\n  --> 1:11"), "{rendered}");

    let err = division_by_zero().with_span(Span::new(400, 410));
    let rendered = render_error(&err, Some(src));
    assert!(rendered.ends_with("\n  --> 3:1"), "{rendered}");
}
