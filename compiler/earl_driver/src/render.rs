//! Human-readable error reports.

use std::fmt::Write;

use earl_eval::EvalError;
use earl_ir::Span;

/// Format `err` for a terminal.
///
/// ```text
/// error[TypeError]: expected int, found str
///   --> 3:9
/// stack backtrace:
///   0: area at 5:1
/// ```
///
/// Locations are `line:col` when `source` is given and byte ranges
/// otherwise.
pub fn render_error(err: &EvalError, source: Option<&str>) -> String {
    let mut out = format!("error[{}]: {}", err.category(), err.message);
    if let Some(span) = err.span {
        let _ = write!(out, "\n  --> {}", location(span, source));
    }
    if let Some(backtrace) = err.backtrace.as_ref().filter(|bt| !bt.is_empty()) {
        out.push_str("\nstack backtrace:");
        for (i, frame) in backtrace.frames().iter().enumerate() {
            let _ = write!(out, "\n  {i}: {}", frame.name);
            if let Some(span) = frame.span {
                let _ = write!(out, " at {}", location(span, source));
            }
        }
    }
    out
}

fn location(span: Span, source: Option<&str>) -> String {
    match source {
        Some(src) => {
            let (line, col) = span.line_col(src);
            format!("{line}:{col}")
        }
        None => span.to_string(),
    }
}

#[cfg(test)]
mod tests;
