//! Runtime error types.
//!
//! `EvalErrorKind` carries structured data for each failure; the coarse
//! [`ErrorCategory`] is what embedders and front ends switch on. Factory
//! functions (e.g. `division_by_zero()`) are the public way to build
//! errors and fill in both `kind` and `message`.
//!
//! `exit(code)` travels the same channel as a signal: it unwinds the
//! evaluator like an error but [`EvalError::exit_code`] reports it so the
//! driver can end the process instead of printing a diagnostic.

use std::fmt;

use earl_ir::{BinaryOp, Span, UnaryOp};

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Coarse error categories surfaced to front ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A name was used that was never declared.
    Undeclared,
    /// A name was declared twice in the same scope.
    Redeclared,
    /// Operand, argument, annotation or mutation type mismatch.
    TypeError,
    /// Wrong number of arguments.
    ArityError,
    /// Index out of range or missing dictionary key.
    IndexError,
    /// Division or modulo by zero, invalid exponent or shift.
    ArithmeticError,
    /// Mutation of a `const` binding.
    ConstError,
    /// `assert` received a falsy argument.
    AssertionError,
    /// Anything the runtime cannot continue from.
    Fatal,
    /// Operating-system failure (files, directories, module loading).
    Io,
    /// `exit(code)` was called.
    Exit,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Undeclared => "Undeclared",
            ErrorCategory::Redeclared => "Redeclared",
            ErrorCategory::TypeError => "TypeError",
            ErrorCategory::ArityError => "ArityError",
            ErrorCategory::IndexError => "IndexError",
            ErrorCategory::ArithmeticError => "ArithmeticError",
            ErrorCategory::ConstError => "ConstError",
            ErrorCategory::AssertionError => "AssertionError",
            ErrorCategory::Fatal => "Fatal",
            ErrorCategory::Io => "Io",
            ErrorCategory::Exit => "Exit",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Names
    Undeclared {
        item: &'static str,
        name: String,
    },
    Redeclared {
        item: &'static str,
        name: String,
    },

    // Types
    TypeMismatch {
        expected: String,
        got: String,
    },
    BinaryTypeMismatch {
        op: BinaryOp,
        left: String,
        right: String,
    },
    InvalidArgument {
        function: String,
        expected: String,
    },
    NotCallable {
        name: String,
        type_name: String,
    },

    // Calls
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    // Access
    IndexOutOfBounds {
        index: i64,
        len: usize,
    },
    KeyNotFound {
        key: String,
    },

    // Arithmetic
    DivisionByZero,
    ModuloByZero,
    InvalidArithmetic {
        message: String,
    },

    ConstMutation {
        name: String,
    },
    AssertionFailed {
        message: String,
    },

    // Fatal
    InvalidBinaryOp {
        op: BinaryOp,
        type_name: String,
    },
    InvalidUnaryOp {
        op: UnaryOp,
        type_name: String,
    },
    NoSuchMember {
        member: String,
        type_name: String,
    },
    PrivateMember {
        member: String,
        owner: String,
    },
    NotAssignable {
        target: String,
    },
    StackOverflow {
        depth: usize,
    },
    Custom {
        message: String,
    },

    Io {
        message: String,
    },
    Exit {
        code: i32,
    },
}

impl EvalErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Undeclared { .. } => ErrorCategory::Undeclared,
            Self::Redeclared { .. } => ErrorCategory::Redeclared,
            Self::TypeMismatch { .. }
            | Self::BinaryTypeMismatch { .. }
            | Self::InvalidArgument { .. }
            | Self::NotCallable { .. } => ErrorCategory::TypeError,
            Self::ArityMismatch { .. } => ErrorCategory::ArityError,
            Self::IndexOutOfBounds { .. } | Self::KeyNotFound { .. } => ErrorCategory::IndexError,
            Self::DivisionByZero | Self::ModuloByZero | Self::InvalidArithmetic { .. } => {
                ErrorCategory::ArithmeticError
            }
            Self::ConstMutation { .. } => ErrorCategory::ConstError,
            Self::AssertionFailed { .. } => ErrorCategory::AssertionError,
            Self::InvalidBinaryOp { .. }
            | Self::InvalidUnaryOp { .. }
            | Self::NoSuchMember { .. }
            | Self::PrivateMember { .. }
            | Self::NotAssignable { .. }
            | Self::StackOverflow { .. }
            | Self::Custom { .. } => ErrorCategory::Fatal,
            Self::Io { .. } => ErrorCategory::Io,
            Self::Exit { .. } => ErrorCategory::Exit,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undeclared { item, name } => write!(f, "undeclared {item} `{name}`"),
            Self::Redeclared { item, name } => write!(f, "{item} `{name}` is already declared"),

            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::BinaryTypeMismatch { op, left, right } => write!(
                f,
                "operator `{}` cannot combine {left} and {right}",
                op.as_symbol()
            ),
            Self::InvalidArgument { function, expected } => {
                write!(f, "{function} expects {expected}")
            }
            Self::NotCallable { name, type_name } => {
                write!(f, "`{name}` holds a {type_name}, which is not callable")
            }

            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                write!(f, "{name} expects {expected} {arg_word}, got {got}")
            }

            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::KeyNotFound { key } => write!(f, "key not found: {key}"),

            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),
            Self::InvalidArithmetic { message } => f.write_str(message),

            Self::ConstMutation { name } => write!(f, "cannot mutate const binding `{name}`"),
            Self::AssertionFailed { message } => write!(f, "assertion failed: {message}"),

            Self::InvalidBinaryOp { op, type_name } => write!(
                f,
                "operator `{}` cannot be applied to {type_name}",
                op.as_symbol()
            ),
            Self::InvalidUnaryOp { op, type_name } => write!(
                f,
                "unary `{}` cannot be applied to {type_name}",
                op.as_symbol()
            ),
            Self::NoSuchMember { member, type_name } => {
                write!(f, "no member `{member}` on {type_name}")
            }
            Self::PrivateMember { member, owner } => {
                write!(f, "`{member}` of {owner} is not public")
            }
            Self::NotAssignable { target } => write!(f, "cannot assign to {target}"),
            Self::StackOverflow { depth } => {
                write!(f, "maximum recursion depth exceeded (limit: {depth})")
            }
            Self::Custom { message } | Self::Io { message } => f.write_str(message),
            Self::Exit { code } => write!(f, "exit({code})"),
        }
    }
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Function, method or constructor name.
    pub name: String,
    /// Source location of the call site.
    pub span: Option<Span>,
}

/// Snapshot of the call stack at an error site, innermost call first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(span) = frame.span {
                write!(f, " at {span}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    /// Structured error data.
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory errors.
    pub message: String,
    /// Source location where the error was raised.
    pub span: Option<Span>,
    /// Call chain at the error site, filled in by the evaluator.
    pub backtrace: Option<EvalBacktrace>,
}

impl EvalError {
    /// Create a fatal error with just a message.
    ///
    /// Prefer the specific factory functions when a structured kind exists.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            span: None,
            backtrace: None,
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            backtrace: None,
        }
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// The code passed to `exit`, if this is an exit signal.
    pub fn exit_code(&self) -> Option<i32> {
        match self.kind {
            EvalErrorKind::Exit { code } => Some(code),
            _ => None,
        }
    }

    /// Attach a source span unless one is already set.
    ///
    /// Errors bubble through several evaluation frames; the innermost span
    /// is the most precise, so later calls leave it alone.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() && span != Span::DUMMY {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category(), self.message)
    }
}

impl std::error::Error for EvalError {}

// Name Errors

#[cold]
pub fn undeclared(item: &'static str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Undeclared {
        item,
        name: name.to_string(),
    })
}

#[cold]
pub fn undeclared_variable(name: &str) -> EvalError {
    undeclared("variable", name)
}

#[cold]
pub fn undeclared_function(name: &str) -> EvalError {
    undeclared("function", name)
}

#[cold]
pub fn undeclared_module(name: &str) -> EvalError {
    undeclared("module", name)
}

#[cold]
pub fn redeclared(item: &'static str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Redeclared {
        item,
        name: name.to_string(),
    })
}

// Type Errors

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn binary_type_mismatch(op: BinaryOp, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch {
        op,
        left: left.to_string(),
        right: right.to_string(),
    })
}

/// Intrinsic or constructor received an argument of the wrong type.
#[cold]
pub fn wrong_arg_type(function: &str, expected: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument {
        function: function.to_string(),
        expected: expected.to_string(),
    })
}

#[cold]
pub fn not_callable(name: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        name: name.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn range_bound_not_int(got: &str) -> EvalError {
    type_mismatch("int range bound", got)
}

// Call Errors

#[cold]
pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn recursion_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth: limit })
}

// Access Errors

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

#[cold]
pub fn key_not_found(key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyNotFound {
        key: key.to_string(),
    })
}

#[cold]
pub fn cannot_index(receiver: &str, index: &str) -> EvalError {
    type_mismatch("an indexable value", &format!("{receiver}[{index}]"))
}

#[cold]
pub fn no_such_member(member: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchMember {
        member: member.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn private_member(member: &str, owner: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::PrivateMember {
        member: member.to_string(),
        owner: owner.to_string(),
    })
}

/// The left side of `=` does not name a storage location.
#[cold]
pub fn not_assignable(target: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotAssignable {
        target: target.to_string(),
    })
}

// Arithmetic Errors

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

#[cold]
pub fn invalid_arithmetic(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArithmetic {
        message: message.into(),
    })
}

// Mutation and Assertion Errors

#[cold]
pub fn const_mutation(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConstMutation {
        name: name.to_string(),
    })
}

#[cold]
pub fn assertion_failed(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AssertionFailed {
        message: message.into(),
    })
}

// Operator Errors

#[cold]
pub fn invalid_binary_op(op: BinaryOp, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidBinaryOp {
        op,
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn invalid_unary_op(op: UnaryOp, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidUnaryOp {
        op,
        type_name: type_name.to_string(),
    })
}

// Host Errors

#[cold]
pub fn io_error(context: &str, err: &std::io::Error) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Io {
        message: format!("{context}: {err}"),
    })
}

#[cold]
pub fn io_message(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Io {
        message: message.into(),
    })
}

#[cold]
pub fn exit_signal(code: i32) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Exit { code })
}

#[cfg(test)]
mod tests;
