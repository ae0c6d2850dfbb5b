//! Runtime values.
//!
//! Scalars, strings and collections have value semantics: `clone()` is a
//! deep copy, which is what binding, argument passing and returning do.
//! Class instances, closures, open files and modules are handles:
//! `clone()` aliases the same object. [`Value::copy`] is the explicit deep
//! copy behind the `copy(x)` intrinsic and also duplicates class
//! instances.
//!
//! Whether a binding is `const` is a property of the variable that holds
//! the value, not of the value; see [`crate::context::Variable`].

mod closure;
mod dict;
mod file;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use earl_ir::TypeAnn;

pub use closure::ClosureValue;
pub use dict::{DictKey, DictValue, KeyKind};
pub use file::{FileHandle, FileMode};

use crate::context::ContextRef;
use crate::errors::{type_mismatch, EvalError};

/// Shared handle to an open (or closed) file.
pub type FileRef = Rc<RefCell<FileHandle>>;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(String),
    List(Vec<Value>),
    /// Fixed-length sequence; elements cannot be reassigned.
    Tuple(Vec<Value>),
    Dict(Box<DictValue>),
    Option(Option<Box<Value>>),
    File(FileRef),
    Closure(Rc<ClosureValue>),
    /// A class instance: its own class context.
    Class(ContextRef),
    /// An imported module, reachable through its name.
    Module(ContextRef),
    /// Result of statements and of functions that return nothing.
    Unit,
}

/// Type tags used for dispatch and diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    Bool,
    Char,
    Str,
    List,
    Tuple,
    Dict,
    Option,
    File,
    Closure,
    Class,
    Module,
    Unit,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Char => "char",
            ValueKind::Str => "str",
            ValueKind::List => "list",
            ValueKind::Tuple => "tuple",
            ValueKind::Dict => "dict",
            ValueKind::Option => "option",
            ValueKind::File => "file",
            ValueKind::Closure => "closure",
            ValueKind::Class => "class",
            ValueKind::Module => "module",
            ValueKind::Unit => "unit",
        }
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Factory methods

impl Value {
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    #[inline]
    pub fn some(v: Value) -> Self {
        Value::Option(Some(Box::new(v)))
    }

    #[inline]
    pub fn none() -> Self {
        Value::Option(None)
    }

    pub fn dict(d: DictValue) -> Self {
        Value::Dict(Box::new(d))
    }

    pub fn file(handle: FileHandle) -> Self {
        Value::File(Rc::new(RefCell::new(handle)))
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Char(_) => ValueKind::Char,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Dict(_) => ValueKind::Dict,
            Value::Option(_) => ValueKind::Option,
            Value::File(_) => ValueKind::File,
            Value::Closure(_) => ValueKind::Closure,
            Value::Class(_) => ValueKind::Class,
            Value::Module(_) => ValueKind::Module,
            Value::Unit => ValueKind::Unit,
        }
    }

    /// Name used in diagnostics and by `type(x)`; class instances report
    /// their class name.
    pub fn type_name(&self) -> String {
        match self {
            Value::Class(instance) => instance.class_name().unwrap_or_default(),
            other => other.kind().as_str().to_string(),
        }
    }

    /// Truthiness used by `if`, `while`, `!`, `&&`, `||` and `assert`.
    pub fn boolean(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::Char(c) => *c != '\0',
            Value::Str(_) | Value::Closure(_) | Value::Class(_) | Value::Module(_) => true,
            Value::List(xs) | Value::Tuple(xs) => !xs.is_empty(),
            Value::Dict(d) => !d.is_empty(),
            Value::Option(opt) => opt.is_some(),
            Value::File(f) => f.borrow().is_open(),
            Value::Unit => false,
        }
    }

    /// Deep copy that also duplicates class instances.
    ///
    /// Closures, files and modules stay shared: a closure is immutable once
    /// created and the other two name host resources.
    #[must_use]
    pub fn copy(&self) -> Value {
        match self {
            Value::List(xs) => Value::List(xs.iter().map(Value::copy).collect()),
            Value::Tuple(xs) => Value::Tuple(xs.iter().map(Value::copy).collect()),
            Value::Dict(d) => Value::dict(d.copy()),
            Value::Option(Some(v)) => Value::some(v.copy()),
            Value::Class(instance) => Value::Class(instance.copy_instance()),
            other => other.clone(),
        }
    }

    /// Whether a binary operator or a mutation may combine the two values.
    ///
    /// Numbers combine with numbers, strings with chars, and everything
    /// else only with its own kind.
    pub fn type_is_compatible(&self, other: &Value) -> bool {
        let (a, b) = (self.kind(), other.kind());
        (a.is_numeric() && b.is_numeric())
            || a == b
            || matches!(
                (a, b),
                (ValueKind::Str, ValueKind::Char) | (ValueKind::Char, ValueKind::Str)
            )
    }

    /// Whether the value satisfies a type annotation.
    pub fn matches_ann(&self, ann: &TypeAnn) -> bool {
        match (ann, self) {
            (TypeAnn::Any, _)
            | (TypeAnn::Int, Value::Int(_))
            | (TypeAnn::Float, Value::Float(_))
            | (TypeAnn::Bool, Value::Bool(_))
            | (TypeAnn::Char, Value::Char(_))
            | (TypeAnn::Str, Value::Str(_))
            | (TypeAnn::List, Value::List(_))
            | (TypeAnn::Tuple, Value::Tuple(_))
            | (TypeAnn::Dict, Value::Dict(_))
            | (TypeAnn::Option, Value::Option(_))
            | (TypeAnn::File, Value::File(_))
            | (TypeAnn::Closure, Value::Closure(_))
            | (TypeAnn::Unit, Value::Unit) => true,
            (TypeAnn::Class(name), Value::Class(instance)) => {
                instance.class_name().as_deref() == Some(name.as_str())
            }
            _ => false,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Check `value` against an optional annotation.
///
/// An `int` flowing into a `float` slot is promoted; every other mismatch
/// is a `TypeError`.
#[expect(
    clippy::cast_precision_loss,
    reason = "int-to-float promotion is the language's conversion"
)]
pub fn check_ann(value: Value, ann: Option<&TypeAnn>) -> Result<Value, EvalError> {
    let Some(ann) = ann else {
        return Ok(value);
    };
    match (ann, value) {
        (TypeAnn::Float, Value::Int(n)) => Ok(Value::Float(n as f64)),
        (ann, value) if value.matches_ann(ann) => Ok(value),
        (ann, value) => Err(type_mismatch(&ann.to_string(), &value.type_name())),
    }
}

impl PartialEq for Value {
    #[expect(
        clippy::cast_precision_loss,
        reason = "mixed int/float comparison promotes like arithmetic"
    )]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) => (*a as f64) == *b,
            (Value::Float(a), Value::Int(b)) => *a == (*b as f64),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Str(s), Value::Char(c)) | (Value::Char(c), Value::Str(s)) => {
                let mut chars = s.chars();
                chars.next() == Some(*c) && chars.next().is_none()
            }
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Option(a), Value::Option(b)) => a == b,
            (Value::File(a), Value::File(b)) => Rc::ptr_eq(a, b),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) | (Value::Module(a), Value::Module(b)) => {
                a.ptr_eq(b)
            }
            (Value::Unit, Value::Unit) => true,
            _ => false,
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_nested(f, item)?;
    }
    f.write_str(close)
}

/// Inside a collection strings and chars are quoted.
pub(crate) fn write_nested(f: &mut fmt::Formatter<'_>, v: &Value) -> fmt::Result {
    match v {
        Value::Str(s) => write!(f, "{s:?}"),
        Value::Char(c) => write!(f, "{c:?}"),
        other => write!(f, "{other}"),
    }
}

/// The text `print` and `str(x)` produce.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write_float(f, *x),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Str(s) => f.write_str(s),
            Value::List(xs) => write_seq(f, "[", xs, "]"),
            Value::Tuple(xs) => write_seq(f, "(", xs, ")"),
            Value::Dict(d) => write!(f, "{d}"),
            Value::Option(Some(v)) => {
                f.write_str("some(")?;
                write_nested(f, v)?;
                f.write_str(")")
            }
            Value::Option(None) => f.write_str("none"),
            Value::File(handle) => write!(f, "<file {}>", handle.borrow().path().display()),
            Value::Closure(_) => f.write_str("<closure>"),
            Value::Class(instance) => {
                write!(f, "<{}>", instance.class_name().unwrap_or_default())
            }
            Value::Module(world) => {
                write!(f, "<module {}>", world.module_name().unwrap_or_default())
            }
            Value::Unit => f.write_str("<unit>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(_) | Value::Char(_) => write_nested(f, self),
            _ => write!(f, "{self}"),
        }
    }
}
