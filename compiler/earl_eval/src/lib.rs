//! EARL runtime: tree-walking evaluation of the syntax tree from `earl_ir`.
//!
//! - [`Value`]: the closed set of runtime values and their operators
//! - [`ContextRef`]: World, Function, Class and Closure contexts and the
//!   name resolution between them
//! - [`Interpreter`]: statement and expression evaluation, calls, class
//!   instantiation, imports
//! - [`Intrinsics`]: built-in free functions and member functions
//!
//! Errors are [`EvalError`]s built through the factory functions in
//! [`errors`]; output goes through a [`SharedPrintHandler`].

pub mod context;
pub mod diagnostics;
pub mod errors;
pub mod interpreter;
pub mod intrinsics;
pub mod mutation;
pub mod operators;
pub mod print_handler;
pub mod stack;
pub mod unary_operators;
pub mod value;

pub use context::{ContextLink, ContextRef, ContextTag, Function, ScopeStack, Variable};
pub use diagnostics::{CallFrame, CallStack};
pub use errors::{
    BacktraceFrame, ErrorCategory, EvalBacktrace, EvalError, EvalErrorKind, EvalResult,
};
pub use interpreter::{
    InputSource, Interpreter, InterpreterBuilder, MemoryModuleLoader, ModuleLoader,
};
pub use intrinsics::{FreeFn, Intrinsics, MemberFn};
pub use mutation::{mutate, mutate_with};
pub use operators::evaluate_binary;
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use stack::ensure_sufficient_stack;
pub use unary_operators::evaluate_unary;
pub use value::{DictKey, DictValue, FileHandle, FileMode, KeyKind, Value, ValueKind};

/// Run `program` in a fresh World with a default interpreter.
pub fn interpret(program: &earl_ir::Program) -> Result<ContextRef, EvalError> {
    Interpreter::new().interpret(program)
}
