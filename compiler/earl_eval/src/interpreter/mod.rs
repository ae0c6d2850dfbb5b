//! Tree-walking interpreter for EARL.
//!
//! # Architecture
//!
//! The interpreter itself holds only session-wide state: the intrinsics
//! table, the print handler, program arguments, the module loader and the
//! live call stack. Everything name-related lives in contexts
//! ([`ContextRef`]), which are passed explicitly to every evaluation
//! function.
//!
//! - `stmt.rs` - statements and control flow
//! - `expr.rs` - expressions, literals and operators
//! - `place.rs` - assignable locations (`x`, `xs[i]`, `obj.field`)
//! - `function_call.rs` - user functions, closures and instantiation
//! - `method_dispatch.rs` - `receiver.member` and `receiver.method(...)`
//! - `import.rs` - module loading
//!
//! Calls grow the host stack on demand; an optional call-depth limit turns
//! runaway recursion into a `Fatal` error instead.

mod builder;
mod expr;
mod function_call;
mod import;
mod method_dispatch;
mod place;
mod stmt;

pub use builder::InterpreterBuilder;
pub use import::{MemoryModuleLoader, ModuleLoader};

use std::collections::VecDeque;
use std::io::BufRead;
use std::rc::Rc;

use earl_ir::{Program, Span, Stmt};

use crate::context::{ContextRef, Variable};
use crate::diagnostics::CallStack;
use crate::errors::{io_error, EvalError, EvalResult};
use crate::intrinsics::Intrinsics;
use crate::print_handler::SharedPrintHandler;
use crate::value::{ClosureValue, Value};

/// How a statement finished.
#[derive(Debug)]
pub(crate) enum Flow {
    /// Fell through; carries the value of an expression statement.
    Normal(Value),
    /// `return` was executed; unwinds to the enclosing call.
    Return(Value),
}

/// An evaluated call argument, plus the variable it came from when the
/// argument was a bare name (needed for `ref` parameters).
pub(crate) struct Arg {
    pub(crate) value: Value,
    pub(crate) var: Option<Variable>,
}

impl Arg {
    pub(crate) fn value(value: Value) -> Self {
        Arg { value, var: None }
    }
}

/// Where `input()` reads from.
pub enum InputSource {
    Stdin,
    /// Pre-supplied lines, consumed front to back.
    Lines(VecDeque<String>),
}

/// Tree-walking interpreter.
///
/// Create one with [`InterpreterBuilder`]; it can run any number of
/// programs and statements.
pub struct Interpreter {
    pub(crate) intrinsics: Intrinsics,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) argv: Vec<String>,
    pub(crate) input: InputSource,
    pub(crate) module_loader: Option<Rc<dyn ModuleLoader>>,
    /// Live call stack for recursion limits and backtraces.
    pub(crate) call_stack: CallStack,
    /// Paths of the imports currently being evaluated, outermost first.
    pub(crate) importing: Vec<String>,
}

impl Interpreter {
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Program arguments exposed through `argv()`.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    /// A fresh, empty global context.
    pub fn new_world(&self) -> ContextRef {
        ContextRef::world()
    }

    /// Run a whole program in a fresh World and hand the World back.
    pub fn interpret(&mut self, program: &Program) -> Result<ContextRef, EvalError> {
        let world = self.new_world();
        self.run_in(program, &world)?;
        Ok(world)
    }

    /// Run every statement of `program` in `world`, stopping at the first
    /// error.
    pub fn run_in(&mut self, program: &Program, world: &ContextRef) -> Result<(), EvalError> {
        tracing::debug!(stmts = program.stmts.len(), "running program");
        for stmt in &program.stmts {
            self.exec_stmt(stmt, world)?;
        }
        Ok(())
    }

    /// Evaluate one statement in `ctx`.
    ///
    /// Expression statements yield their value, a top-level `return`
    /// yields the returned value and every other statement yields unit.
    pub fn eval_stmt(&mut self, stmt: &Stmt, ctx: &ContextRef) -> EvalResult {
        match self.exec_stmt(stmt, ctx)? {
            Flow::Normal(value) | Flow::Return(value) => Ok(value),
        }
    }

    /// Call a closure value with already evaluated arguments.
    pub fn call_closure(
        &mut self,
        closure: &ClosureValue,
        args: Vec<Value>,
        span: Span,
    ) -> EvalResult {
        let args = args.into_iter().map(Arg::value).collect();
        self.invoke_closure(closure, args, span)
    }

    /// Next line of input without its line terminator, or `None` at end of
    /// input.
    pub fn read_line(&mut self) -> Result<Option<String>, EvalError> {
        match &mut self.input {
            InputSource::Lines(lines) => Ok(lines.pop_front()),
            InputSource::Stdin => {
                let mut line = String::new();
                let read = std::io::stdin()
                    .lock()
                    .read_line(&mut line)
                    .map_err(|e| io_error("cannot read input", &e))?;
                if read == 0 {
                    return Ok(None);
                }
                let trimmed = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(trimmed);
                Ok(Some(line))
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
