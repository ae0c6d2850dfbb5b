//! Batch and REPL sessions over one persistent World.

use std::path::Path;

use earl_eval::{ContextRef, EvalError, Interpreter, Value};
use earl_ir::{Program, Stmt};

use crate::error::DriverError;
use crate::render::render_error;

/// How a batch run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every statement ran.
    Completed,
    /// The program called `exit(code)`.
    Exited(i32),
}

impl RunOutcome {
    /// Process exit status for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Completed => 0,
            RunOutcome::Exited(code) => code,
        }
    }
}

/// Result of one REPL line.
#[derive(Debug)]
pub enum LineOutcome {
    /// The statement ran; expression statements carry their value.
    Value(Value),
    /// The statement failed. The rendered report is also kept in
    /// [`Session::errors`].
    Error(String),
    /// The line called `exit(code)`.
    Exited(i32),
}

/// An interpreter plus the World every run of this session shares.
///
/// Declarations from earlier runs or lines stay visible to later ones.
pub struct Session {
    interpreter: Interpreter,
    world: ContextRef,
    source: Option<String>,
    errors: Vec<String>,
}

impl Session {
    pub fn new(interpreter: Interpreter) -> Self {
        let world = interpreter.new_world();
        Session {
            interpreter,
            world,
            source: None,
            errors: Vec::new(),
        }
    }

    pub fn world(&self) -> &ContextRef {
        &self.world
    }

    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    /// Source text used to turn spans into `line:col` in reports.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
    }

    /// Rendered reports of the errors raised by REPL lines, oldest first.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Render `err` against the current source text.
    pub fn render(&self, err: &EvalError) -> String {
        render_error(err, self.source.as_deref())
    }

    /// Run a whole program, stopping at the first error.
    pub fn run_program(&mut self, program: &Program) -> Result<RunOutcome, DriverError> {
        match self.interpreter.run_in(program, &self.world) {
            Ok(()) => Ok(RunOutcome::Completed),
            Err(err) => match err.exit_code() {
                Some(code) => {
                    tracing::debug!(code, "program exited");
                    Ok(RunOutcome::Exited(code))
                }
                None => Err(DriverError::Eval(err)),
            },
        }
    }

    /// Read `path`, parse it with `parse` and run it as a batch program.
    pub fn run_file(
        &mut self,
        path: &Path,
        parse: impl FnOnce(&str) -> Result<Program, String>,
    ) -> Result<RunOutcome, DriverError> {
        let source = std::fs::read_to_string(path).map_err(|source| DriverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let program = parse(&source).map_err(|message| DriverError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        self.source = Some(source);
        self.run_program(&program)
    }

    /// Evaluate one top-level statement.
    ///
    /// Failures are rendered and recorded; the World keeps every binding
    /// made before the failing statement.
    pub fn eval_line(&mut self, stmt: &Stmt) -> LineOutcome {
        match self.interpreter.eval_stmt(stmt, &self.world) {
            Ok(value) => LineOutcome::Value(value),
            Err(err) => {
                if let Some(code) = err.exit_code() {
                    return LineOutcome::Exited(code);
                }
                let rendered = self.render(&err);
                tracing::debug!(error = %err, "line failed");
                self.errors.push(rendered.clone());
                LineOutcome::Error(rendered)
            }
        }
    }
}
