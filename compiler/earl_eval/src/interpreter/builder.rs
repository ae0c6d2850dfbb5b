//! `InterpreterBuilder` for creating Interpreter instances with various
//! configurations.

use std::collections::VecDeque;
use std::rc::Rc;

use super::{InputSource, Interpreter, ModuleLoader};
use crate::diagnostics::CallStack;
use crate::intrinsics::Intrinsics;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Builder for [`Interpreter`].
///
/// Defaults: output to stdout, no program arguments, input from stdin, no
/// module loader (imports fail) and no recursion limit.
#[derive(Default)]
pub struct InterpreterBuilder {
    print_handler: Option<SharedPrintHandler>,
    argv: Vec<String>,
    input: Option<Vec<String>>,
    module_loader: Option<Rc<dyn ModuleLoader>>,
    max_call_depth: Option<usize>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where `print` writes.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Arguments returned by `argv()`.
    #[must_use]
    pub fn argv<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv = args.into_iter().map(Into::into).collect();
        self
    }

    /// Feed `input()` from these lines instead of stdin.
    #[must_use]
    pub fn input_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn module_loader(mut self, loader: Rc<dyn ModuleLoader>) -> Self {
        self.module_loader = Some(loader);
        self
    }

    /// Maximum number of nested calls; `None` means unlimited.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter {
            intrinsics: Intrinsics::new(),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            argv: self.argv,
            input: self.input.map_or(InputSource::Stdin, |lines| {
                InputSource::Lines(VecDeque::from(lines))
            }),
            module_loader: self.module_loader,
            call_stack: CallStack::new(self.max_call_depth),
            importing: Vec::new(),
        }
    }
}
