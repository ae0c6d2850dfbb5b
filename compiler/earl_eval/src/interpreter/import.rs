//! Module loading.
//!
//! `import "path";` asks the [`ModuleLoader`] for the parsed program,
//! interprets it into a fresh World and links that World into the
//! importer under the module's name: the `mod` declaration when the file
//! has one, otherwise the file stem of the path.

use std::path::Path;

use earl_ir::Program;
use rustc_hash::FxHashMap;

use super::Interpreter;
use crate::context::ContextRef;
use crate::errors::{io_message, EvalError};

/// Supplies parsed programs for `import`.
///
/// The lexer and parser live outside the runtime; a front end implements
/// this to connect them.
pub trait ModuleLoader {
    fn load(&self, path: &str) -> Result<Program, EvalError>;
}

/// Loader backed by programs registered up front.
#[derive(Default)]
pub struct MemoryModuleLoader {
    modules: FxHashMap<String, Program>,
}

impl MemoryModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_module(mut self, path: impl Into<String>, program: Program) -> Self {
        self.insert(path, program);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, program: Program) {
        self.modules.insert(path.into(), program);
    }
}

impl ModuleLoader for MemoryModuleLoader {
    fn load(&self, path: &str) -> Result<Program, EvalError> {
        self.modules
            .get(path)
            .cloned()
            .ok_or_else(|| io_message(format!("no module at {path}")))
    }
}

impl Interpreter {
    #[tracing::instrument(level = "debug", skip(self, ctx))]
    pub(crate) fn exec_import(&mut self, path: &str, ctx: &ContextRef) -> Result<(), EvalError> {
        if self.importing.iter().any(|p| p == path) {
            let mut chain = self.importing.join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(path);
            return Err(EvalError::new(format!("circular import: {chain}")));
        }
        let loader = self
            .module_loader
            .clone()
            .ok_or_else(|| io_message(format!("cannot import {path}: no module loader configured")))?;
        let program = loader.load(path)?;

        let world = self.new_world();
        self.importing.push(path.to_string());
        let result = self.run_in(&program, &world);
        self.importing.pop();
        result?;

        let name = world.module_name().unwrap_or_else(|| {
            Path::new(path)
                .file_stem()
                .map_or_else(|| path.to_string(), |stem| stem.to_string_lossy().into_owned())
        });
        tracing::debug!(module = %name, "module imported");
        ctx.add_import(&name, world)
    }
}
