//! Imports resolved from the file system.

use std::path::{Path, PathBuf};

use earl_eval::errors::io_error;
use earl_eval::{EvalError, ModuleLoader};
use earl_ir::Program;

/// Front-end hook turning source text into a syntax tree.
pub type ParseFn = dyn Fn(&str) -> Result<Program, String>;

/// Loads `import "path"` relative to a root directory and hands the text
/// to the front end's parser.
pub struct FileModuleLoader {
    root: PathBuf,
    parse: Box<ParseFn>,
}

impl FileModuleLoader {
    pub fn new(root: impl Into<PathBuf>, parse: Box<ParseFn>) -> Self {
        FileModuleLoader {
            root: root.into(),
            parse,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ModuleLoader for FileModuleLoader {
    fn load(&self, path: &str) -> Result<Program, EvalError> {
        let full = self.root.join(path);
        tracing::debug!(path = %full.display(), "loading module");
        let source = std::fs::read_to_string(&full)
            .map_err(|e| io_error(&format!("cannot import {path}"), &e))?;
        (self.parse)(&source).map_err(|message| {
            EvalError::new(format!("cannot import {path}: {message}"))
        })
    }
}
