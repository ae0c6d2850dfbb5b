//! File handles returned by `open`.

use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use bitflags::bitflags;

use crate::errors::{io_error, io_message, wrong_arg_type, EvalError};

bitflags! {
    /// Access requested by the mode string passed to `open`.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct FileMode: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const APPEND = 1 << 2;
        /// Create the file if it is missing (the `w` and `a` families).
        const CREATE = 1 << 3;
        /// Empty the file on open (`w`, `w+`).
        const TRUNCATE = 1 << 4;
    }
}

impl FileMode {
    /// `r`, `w`, `a`, `rw` / `r+`, `w+`, `a+`; a trailing `b` is accepted
    /// and ignored.
    ///
    /// `r` and `r+` need an existing file, `w` and `w+` empty it, `a` and
    /// `a+` keep it and write at the end.
    pub fn parse(mode: &str) -> Option<Self> {
        let mode = mode.strip_suffix('b').unwrap_or(mode);
        let overwrite = FileMode::WRITE | FileMode::CREATE | FileMode::TRUNCATE;
        let append = FileMode::WRITE | FileMode::CREATE | FileMode::APPEND;
        match mode {
            "r" => Some(FileMode::READ),
            "rw" | "r+" => Some(FileMode::READ | FileMode::WRITE),
            "w" => Some(overwrite),
            "w+" => Some(FileMode::READ | overwrite),
            "a" => Some(append),
            "a+" => Some(FileMode::READ | append),
            _ => None,
        }
    }
}

/// An OS file plus the path and mode it was opened with.
///
/// Closing drops the OS handle; the value stays usable for `is_open()`
/// and for error messages.
#[derive(Debug)]
pub struct FileHandle {
    path: PathBuf,
    mode: FileMode,
    file: Option<fs::File>,
}

impl FileHandle {
    pub fn open(path: impl Into<PathBuf>, mode: &str) -> Result<Self, EvalError> {
        let path = path.into();
        let mode = FileMode::parse(mode).ok_or_else(|| {
            wrong_arg_type("open", "a mode of \"r\", \"w\", \"a\", \"r+\", \"w+\" or \"a+\"")
        })?;
        let appends = mode.contains(FileMode::APPEND);
        let file = OpenOptions::new()
            .read(mode.contains(FileMode::READ))
            .write(mode.contains(FileMode::WRITE) && !appends)
            .append(appends)
            .create(mode.contains(FileMode::CREATE))
            .truncate(mode.contains(FileMode::TRUNCATE))
            .open(&path)
            .map_err(|e| io_error(&format!("cannot open {}", path.display()), &e))?;
        tracing::debug!(path = %path.display(), ?mode, "opened file");
        Ok(FileHandle {
            path,
            mode,
            file: Some(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn stream(&mut self) -> Result<&mut fs::File, EvalError> {
        let path = self.path.display().to_string();
        self.file
            .as_mut()
            .ok_or_else(|| io_message(format!("{path} is closed")))
    }

    /// Read everything from the current position.
    pub fn read_to_string(&mut self) -> Result<String, EvalError> {
        if !self.mode.contains(FileMode::READ) {
            return Err(io_message(format!(
                "{} was not opened for reading",
                self.path.display()
            )));
        }
        let path = self.path.display().to_string();
        let mut out = String::new();
        self.stream()?
            .read_to_string(&mut out)
            .map_err(|e| io_error(&format!("cannot read {path}"), &e))?;
        Ok(out)
    }

    pub fn write_str(&mut self, text: &str) -> Result<(), EvalError> {
        if !self.mode.contains(FileMode::WRITE) {
            return Err(io_message(format!(
                "{} was not opened for writing",
                self.path.display()
            )));
        }
        let path = self.path.display().to_string();
        self.stream()?
            .write_all(text.as_bytes())
            .map_err(|e| io_error(&format!("cannot write {path}"), &e))
    }

    /// Flush and release the OS handle. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), EvalError> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .map_err(|e| io_error(&format!("cannot flush {}", self.path.display()), &e))?;
        }
        Ok(())
    }
}
