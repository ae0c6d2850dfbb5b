//! Where `print`, `println` and the `input` prompt end up.
//!
//! Programs never touch stdout directly. The interpreter holds a
//! [`SharedPrintHandler`] chosen by the embedder: the driver prints to the
//! terminal, tests capture the text and compare it, and batch tools can
//! drop it altogether. All handlers are shared behind an `Arc` so a test
//! can keep one clone for assertions while the interpreter writes through
//! another.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Output destination of a running program.
pub enum PrintHandler {
    /// The process's stdout. Partial lines are flushed straight away so an
    /// `input` prompt shows up before the program blocks on stdin.
    Stdout,
    /// Everything written so far, in order.
    Capture(Mutex<String>),
    Silent,
}

impl PrintHandler {
    /// Write `msg` followed by a newline.
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout => println!("{msg}"),
            Self::Capture(text) => {
                let mut text = text.lock();
                text.push_str(msg);
                text.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Write `msg` as is.
    pub fn print(&self, msg: &str) {
        match self {
            Self::Stdout => {
                let mut out = io::stdout().lock();
                if out.write_all(msg.as_bytes()).and_then(|()| out.flush()).is_err() {
                    tracing::warn!("stdout is closed; dropping output");
                }
            }
            Self::Capture(text) => text.lock().push_str(msg),
            Self::Silent => {}
        }
    }

    /// The captured text. Stdout and silent handlers keep nothing.
    pub fn get_output(&self) -> String {
        match self {
            Self::Capture(text) => text.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }
}

pub type SharedPrintHandler = Arc<PrintHandler>;

/// The default handler.
pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Capture(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}
