use std::path::PathBuf;

use earl_eval::EvalError;

/// Failure of a driver-level operation.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The program raised an error other than `exit`.
    #[error("{0}")]
    Eval(#[from] EvalError),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The front end rejected the source text.
    #[error("parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl DriverError {
    /// The runtime error, if this came from evaluation.
    pub fn eval_error(&self) -> Option<&EvalError> {
        match self {
            DriverError::Eval(err) => Some(err),
            _ => None,
        }
    }
}
