//! Session driver around the EARL runtime.
//!
//! A front end (parser plus REPL or command line) hands syntax trees to a
//! [`Session`]. Batch runs stop at the first error and return it; REPL
//! lines record the rendered error and leave the session usable.

mod error;
mod loader;
mod render;
mod session;

use std::sync::Once;

pub use error::DriverError;
pub use loader::{FileModuleLoader, ParseFn};
pub use render::render_error;
pub use session::{LineOutcome, RunOutcome, Session};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Does nothing unless `EARL_LOG` is set; its value is an `EnvFilter`
/// directive such as `earl_eval=debug`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if let Ok(directives) = std::env::var("EARL_LOG") {
            let filter = EnvFilter::new(directives);
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
