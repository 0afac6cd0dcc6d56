//! Command-line front end for Lattice component tasks.
//!
//! Thin layer over `lattice-component`: it turns command-line arguments
//! into configuration input, matches the requested task against the
//! registered runnable classes, and wires up interactive terminal
//! prompting.
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`args`] | argument parsing and task dispatch |
//! | [`overrides`] | `key=value` and `--flag` / `--no-flag` translation |
//! | [`parse`] | text-to-literal parsing |
//! | [`console`] | blocking terminal prompts |
//! | [`error`] | `CliError` |

use tracing_subscriber::EnvFilter;

pub mod args;
pub mod console;
pub mod error;
pub mod overrides;
pub mod parse;

pub use args::{run_task, run_task_with, TaskArgs};
pub use console::ConsolePrompt;
pub use error::CliError;
pub use overrides::parse_overrides;
pub use parse::parse_literal;

/// Initialise tracing output for a task binary.
///
/// Honours `RUST_LOG`; defaults to `warn` so resolver warnings (like
/// automatic candidate selection) stay visible.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
