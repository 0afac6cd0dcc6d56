//! CLI-layer errors.

use lattice_component::{ComponentError, DefineError};
use lattice_types::ErrorCode;
use thiserror::Error;

/// Error raised by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// The requested task does not name a runnable registered class.
    #[error("'{name}' is not a registered task; available tasks: {}", available.join(", "))]
    UnknownTask { name: String, available: Vec<String> },

    /// An override argument was neither `key=value` nor a boolean flag.
    #[error(
        "cannot interpret '{0}' as a configuration override; expected \
         'key=value', '--flag' or '--no-flag'"
    )]
    InvalidOverride(String),

    /// The same key was supplied twice on one command line.
    #[error("configuration key '{0}' was supplied more than once")]
    DuplicateOverride(String),

    /// Reading from the terminal failed.
    #[error("terminal input failed: {0}")]
    Input(#[from] std::io::Error),

    #[error(transparent)]
    Define(#[from] DefineError),

    #[error(transparent)]
    Component(#[from] ComponentError),
}

impl ErrorCode for CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownTask { .. } => "CLI_UNKNOWN_TASK",
            Self::InvalidOverride(_) => "CLI_INVALID_OVERRIDE",
            Self::DuplicateOverride(_) => "CLI_DUPLICATE_OVERRIDE",
            Self::Input(_) => "CLI_INPUT",
            Self::Define(e) => e.code(),
            Self::Component(e) => e.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::UnknownTask { .. }
            | Self::InvalidOverride(_)
            | Self::DuplicateOverride(_) => true,
            Self::Input(_) => false,
            Self::Define(e) => e.is_recoverable(),
            Self::Component(e) => e.is_recoverable(),
        }
    }
}
