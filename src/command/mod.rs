mod commands;
mod history;

pub use commands::Command;
pub use history::{CommandHistory, DEFAULT_MAX_HISTORY};

pub use crate::error::CommandError;

/// Result type for command construction
pub type CommandResult<T> = Result<T, CommandError>;
