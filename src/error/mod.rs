//! Error handling for ISCop
//!
//! This module provides the error type, result alias, and error context
//! utilities shared by the loaders, the rule engine and the CLI.

pub mod context;
pub mod types;

pub use context::{handle_error, try_with_recovery, OptionExt, ResultExt};
pub use types::{ErrorSeverity, IscopError, Result};
