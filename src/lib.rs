//! ISCop - a rule-based auditor for SSIS workflow projects
//!
//! This library opens projects of workflow packages, walks their control-flow
//! trees and data-flow pipelines, analyses embedded C# scripts, and reports
//! rule violations as [`Diagnostic`] values.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{Analyzer, Diagnostics, Engine};
pub use error::{
    handle_error, try_with_recovery, ErrorSeverity, IscopError, OptionExt, Result, ResultExt,
};
pub use models::{AnalysisReport, Diagnostic, Project, Settings, Severity};
pub use parsers::ProjectLoader;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
