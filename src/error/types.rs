//! Error types and definitions for ISCop
//!
//! Diagnostics produced by rules are data, not errors. The variants here cover
//! the failures that stop a run (configuration, loading, output) and the ones
//! that only abort a single operation.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for ISCop operations
#[derive(Debug, Error)]
pub enum IscopError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing errors with file context
    #[error("JSON parsing error in {file}: {source}")]
    JsonParse {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlParse {
        #[source]
        source: toml::de::Error,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Error-handling pattern settings file not found
    #[error("Pattern settings file '{path}' doesn't exist")]
    PatternSettingsNotFound { path: PathBuf },

    /// A required-expression pattern does not compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// Project file not found
    #[error("Project not found at {path}")]
    ProjectNotFound { path: PathBuf },

    /// Project file is structurally invalid
    #[error("Invalid project {path}: {message}")]
    InvalidProject { path: PathBuf, message: String },

    /// Script source could not be parsed at all
    #[error("Script parse error: {message}")]
    ScriptParse { message: String },

    /// A pipeline graph is malformed (cycle, dangling endpoint)
    #[error("Malformed data flow graph in {pipeline}: {message}")]
    MalformedGraph { pipeline: String, message: String },

    /// A rule failed while checking a package
    #[error("Rule {rule} failed on package {package}: {message}")]
    RuleFailed {
        rule: String,
        package: String,
        message: String,
    },

    /// Invalid output format
    #[error("Invalid output format: {format}")]
    InvalidOutputFormat { format: String },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// Parallel execution error
    #[error("Parallel execution error: {message}")]
    ParallelExecution { message: String },

    /// Analysis errors carrying added context
    #[error("Analysis error: {message}")]
    Analysis { message: String },
}

impl IscopError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Warning level errors - operation can continue
            IscopError::ScriptParse { .. } => ErrorSeverity::Warning,
            IscopError::MalformedGraph { .. } => ErrorSeverity::Warning,

            // Critical errors - process should terminate
            IscopError::Config { .. } => ErrorSeverity::Critical,
            IscopError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            IscopError::ConfigRead { .. } => ErrorSeverity::Critical,
            IscopError::ConfigParse { .. } => ErrorSeverity::Critical,
            IscopError::PatternSettingsNotFound { .. } => ErrorSeverity::Critical,
            IscopError::InvalidPattern { .. } => ErrorSeverity::Critical,
            IscopError::ProjectNotFound { .. } => ErrorSeverity::Critical,
            IscopError::InvalidProject { .. } => ErrorSeverity::Critical,
            IscopError::JsonParse { .. } => ErrorSeverity::Critical,
            IscopError::RuleFailed { .. } => ErrorSeverity::Critical,
            IscopError::InvalidOutputFormat { .. } => ErrorSeverity::Critical,
            IscopError::StdoutWrite { .. } => ErrorSeverity::Critical,

            // Regular errors - current operation fails but overall process can continue
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            IscopError::JsonParse { file, source } => {
                format!("Invalid JSON in '{}': {}. Please check the project file format.", file.display(), source)
            }
            IscopError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            IscopError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create a config file or use command line options.", path.display())
            }
            IscopError::PatternSettingsNotFound { path } => {
                format!("Pattern settings file '{}' doesn't exist. Script analysis rules cannot be created.", path.display())
            }
            IscopError::ProjectNotFound { path } => {
                format!("No project found at '{}'. Please provide a valid project file or directory.", path.display())
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Get a suggestion for resolving the error, if there is an obvious one
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            IscopError::ConfigNotFound { .. } => {
                Some("Run `iscop --init` to create a .iscop.toml file, or pass --config")
            }
            IscopError::PatternSettingsNotFound { .. } => {
                Some("Remove the pattern_file setting to use the built-in patterns")
            }
            IscopError::InvalidPattern { .. } => {
                Some("Patterns are regular expressions; escape '(', ')', '.' and '\\' literally")
            }
            IscopError::RuleFailed { .. } => {
                Some("Use --skip-failing-rules to continue past rules that fail")
            }
            _ => None,
        }
    }

    /// Create an IO error
    pub fn io_error(source: std::io::Error) -> Self {
        IscopError::Io { source }
    }

    /// Create a JSON parse error with file context
    pub fn json_parse_error(file: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        IscopError::JsonParse {
            file: file.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        IscopError::Config {
            message: message.into(),
        }
    }

    /// Create a rule failure error
    pub fn rule_failed(
        rule: impl Into<String>,
        package: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        IscopError::RuleFailed {
            rule: rule.into(),
            package: package.into(),
            message: message.into(),
        }
    }

    /// Create a malformed graph error
    pub fn malformed_graph(pipeline: impl Into<String>, message: impl Into<String>) -> Self {
        IscopError::MalformedGraph {
            pipeline: pipeline.into(),
            message: message.into(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for IscopError {
    fn from(err: std::io::Error) -> Self {
        IscopError::io_error(err)
    }
}

impl From<toml::de::Error> for IscopError {
    fn from(err: toml::de::Error) -> Self {
        IscopError::TomlParse { source: err }
    }
}

impl From<csv::Error> for IscopError {
    fn from(err: csv::Error) -> Self {
        IscopError::Csv { source: err }
    }
}

impl From<glob::PatternError> for IscopError {
    fn from(err: glob::PatternError) -> Self {
        IscopError::GlobPattern { source: err }
    }
}

impl From<serde_json::Error> for IscopError {
    fn from(err: serde_json::Error) -> Self {
        IscopError::JsonSerialize { source: err }
    }
}

/// Result type alias for ISCop operations
pub type Result<T> = std::result::Result<T, IscopError>;
