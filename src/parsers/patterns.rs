//! Error-handling pattern settings
//!
//! Two ordered lists of required catch-block expressions: one for the
//! script entry point (`Main`) and one for every other public method.
//!
//! ```toml
//! [[entry_point]]
//! pattern = 'Dts\.TaskResult = \(int\)ScriptResults\.Failure'
//! description = "Dts.TaskResult = (int)ScriptResults.Failure"
//!
//! [[public_method]]
//! pattern = 'Row\.Status = "FAILED"'
//! description = 'Row.Status = "FAILED"'
//! case_insensitive = true
//! ```

use crate::error::{IscopError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One required expression: a regex plus the text shown when it's missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub pattern: String,
    pub description: String,
    #[serde(default)]
    pub case_insensitive: bool,
}

impl PatternEntry {
    pub fn new(pattern: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            description: description.into(),
            case_insensitive: false,
        }
    }
}

/// Pattern lists for the two script analysis checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSettings {
    #[serde(default)]
    pub entry_point: Vec<PatternEntry>,
    #[serde(default)]
    pub public_method: Vec<PatternEntry>,
}

impl PatternSettings {
    /// Patterns expected in SSIS script tasks and script components
    pub fn builtin() -> Self {
        Self {
            entry_point: vec![
                PatternEntry::new(
                    r"Dts\.Events\.FireError\(0,.+,.+\.Message.+\.StackTrace,[\s]+string.Empty,[\s]+0\)",
                    "Dts.Events.FireError(0, <package name>, <exception message + stacktrace>, string.Empty, 0)",
                ),
                PatternEntry::new(
                    r"Dts\.TaskResult = \(int\)ScriptResults\.Failure",
                    "Dts.TaskResult = (int)ScriptResults.Failure",
                ),
            ],
            public_method: vec![
                PatternEntry::new(
                    r"ComponentMetaData\.FireWarning\(0, ComponentMetaData\.Name\.Trim\(\),.+\.Message.+\.StackTrace.+string.Empty,[\s]+0\)",
                    "ComponentMetaData.FireWarning(0, ComponentMetaData.Name.Trim(), <exception message + stacktrace>, string.Empty, 0)",
                ),
                PatternEntry::new(r#"Row\.Status = "FAILED""#, r#"Row.Status = "FAILED""#),
            ],
        }
    }

    /// Load pattern settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IscopError::PatternSettingsNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| IscopError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let settings: PatternSettings =
            toml::from_str(&content).map_err(|e| IscopError::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        log::debug!(
            "Loaded {} entry point and {} public method patterns from {}",
            settings.entry_point.len(),
            settings.public_method.len(),
            path.display()
        );
        Ok(settings)
    }

    /// Settings from `path` when given, the builtin ones otherwise
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self::builtin()
    }
}
