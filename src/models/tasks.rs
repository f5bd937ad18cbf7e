//! Task objects other than pipelines

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Script language tag accepted by the script rules
pub const CSHARP: &str = "CSharp";

/// Script task: a small script project with named source files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptTask {
    pub language: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

impl ScriptTask {
    pub fn is_csharp(&self) -> bool {
        self.language == CSHARP
    }

    pub fn file(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }
}

/// Task that launches an external process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteProcessTask {
    #[serde(default)]
    pub executable: String,
    #[serde(default)]
    pub arguments: String,
    #[serde(default)]
    pub standard_output_variable: Option<String>,
    #[serde(default)]
    pub standard_error_variable: Option<String>,
}

impl ExecuteProcessTask {
    /// True when neither standard output nor standard error is captured
    pub fn is_unlogged(&self) -> bool {
        fn unset(value: &Option<String>) -> bool {
            value.as_deref().map_or(true, |v| v.trim().is_empty())
        }
        unset(&self.standard_output_variable) || unset(&self.standard_error_variable)
    }
}
