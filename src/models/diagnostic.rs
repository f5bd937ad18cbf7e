//! Diagnostics emitted by the rules

use super::control_flow::ValidationMessage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
}

impl Severity {
    /// Four-letter tag used in the tab-separated rendering
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Error => "ERRO",
            Severity::Warning => "WARN",
            Severity::Information => "INFO",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ERRO" => Some(Severity::Error),
            "WARN" => Some(Severity::Warning),
            "INFO" => Some(Severity::Information),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Information => write!(f, "information"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" | "erro" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "information" | "info" => Ok(Severity::Information),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// One finding about one package. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub package: String,
    pub rule_id: String,
    pub rule_name: Option<String>,
    pub message: String,
    pub source: Option<String>,
    /// `None` when the line is unknown
    pub line: Option<u32>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        package: impl Into<String>,
        rule_id: impl Into<String>,
        rule_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            package: package.into(),
            rule_id: rule_id.into(),
            rule_name: Some(rule_name.into()),
            message: message.into(),
            source: None,
            line: None,
        }
    }

    /// Diagnostic for a message from the host's own package validation;
    /// the message code stands in for the rule id
    pub fn from_validation(
        severity: Severity,
        package: impl Into<String>,
        message: &ValidationMessage,
    ) -> Self {
        Self {
            severity,
            package: package.into(),
            rule_id: message.code.to_string(),
            rule_name: None,
            message: message.description.clone(),
            source: message.source.clone(),
            line: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Message with carriage returns and line feeds removed
    pub fn single_line_message(&self) -> String {
        self.message.replace(&['\r', '\n'][..], "")
    }

    /// Tab-separated form: severity, package, rule id, rule name, message,
    /// source, line. Absent fields are left blank.
    pub fn to_tab_separated(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.severity.tag(),
            self.package,
            self.rule_id,
            self.rule_name.as_deref().unwrap_or(""),
            self.single_line_message(),
            self.source.as_deref().unwrap_or(""),
            self.line.map(|line| line.to_string()).unwrap_or_default(),
        )
    }

    /// Parse a line produced by [`Diagnostic::to_tab_separated`]
    pub fn from_tab_separated(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 7 {
            return None;
        }

        let optional = |field: &str| {
            if field.is_empty() {
                None
            } else {
                Some(field.to_string())
            }
        };

        let line = if fields[6].is_empty() {
            None
        } else {
            Some(fields[6].parse().ok()?)
        };

        Some(Self {
            severity: Severity::from_tag(fields[0])?,
            package: fields[1].to_string(),
            rule_id: fields[2].to_string(),
            rule_name: optional(fields[3]),
            message: fields[4].to_string(),
            source: optional(fields[5]),
            line,
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tab_separated())
    }
}
