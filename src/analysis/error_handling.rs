//! Exception-handling pattern validator
//!
//! A method passes when its first `try` construct has catch blocks that
//! contain, somewhere and in any order, one expression statement matching
//! each required pattern. Patterns are consumed: a statement removes at most
//! one pattern, and a pattern is removed at most once.
//!
//! Only the first pattern still missing (in configured order) is reported.

use crate::error::{IscopError, Result};
use crate::models::syntax::TryStatement;
use crate::models::{Statement, SyntaxElement, Violation};
use crate::parsers::patterns::{PatternEntry, PatternSettings};
use regex::{Regex, RegexBuilder};

pub const MAIN_CHECK_ID: &str = "IS1001";
pub const MAIN_RULE_NAME: &str = "MainShouldHandleErrors";
pub const PUBLIC_CHECK_ID: &str = "IS1002";
pub const PUBLIC_RULE_NAME: &str = "PublicMethodsShouldHandleErrors";

/// A compiled required expression
#[derive(Debug, Clone)]
pub struct RequiredPattern {
    regex: Regex,
    description: String,
}

impl RequiredPattern {
    pub fn compile(entry: &PatternEntry) -> Result<Self> {
        let regex = RegexBuilder::new(&entry.pattern)
            .case_insensitive(entry.case_insensitive)
            .build()
            .map_err(|e| IscopError::InvalidPattern {
                pattern: entry.pattern.clone(),
                source: e,
            })?;

        Ok(Self {
            regex,
            description: entry.description.clone(),
        })
    }

    /// Unanchored search
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// One error-handling check (entry point or public methods)
#[derive(Debug, Clone)]
pub struct ErrorHandlingCheck {
    check_id: &'static str,
    rule_name: &'static str,
    patterns: Vec<RequiredPattern>,
}

impl ErrorHandlingCheck {
    pub fn new(
        check_id: &'static str,
        rule_name: &'static str,
        entries: &[PatternEntry],
    ) -> Result<Self> {
        let patterns = entries
            .iter()
            .map(RequiredPattern::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            check_id,
            rule_name,
            patterns,
        })
    }

    /// Check applied to the `Main` entry point
    pub fn entry_point(settings: &PatternSettings) -> Result<Self> {
        Self::new(MAIN_CHECK_ID, MAIN_RULE_NAME, &settings.entry_point)
    }

    /// Check applied to every other public method
    pub fn public_methods(settings: &PatternSettings) -> Result<Self> {
        Self::new(PUBLIC_CHECK_ID, PUBLIC_RULE_NAME, &settings.public_method)
    }

    pub fn check_id(&self) -> &'static str {
        self.check_id
    }

    pub fn rule_name(&self) -> &'static str {
        self.rule_name
    }

    pub fn patterns(&self) -> &[RequiredPattern] {
        &self.patterns
    }

    /// Required patterns no catch block statement of `guard` satisfies,
    /// in configured order
    pub fn missing_patterns(&self, guard: &TryStatement) -> Vec<&RequiredPattern> {
        let mut remaining: Vec<&RequiredPattern> = self.patterns.iter().collect();

        for catch in &guard.catches {
            for statement in &catch.body {
                statement.walk(&mut |statement| {
                    if let Statement::Expression { text, .. } = statement {
                        if let Some(index) = remaining.iter().position(|p| p.is_match(text)) {
                            remaining.remove(index);
                        }
                    }
                    !remaining.is_empty()
                });
            }
        }

        remaining
    }

    /// Validate one method; `None` means compliant
    pub fn validate(&self, element: &SyntaxElement) -> Option<Violation> {
        let Some(guard) = element.first_guard() else {
            let message = if element.has_guard_token() {
                format!(
                    "The method {} has a try keyword that could not be matched to a try statement.",
                    element.full_name
                )
            } else {
                self.message(element, "")
            };
            return Some(Violation::new(self.check_id, self.rule_name, message, element.line));
        };

        let missing = self.missing_patterns(guard);
        missing.first().map(|pattern| {
            let detail = format!(" Catch block should contain \"{}\"", pattern.description());
            Violation::new(
                self.check_id,
                self.rule_name,
                self.message(element, &detail),
                element.line,
            )
        })
    }

    fn message(&self, element: &SyntaxElement, detail: &str) -> String {
        format!(
            "The method {} must handle errors in a try/catch block.{}",
            element.full_name, detail
        )
    }
}
