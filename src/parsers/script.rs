//! Script parser interface
//!
//! A parser turns script source into a [`SyntaxElement`] tree plus the
//! violations it ran into and a few lines of raw output.

use crate::error::Result;
use crate::models::{SyntaxElement, Violation};
use std::fmt;

/// Check id reported for source the parser could not make sense of
pub const SYNTAX_CHECK_ID: &str = "CS0001";
pub const SYNTAX_RULE_NAME: &str = "ScriptSyntax";

/// Declared encoding of a script file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptEncoding {
    #[default]
    Utf8,
    Unicode,
}

impl ScriptEncoding {
    /// Parse the encoding tag stored next to script component sources
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "unicode" | "utf16" | "utf-16" => ScriptEncoding::Unicode,
            _ => ScriptEncoding::Utf8,
        }
    }

    /// Source text with any byte-order mark removed
    pub fn strip_bom<'a>(&self, source: &'a str) -> &'a str {
        source.strip_prefix('\u{feff}').unwrap_or(source)
    }
}

impl fmt::Display for ScriptEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptEncoding::Utf8 => write!(f, "UTF8"),
            ScriptEncoding::Unicode => write!(f, "Unicode"),
        }
    }
}

/// Result of parsing one script document
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedScript {
    pub root: SyntaxElement,
    /// Problems the parser itself ran into
    pub violations: Vec<Violation>,
    /// Raw textual output; informational only
    pub output: Vec<String>,
}

impl ParsedScript {
    /// True when the document is marked as generated code
    pub fn is_generated(&self) -> bool {
        self.root.generated
    }
}

/// Parser for one script language
pub trait ScriptParser: Send + Sync {
    /// Language tag this parser handles, e.g. `CSharp`
    fn language(&self) -> &'static str;

    fn parse(&self, source: &str, encoding: ScriptEncoding) -> Result<ParsedScript>;
}
