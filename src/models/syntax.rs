//! Owned syntax trees for script source
//!
//! The script parser lowers its concrete tree into these types so the
//! analysers never depend on the parser library directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declaration kind of a syntax element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Root,
    Namespace,
    Class,
    Method,
    Constructor,
    Property,
}

/// Declared accessibility of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessModifier {
    Public,
    Internal,
    Protected,
    ProtectedInternal,
    #[default]
    Private,
    PrivateProtected,
}

impl AccessModifier {
    /// Combine the modifier keywords of a declaration
    pub fn from_keywords<'a>(keywords: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut public = false;
        let mut internal = false;
        let mut protected = false;
        let mut private = false;
        for keyword in keywords {
            match keyword {
                "public" => public = true,
                "internal" => internal = true,
                "protected" => protected = true,
                "private" => private = true,
                _ => {}
            }
        }

        match (public, internal, protected, private) {
            (true, _, _, _) => Some(AccessModifier::Public),
            (_, true, true, _) => Some(AccessModifier::ProtectedInternal),
            (_, _, true, true) => Some(AccessModifier::PrivateProtected),
            (_, true, _, _) => Some(AccessModifier::Internal),
            (_, _, true, _) => Some(AccessModifier::Protected),
            (_, _, _, true) => Some(AccessModifier::Private),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Literal,
    Punctuation,
    Comment,
    Other,
}

/// One lexical token of an element's flat token stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
}

impl Token {
    /// The keyword opening a guarded (try) block
    pub fn is_guard(&self) -> bool {
        self.kind == TokenKind::Keyword && self.text == "try"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchClause {
    pub line: u32,
    /// Exception declaration, e.g. `(Exception ex)`
    pub declaration: Option<String>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TryStatement {
    pub line: u32,
    pub body: Vec<Statement>,
    pub catches: Vec<CatchClause>,
    pub finally: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// Expression statement; `text` excludes the trailing semicolon
    Expression { text: String, line: u32 },
    Try(TryStatement),
    Block { line: u32, statements: Vec<Statement> },
    Other {
        kind: String,
        line: u32,
        statements: Vec<Statement>,
    },
}

impl Statement {
    pub fn line(&self) -> u32 {
        match self {
            Statement::Expression { line, .. }
            | Statement::Block { line, .. }
            | Statement::Other { line, .. } => *line,
            Statement::Try(statement) => statement.line,
        }
    }

    /// Visit this statement and its children depth-first, pre-order.
    /// The walk stops early when `visit` returns false.
    pub fn walk<'a, F>(&'a self, visit: &mut F) -> bool
    where
        F: FnMut(&'a Statement) -> bool,
    {
        if !visit(self) {
            return false;
        }
        match self {
            Statement::Expression { .. } => true,
            Statement::Block { statements, .. } | Statement::Other { statements, .. } => {
                walk_statements(statements, visit)
            }
            Statement::Try(statement) => {
                walk_statements(&statement.body, visit)
                    && statement
                        .catches
                        .iter()
                        .all(|catch| walk_statements(&catch.body, visit))
                    && statement
                        .finally
                        .as_ref()
                        .map_or(true, |finally| walk_statements(finally, visit))
            }
        }
    }
}

/// Walk a statement list in order, see [`Statement::walk`]
pub fn walk_statements<'a, F>(statements: &'a [Statement], visit: &mut F) -> bool
where
    F: FnMut(&'a Statement) -> bool,
{
    statements.iter().all(|statement| statement.walk(visit))
}

/// A declaration in a parsed script document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxElement {
    pub kind: ElementKind,
    pub name: String,
    /// Dotted path of enclosing declarations plus this one
    pub full_name: String,
    pub access: AccessModifier,
    /// Declaration line, 1-based
    pub line: u32,
    pub tokens: Vec<Token>,
    pub statements: Vec<Statement>,
    pub children: Vec<SyntaxElement>,
    /// Set on roots of generated documents
    pub generated: bool,
}

impl SyntaxElement {
    pub fn root() -> Self {
        Self {
            kind: ElementKind::Root,
            name: String::new(),
            full_name: "Root".to_string(),
            access: AccessModifier::Public,
            line: 1,
            tokens: Vec::new(),
            statements: Vec::new(),
            children: Vec::new(),
            generated: false,
        }
    }

    pub fn is_method(&self) -> bool {
        self.kind == ElementKind::Method
    }

    /// Visit this element and every nested declaration, pre-order
    pub fn walk_elements<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a SyntaxElement),
    {
        visit(self);
        for child in &self.children {
            child.walk_elements(visit);
        }
    }

    /// Visit the element's statements depth-first
    pub fn walk_statements<'a, F>(&'a self, visit: &mut F) -> bool
    where
        F: FnMut(&'a Statement) -> bool,
    {
        walk_statements(&self.statements, visit)
    }

    /// Whether the element's token stream contains a `try` keyword
    pub fn has_guard_token(&self) -> bool {
        self.tokens.iter().any(Token::is_guard)
    }

    /// The try construct opened by the first `try` token of this element
    pub fn first_guard(&self) -> Option<&TryStatement> {
        let token = self.tokens.iter().find(|token| token.is_guard())?;

        let mut found = None;
        self.walk_statements(&mut |statement| match statement {
            Statement::Try(guard) if guard.line == token.line => {
                found = Some(guard);
                false
            }
            _ => true,
        });
        found.or_else(|| {
            // fall back to the first try statement in walk order
            let mut first = None;
            self.walk_statements(&mut |statement| match statement {
                Statement::Try(guard) => {
                    first = Some(guard);
                    false
                }
                _ => true,
            });
            first
        })
    }
}

/// A problem found in script source, by the parser or an analyser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub check_id: String,
    pub rule_name: String,
    pub message: String,
    pub line: u32,
}

impl Violation {
    pub fn new(
        check_id: impl Into<String>,
        rule_name: impl Into<String>,
        message: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            check_id: check_id.into(),
            rule_name: rule_name.into(),
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for SyntaxElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.kind, self.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(text: &str, line: u32) -> Statement {
        Statement::Expression {
            text: text.to_string(),
            line,
        }
    }

    fn method_with(statements: Vec<Statement>, tokens: Vec<Token>) -> SyntaxElement {
        SyntaxElement {
            kind: ElementKind::Method,
            name: "Main".to_string(),
            full_name: "Root.ScriptMain.Main".to_string(),
            access: AccessModifier::Public,
            line: 3,
            tokens,
            statements,
            children: Vec::new(),
            generated: false,
        }
    }

    #[test]
    fn test_access_modifier_from_keywords() {
        assert_eq!(
            AccessModifier::from_keywords(["public", "static"]),
            Some(AccessModifier::Public)
        );
        assert_eq!(
            AccessModifier::from_keywords(["protected", "internal"]),
            Some(AccessModifier::ProtectedInternal)
        );
        assert_eq!(
            AccessModifier::from_keywords(["private", "protected"]),
            Some(AccessModifier::PrivateProtected)
        );
        assert_eq!(AccessModifier::from_keywords(["override"]), None);
    }

    #[test]
    fn test_walk_is_depth_first() {
        let statements = vec![
            expr("a()", 1),
            Statement::Block {
                line: 2,
                statements: vec![expr("b()", 3), expr("c()", 4)],
            },
            expr("d()", 5),
        ];

        let mut seen = Vec::new();
        walk_statements(&statements, &mut |statement| {
            if let Statement::Expression { text, .. } = statement {
                seen.push(text.clone());
            }
            true
        });
        assert_eq!(seen, vec!["a()", "b()", "c()", "d()"]);
    }

    #[test]
    fn test_first_guard_follows_first_try_token() {
        let inner = TryStatement {
            line: 6,
            body: vec![expr("inner()", 7)],
            catches: Vec::new(),
            finally: None,
        };
        let outer = TryStatement {
            line: 4,
            body: vec![Statement::Try(inner)],
            catches: vec![CatchClause {
                line: 9,
                declaration: None,
                body: vec![expr("log()", 10)],
            }],
            finally: None,
        };
        let tokens = vec![
            Token {
                kind: TokenKind::Keyword,
                text: "try".to_string(),
                line: 4,
            },
            Token {
                kind: TokenKind::Keyword,
                text: "try".to_string(),
                line: 6,
            },
        ];
        let method = method_with(vec![Statement::Try(outer)], tokens);

        let guard = method.first_guard().unwrap();
        assert_eq!(guard.line, 4);
        assert_eq!(guard.catches.len(), 1);
    }

    #[test]
    fn test_no_try_token_means_no_guard() {
        let method = method_with(vec![expr("run()", 4)], Vec::new());
        assert!(method.first_guard().is_none());
    }
}
