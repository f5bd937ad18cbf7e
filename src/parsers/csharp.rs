//! C# script parser built on tree-sitter
//!
//! The concrete syntax tree is lowered into owned [`SyntaxElement`]s right
//! away; no tree-sitter types escape this module.

use super::script::{ParsedScript, ScriptEncoding, ScriptParser, SYNTAX_CHECK_ID, SYNTAX_RULE_NAME};
use crate::error::{IscopError, Result};
use crate::models::syntax::{CatchClause, TryStatement};
use crate::models::tasks::CSHARP;
use crate::models::{
    AccessModifier, ElementKind, Statement, SyntaxElement, Token, TokenKind, Violation,
};
use tree_sitter::{Node, Parser};

/// Parser for C# script tasks and script components
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpParser;

impl CSharpParser {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptParser for CSharpParser {
    fn language(&self) -> &'static str {
        CSHARP
    }

    fn parse(&self, source: &str, encoding: ScriptEncoding) -> Result<ParsedScript> {
        let source = encoding.strip_bom(source);

        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::language())
            .map_err(|e| IscopError::ScriptParse {
                message: format!("Failed to set language: {}", e),
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| IscopError::ScriptParse {
                message: "Failed to parse script source".to_string(),
            })?;

        let lowering = Lowering {
            source: source.as_bytes(),
        };
        let root_node = tree.root_node();

        let mut root = SyntaxElement::root();
        root.generated = is_generated(source);
        root.children = lowering.elements(root_node, &root.full_name);

        let mut violations = Vec::new();
        if root_node.has_error() {
            lowering.syntax_errors(root_node, &mut violations);
        }

        let output = vec![format!(
            "Parsed {} bytes ({}): {} top-level declarations, {} syntax errors",
            source.len(),
            encoding,
            root.children.len(),
            violations.len()
        )];

        Ok(ParsedScript {
            root,
            violations,
            output,
        })
    }
}

/// Generated documents carry an `<auto-generated` marker in their header
fn is_generated(source: &str) -> bool {
    source
        .lines()
        .map(str::trim)
        .take_while(|line| line.starts_with("//") || line.is_empty())
        .any(|line| line.contains("<auto-generated"))
}

fn line_of(node: Node<'_>) -> u32 {
    node.start_position().row as u32 + 1
}

fn is_statement_kind(kind: &str) -> bool {
    kind == "block" || kind.ends_with("_statement")
}

fn token_kind(node: Node<'_>) -> TokenKind {
    let kind = node.kind();
    if kind == "comment" {
        TokenKind::Comment
    } else if kind.contains("literal") {
        TokenKind::Literal
    } else if kind == "identifier" {
        TokenKind::Identifier
    } else if node.is_named() {
        TokenKind::Other
    } else if kind.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
        TokenKind::Keyword
    } else {
        TokenKind::Punctuation
    }
}

struct Lowering<'s> {
    source: &'s [u8],
}

impl<'s> Lowering<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        node.utf8_text(self.source).unwrap_or("")
    }

    /// Declarations nested anywhere below `node`
    fn elements(&self, node: Node<'_>, parent: &str) -> Vec<SyntaxElement> {
        let mut elements = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match self.element(child, parent) {
                Some(element) => elements.push(element),
                None => elements.extend(self.elements(child, parent)),
            }
        }
        elements
    }

    fn element(&self, node: Node<'_>, parent: &str) -> Option<SyntaxElement> {
        let (kind, default_access) = match node.kind() {
            "namespace_declaration" | "file_scoped_namespace_declaration" => {
                (ElementKind::Namespace, AccessModifier::Public)
            }
            "class_declaration" | "struct_declaration" | "interface_declaration"
            | "record_declaration" => (ElementKind::Class, AccessModifier::Internal),
            "method_declaration" => (ElementKind::Method, AccessModifier::Private),
            "constructor_declaration" => (ElementKind::Constructor, AccessModifier::Private),
            "property_declaration" => (ElementKind::Property, AccessModifier::Private),
            _ => return None,
        };

        let name_node = node.child_by_field_name("name");
        let name = name_node
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let modifiers = self.modifiers(node);

        let mut element = SyntaxElement {
            kind,
            full_name: format!("{}.{}", parent, name),
            name,
            access: AccessModifier::from_keywords(modifiers).unwrap_or(default_access),
            line: line_of(name_node.unwrap_or(node)),
            tokens: Vec::new(),
            statements: Vec::new(),
            children: Vec::new(),
            generated: false,
        };

        match kind {
            ElementKind::Namespace | ElementKind::Class => {
                element.children = self.elements(node, &element.full_name);
            }
            ElementKind::Method | ElementKind::Constructor => {
                self.tokens(node, &mut element.tokens);
                if let Some(body) = node.child_by_field_name("body") {
                    element.statements = self.body(body);
                }
            }
            ElementKind::Property | ElementKind::Root => {}
        }

        Some(element)
    }

    fn modifiers(&self, node: Node<'_>) -> Vec<&'s str> {
        let mut cursor = node.walk();
        let modifiers = node
            .children(&mut cursor)
            .filter(|child| child.kind() == "modifier")
            .map(|child| self.text(child))
            .collect();
        modifiers
    }

    /// Flat token stream: every leaf under `node`, in source order
    fn tokens(&self, node: Node<'_>, tokens: &mut Vec<Token>) {
        if node.child_count() == 0 {
            let text = self.text(node);
            if !text.is_empty() {
                tokens.push(Token {
                    kind: token_kind(node),
                    text: text.to_string(),
                    line: line_of(node),
                });
            }
            return;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.tokens(child, tokens);
        }
    }

    fn body(&self, node: Node<'_>) -> Vec<Statement> {
        match node.kind() {
            "block" => self.statements(node),
            "arrow_expression_clause" => {
                let mut statements = vec![Statement::Expression {
                    text: self.text(node).trim_start_matches("=>").trim().to_string(),
                    line: line_of(node),
                }];
                self.lambdas(node, &mut statements);
                statements
            }
            _ => {
                let mut statements = Vec::new();
                self.lower(node, &mut statements);
                statements
            }
        }
    }

    /// Statements directly inside a block
    fn statements(&self, block: Node<'_>) -> Vec<Statement> {
        let mut statements = Vec::new();
        let mut cursor = block.walk();
        for child in block.named_children(&mut cursor) {
            self.lower(child, &mut statements);
        }
        statements
    }

    /// Lower one statement; block-bodied lambdas in an expression statement
    /// follow it as siblings
    fn lower(&self, node: Node<'_>, out: &mut Vec<Statement>) {
        if let Some(statement) = self.statement(node) {
            out.push(statement);
            if node.kind() == "expression_statement" {
                self.lambdas(node, out);
            }
        }
    }

    /// Block bodies of lambdas and anonymous methods under `node`, each
    /// lowered as an `Other` statement
    fn lambdas(&self, node: Node<'_>, out: &mut Vec<Statement>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.lambda(child, out);
        }
    }

    fn lambda(&self, node: Node<'_>, out: &mut Vec<Statement>) {
        if !matches!(node.kind(), "lambda_expression" | "anonymous_method_expression") {
            self.lambdas(node, out);
            return;
        }

        let body = node.child_by_field_name("body").or_else(|| {
            let mut cursor = node.walk();
            let block = node
                .named_children(&mut cursor)
                .find(|child| child.kind() == "block");
            block
        });
        match body {
            Some(block) if block.kind() == "block" => out.push(Statement::Other {
                kind: node.kind().to_string(),
                line: line_of(node),
                statements: self.statements(block),
            }),
            Some(expression) => self.lambda(expression, out),
            None => {}
        }
    }

    /// Statements nested in a compound or declaration statement
    fn nested(&self, node: Node<'_>) -> Vec<Statement> {
        let mut statements = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if is_statement_kind(child.kind()) {
                self.lower(child, &mut statements);
            } else if matches!(child.kind(), "else_clause" | "switch_body" | "switch_section") {
                statements.extend(self.nested(child));
            } else {
                // declarations and conditions may hold lambda bodies
                self.lambda(child, &mut statements);
            }
        }
        statements
    }

    fn try_statement(&self, node: Node<'_>) -> TryStatement {
        let mut catches = Vec::new();
        let mut finally = None;

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "catch_clause" => catches.push(self.catch_clause(child)),
                "finally_clause" => finally = Some(self.block_statements(child)),
                _ => {}
            }
        }

        TryStatement {
            line: line_of(node),
            body: self.block_statements(node),
            catches,
            finally,
        }
    }

    fn catch_clause(&self, node: Node<'_>) -> CatchClause {
        let mut declaration = None;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "catch_declaration" {
                declaration = Some(self.text(child).to_string());
            }
        }

        CatchClause {
            line: line_of(node),
            declaration,
            body: self.block_statements(node),
        }
    }

    /// Statements of the block owned by a try, catch or finally clause
    fn block_statements(&self, node: Node<'_>) -> Vec<Statement> {
        let block = match node.child_by_field_name("body") {
            Some(body) => Some(body),
            None => {
                let mut cursor = node.walk();
                let found = node
                    .named_children(&mut cursor)
                    .find(|child| child.kind() == "block");
                found
            }
        };
        block.map(|b| self.statements(b)).unwrap_or_default()
    }

    fn syntax_errors(&self, node: Node<'_>, violations: &mut Vec<Violation>) {
        if node.is_error() {
            let snippet: String = self
                .text(node)
                .lines()
                .next()
                .unwrap_or("")
                .trim()
                .chars()
                .take(40)
                .collect();
            violations.push(Violation::new(
                SYNTAX_CHECK_ID,
                SYNTAX_RULE_NAME,
                format!("Syntax error near '{}'", snippet),
                line_of(node),
            ));
            return;
        }
        if node.is_missing() {
            violations.push(Violation::new(
                SYNTAX_CHECK_ID,
                SYNTAX_RULE_NAME,
                format!("Missing '{}'", node.kind()),
                line_of(node),
            ));
            return;
        }
        if !node.has_error() {
            return;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.syntax_errors(child, violations);
        }
    }
}
