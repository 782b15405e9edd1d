//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: function definitions, variable declarations, declarators
//! - `statements`: blocks, `if`, `while`, `read`, `write`
//! - `expressions`: expressions with one method per precedence level
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "parse error at line {}, column {}: {message}",
    .location.line,
    .location.column
)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

/// Recursive descent parser for Micro-C
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    next_id: NodeId,
}

impl Parser {
    /// Create a parser over a token stream. A missing trailing `Eof` is
    /// supplied.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let location = tokens.last().map(|t| t.location).unwrap_or_default();
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                location,
            });
        }
        Self {
            tokens,
            position: 0,
            next_id: 0,
        }
    }

    /// Parse the entire program (top-level declarations)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            self.parse_top_level_declaration(&mut program)?;
        }

        Ok(program)
    }

    // ===== Helper methods =====

    /// Allocate a fresh node id.
    pub(crate) fn node_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn is_type_keyword(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Int | TokenKind::Bool)
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    /// An error at the current token: `<message>, found <token>`.
    pub(crate) fn error_here(&self, message: &str) -> ParseError {
        ParseError {
            message: format!("{}, found {}", message, self.peek()),
            location: self.current_location(),
        }
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: &TokenKind,
        ctx: &str,
    ) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(&format!("Expected {} {}", kind, ctx)))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::LParen, ctx)
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::RParen, ctx)
    }

    pub(crate) fn expect_rbracket(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::RBracket, ctx)
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::Semicolon, ctx)
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error_here("Expected identifier"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn parse(source: &str) -> Result<Program, ParseError> {
        let tokens = Lexer::new(source).tokenize().unwrap();
        Parser::new(tokens).parse_program()
    }

    #[test]
    fn test_parse_simple_function() {
        let program = parse("void main() { write 0; }").unwrap();

        assert_eq!(program.functions.len(), 1);
        let main = &program.functions[0];
        assert_eq!(main.name, "main");
        assert!(main.params.is_empty());
        assert_eq!(main.body.len(), 1);
        assert!(matches!(main.body[0].kind, StmtKind::Write(_)));
    }

    #[test]
    fn test_parse_globals_and_functions_in_order() {
        let program =
            parse("int n; void f(int x) { } bool b; void main(void) { f(n); }").unwrap();

        let globals: Vec<_> = program.globals.iter().map(|g| g.name.as_str()).collect();
        let functions: Vec<_> = program.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(globals, ["n", "b"]);
        assert_eq!(functions, ["f", "main"]);
    }

    #[test]
    fn test_node_ids_are_unique() {
        let program = parse("void main() { int x; x = x + 1; write x; }").unwrap();
        let main = &program.functions[0];

        let mut ids = Vec::new();
        fn collect(expr: &Expr, ids: &mut Vec<NodeId>) {
            ids.push(expr.id);
            match &expr.kind {
                ExprKind::BinaryOp { left, right, .. } => {
                    collect(left, ids);
                    collect(right, ids);
                }
                ExprKind::Assign { target, value } => {
                    collect(target, ids);
                    collect(value, ids);
                }
                _ => {}
            }
        }
        for stmt in &main.body {
            match &stmt.kind {
                StmtKind::VarDecl(decl) => ids.push(decl.id),
                StmtKind::Expr(e) | StmtKind::Write(e) => collect(e, &mut ids),
                _ => {}
            }
        }

        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_error_reports_expected_and_found() {
        let err = parse("void main() { write 1 }").unwrap_err();
        assert!(err.message.contains("Expected ';'"));
        assert!(err.message.contains("found '}'"));
        assert_eq!(err.location, SourceLocation::new(1, 23));
    }

    #[test]
    fn test_top_level_statement_is_rejected() {
        assert!(parse("write 1;").is_err());
        assert!(parse("int main() { }").is_err());
    }
}
