//! Statement parsing implementation
//!
//! This module handles parsing of all Micro-C statement types:
//!
//! - Compound statements: `{ ... }`, where declarations may appear
//! - Control flow: `if`/`else`, `while`
//! - I/O: `read lvalue;`, `write expr;`
//! - Expression statements: calls and assignments
//!
//! # Grammar
//!
//! ```text
//! block     ::= "{" { vardecl ";" | statement } "}"
//! statement ::= block | ";" | if_stmt | while_stmt
//!             | "read" expr ";" | "write" expr ";" | expr ";"
//! ```
//!
//! Declarations are block items, not statements, so `if (c) int x;` is
//! rejected. All parsing methods are implemented as `pub(crate)` methods on
//! the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse `{ items }` and return the items.
    pub(crate) fn parse_block_statements(
        &mut self,
        ctx: &str,
    ) -> Result<Vec<Stmt>, ParseError> {
        self.expect_token(&TokenKind::LBrace, ctx)?;

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_block_item()?);
        }

        self.expect_token(&TokenKind::RBrace, "after block")?;
        Ok(statements)
    }

    /// Parse one block item: a local declaration or a statement
    fn parse_block_item(&mut self) -> Result<Stmt, ParseError> {
        if self.is_type_keyword() {
            let loc = self.current_location();
            let decl = self.parse_var_decl()?;
            self.expect_semicolon("after declaration")?;
            return Ok(Stmt {
                kind: StmtKind::VarDecl(decl),
                location: loc,
            });
        }
        self.parse_statement()
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        if self.check(&TokenKind::LBrace) {
            let statements = self.parse_block_statements("to open block")?;
            return Ok(Stmt {
                kind: StmtKind::Block(statements),
                location: loc,
            });
        }

        // Empty statement
        if self.match_token(&TokenKind::Semicolon) {
            return Ok(Stmt {
                kind: StmtKind::Block(Vec::new()),
                location: loc,
            });
        }

        if self.match_token(&TokenKind::If) {
            return self.parse_if_statement(loc);
        }

        if self.match_token(&TokenKind::While) {
            return self.parse_while_statement(loc);
        }

        if self.match_token(&TokenKind::Read) {
            let target = self.parse_expression()?;
            self.expect_semicolon("after 'read' target")?;
            return Ok(Stmt {
                kind: StmtKind::Read(target),
                location: loc,
            });
        }

        if self.match_token(&TokenKind::Write) {
            let value = self.parse_expression()?;
            self.expect_semicolon("after 'write' operand")?;
            return Ok(Stmt {
                kind: StmtKind::Write(value),
                location: loc,
            });
        }

        if self.is_type_keyword() || self.check(&TokenKind::Void) {
            return Err(self.error_here("Expected statement (declarations must appear directly in a block)"));
        }

        // Expression statement
        let expr = self.parse_expression()?;
        self.expect_semicolon("after expression")?;
        Ok(Stmt {
            kind: StmtKind::Expr(expr),
            location: loc,
        })
    }

    /// Parse if statement: if (condition) statement [else statement]
    fn parse_if_statement(&mut self, loc: SourceLocation) -> Result<Stmt, ParseError> {
        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt {
            kind: StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            location: loc,
        })
    }

    /// Parse while statement: while (condition) statement
    fn parse_while_statement(&mut self, loc: SourceLocation) -> Result<Stmt, ParseError> {
        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after while condition")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt {
            kind: StmtKind::While { condition, body },
            location: loc,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::Lexer;
    use crate::parser::parse::{ParseError, Parser};

    fn parse_body(body: &str) -> Result<Vec<Stmt>, ParseError> {
        let source = format!("void main() {{ {} }}", body);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        let program = Parser::new(tokens).parse_program()?;
        Ok(program.functions[0].body.clone())
    }

    #[test]
    fn test_dangling_else_binds_to_nearest_if() {
        let body = parse_body("if (a) if (b) write 1; else write 2;").unwrap();

        let StmtKind::If {
            then_branch,
            else_branch,
            ..
        } = &body[0].kind
        else {
            panic!("Expected if statement");
        };
        assert!(else_branch.is_none());
        assert!(matches!(
            &then_branch.kind,
            StmtKind::If {
                else_branch: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_empty_statement_is_empty_block() {
        let body = parse_body("while (b) ;").unwrap();
        let StmtKind::While { body: inner, .. } = &body[0].kind else {
            panic!("Expected while statement");
        };
        assert_eq!(inner.kind, StmtKind::Block(Vec::new()));
    }

    #[test]
    fn test_declarations_mixed_with_statements() {
        let body = parse_body("int x; x = 1; { bool b; read b; } int y;").unwrap();
        assert!(matches!(body[0].kind, StmtKind::VarDecl(_)));
        assert!(matches!(body[1].kind, StmtKind::Expr(_)));
        assert!(matches!(body[2].kind, StmtKind::Block(ref items) if items.len() == 2));
        assert!(matches!(body[3].kind, StmtKind::VarDecl(_)));
    }

    #[test]
    fn test_declaration_as_branch_is_rejected() {
        let err = parse_body("if (c) int x;").unwrap_err();
        assert!(err.message.contains("declarations"));
    }

    #[test]
    fn test_unclosed_block() {
        let tokens = Lexer::new("void main() { write 1;").tokenize().unwrap();
        let err = Parser::new(tokens).parse_program().unwrap_err();
        assert!(err.message.contains("end of file"));
    }
}
