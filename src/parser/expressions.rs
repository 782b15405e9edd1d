//! Expression parsing implementation
//!
//! One method per precedence level, lowest first. Binary levels are
//! left-associative loops; assignment is right-associative.
//!
//! # Precedence (lowest to highest)
//!
//! | level      | operators                  |
//! |------------|----------------------------|
//! | assignment | `=`                        |
//! | logical or | `\|\|`                     |
//! | logical and| `&&`                       |
//! | equality   | `==` `!=`                  |
//! | relational | `<` `<=` `>` `>=`          |
//! | additive   | `+` `-`                    |
//! | term       | `*` `/`                    |
//! | unary      | `-` `+` `!` `*` `&`        |
//! | postfix    | `a[i]`, `f(args)`          |
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn make_expr(&mut self, kind: ExprKind, location: SourceLocation) -> Expr {
        Expr {
            id: self.node_id(),
            kind,
            location,
        }
    }

    fn make_binary(
        &mut self,
        op: BinOp,
        left: Expr,
        right: Expr,
        location: SourceLocation,
    ) -> Expr {
        self.make_expr(
            ExprKind::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            location,
        )
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_logical_or()?;

        if self.match_token(&TokenKind::Eq) {
            let loc = self.previous_location();
            let value = self.parse_assignment()?;
            return Ok(self.make_expr(
                ExprKind::Assign {
                    target: Box::new(target),
                    value: Box::new(value),
                },
                loc,
            ));
        }

        Ok(target)
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.match_token(&TokenKind::OrOr) {
            let loc = self.previous_location();
            let right = self.parse_logical_and()?;
            left = self.make_binary(BinOp::Or, left, right, loc);
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        while self.match_token(&TokenKind::AndAnd) {
            let loc = self.previous_location();
            let right = self.parse_equality()?;
            left = self.make_binary(BinOp::And, left, right, loc);
        }

        Ok(left)
    }

    /// Parse equality (==, !=)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            let op = if self.match_token(&TokenKind::EqEq) {
                BinOp::Eq
            } else if self.match_token(&TokenKind::NotEq) {
                BinOp::Ne
            } else {
                break;
            };
            let loc = self.previous_location();
            let right = self.parse_relational()?;
            left = self.make_binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse relational (<, <=, >, >=)
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let op = if self.match_token(&TokenKind::Lt) {
                BinOp::Lt
            } else if self.match_token(&TokenKind::Le) {
                BinOp::Le
            } else if self.match_token(&TokenKind::Gt) {
                BinOp::Gt
            } else if self.match_token(&TokenKind::Ge) {
                BinOp::Ge
            } else {
                break;
            };
            let loc = self.previous_location();
            let right = self.parse_additive()?;
            left = self.make_binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse additive (+, -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;

        loop {
            let op = if self.match_token(&TokenKind::Plus) {
                BinOp::Add
            } else if self.match_token(&TokenKind::Minus) {
                BinOp::Sub
            } else {
                break;
            };
            let loc = self.previous_location();
            let right = self.parse_term()?;
            left = self.make_binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse multiplicative (*, /)
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = if self.match_token(&TokenKind::Star) {
                BinOp::Mul
            } else if self.match_token(&TokenKind::Slash) {
                BinOp::Div
            } else {
                break;
            };
            let loc = self.previous_location();
            let right = self.parse_unary()?;
            left = self.make_binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse unary operators: -, +, !, *, &
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        if self.match_token(&TokenKind::Minus) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(self.make_expr(
                ExprKind::UnaryOp {
                    op: UnOp::Neg,
                    operand,
                },
                loc,
            ));
        }

        // Unary plus is the identity
        if self.match_token(&TokenKind::Plus) {
            return self.parse_unary();
        }

        if self.match_token(&TokenKind::Bang) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(self.make_expr(
                ExprKind::UnaryOp {
                    op: UnOp::Not,
                    operand,
                },
                loc,
            ));
        }

        if self.match_token(&TokenKind::Star) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(self.make_expr(ExprKind::Deref(operand), loc));
        }

        if self.match_token(&TokenKind::Amp) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(self.make_expr(ExprKind::AddressOf(operand), loc));
        }

        self.parse_postfix()
    }

    /// Parse postfix indexing: expr[index]...
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.match_token(&TokenKind::LBracket) {
                let loc = self.previous_location();
                let index = Box::new(self.parse_expression()?);
                self.expect_rbracket("after index")?;
                expr = self.make_expr(
                    ExprKind::Index {
                        array: Box::new(expr),
                        index,
                    },
                    loc,
                );
            } else if self.check(&TokenKind::LParen) {
                return Err(ParseError {
                    message: "Only a function name can be called".to_string(),
                    location: self.current_location(),
                });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse primary expressions: literals, identifiers, calls, parentheses
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        match self.peek().kind.clone() {
            TokenKind::IntLiteral(n) => {
                self.advance();
                Ok(self.make_expr(ExprKind::IntLiteral(n), loc))
            }
            TokenKind::True => {
                self.advance();
                Ok(self.make_expr(ExprKind::BoolLiteral(true), loc))
            }
            TokenKind::False => {
                self.advance();
                Ok(self.make_expr(ExprKind::BoolLiteral(false), loc))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.match_token(&TokenKind::LParen) {
                    let args = self.parse_arguments()?;
                    return Ok(self.make_expr(ExprKind::Call { name, args }, loc));
                }
                Ok(self.make_expr(ExprKind::Variable(name), loc))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            _ => Err(self.error_here("Expected expression")),
        }
    }

    /// Parse call arguments after '(' up to and including ')'
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect_rparen("after function arguments")?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::Lexer;
    use crate::parser::parse::{ParseError, Parser};

    fn parse_expr(text: &str) -> Result<Expr, ParseError> {
        let source = format!("void main() {{ {}; }}", text);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        let program = Parser::new(tokens).parse_program()?;
        match &program.functions[0].body[0].kind {
            StmtKind::Expr(e) => Ok(e.clone()),
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    fn binary(expr: &Expr) -> (BinOp, &Expr, &Expr) {
        match &expr.kind {
            ExprKind::BinaryOp { op, left, right } => (*op, left, right),
            other => panic!("Expected binary op, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let expr = parse_expr("1 + 2 * 3").unwrap();
        let (op, left, right) = binary(&expr);
        assert_eq!(op, BinOp::Add);
        assert_eq!(left.kind, ExprKind::IntLiteral(1));
        assert_eq!(binary(right).0, BinOp::Mul);
    }

    #[test]
    fn test_left_associativity() {
        let expr = parse_expr("10 - 4 - 3").unwrap();
        let (op, left, right) = binary(&expr);
        assert_eq!(op, BinOp::Sub);
        assert_eq!(binary(left).0, BinOp::Sub);
        assert_eq!(right.kind, ExprKind::IntLiteral(3));
    }

    #[test]
    fn test_logical_precedence() {
        let expr = parse_expr("a || b && c == d").unwrap();
        let (op, _, right) = binary(&expr);
        assert_eq!(op, BinOp::Or);
        let (op, _, right) = binary(right);
        assert_eq!(op, BinOp::And);
        assert_eq!(binary(right).0, BinOp::Eq);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let expr = parse_expr("x = y = 1").unwrap();
        let ExprKind::Assign { target, value } = &expr.kind else {
            panic!("Expected assignment");
        };
        assert_eq!(target.kind, ExprKind::Variable("x".to_string()));
        assert!(matches!(value.kind, ExprKind::Assign { .. }));
    }

    #[test]
    fn test_unary_and_postfix() {
        // *ipa[n] is *(ipa[n]); (*iap)[n] indexes the dereference
        let expr = parse_expr("*ipa[n]").unwrap();
        let ExprKind::Deref(inner) = &expr.kind else {
            panic!("Expected dereference");
        };
        assert!(matches!(inner.kind, ExprKind::Index { .. }));

        let expr = parse_expr("(*iap)[n]").unwrap();
        let ExprKind::Index { array, .. } = &expr.kind else {
            panic!("Expected index");
        };
        assert!(matches!(array.kind, ExprKind::Deref(_)));
    }

    #[test]
    fn test_unary_plus_is_dropped() {
        assert_eq!(parse_expr("+x").unwrap().kind, ExprKind::Variable("x".to_string()));
    }

    #[test]
    fn test_call_arguments() {
        let expr = parse_expr("f(1, &x, a[2])").unwrap();
        let ExprKind::Call { name, args } = &expr.kind else {
            panic!("Expected call");
        };
        assert_eq!(name, "f");
        assert_eq!(args.len(), 3);
        assert!(matches!(args[1].kind, ExprKind::AddressOf(_)));
    }

    #[test]
    fn test_call_on_non_identifier_is_rejected() {
        assert!(parse_expr("(f)(1)").is_err());
        assert!(parse_expr("a[0](1)").is_err());
    }

    #[test]
    fn test_missing_operand() {
        let err = parse_expr("1 + ").unwrap_err();
        assert!(err.message.contains("Expected expression"));
    }
}
