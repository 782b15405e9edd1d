//! Declaration parsing implementation
//!
//! This module handles parsing of top-level declarations in Micro-C programs:
//!
//! - Function definitions: `void name(params) { ... }`
//! - Variable declarations, global or local: `int *(*ipap)[4]`
//! - Function parameters
//!
//! # Grammar
//!
//! ```text
//! program    ::= { "void" funcdef | vardecl ";" }
//! funcdef    ::= identifier "(" [ "void" | vardecl { "," vardecl } ] ")" block
//! vardecl    ::= ("int" | "bool") declarator
//! declarator ::= ( identifier | "*" declarator | "(" declarator ")" ) { "[" [int] "]" }
//! ```
//!
//! Declarators compose inside-out the way C's do, so `int *ipa[4]` is an
//! array of pointers and `int (*iap)[3]` is a pointer to an array.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

/// Declarator syntax tree, before it is folded onto the base type.
#[derive(Debug)]
enum Declarator {
    Name(String, SourceLocation),
    Pointer(Box<Declarator>),
    Array(Box<Declarator>, Option<usize>),
}

impl Declarator {
    /// Fold the declarator onto `base`, producing the declared name and type.
    fn apply(self, base: Type) -> (String, SourceLocation, Type) {
        match self {
            Declarator::Name(name, loc) => (name, loc, base),
            Declarator::Pointer(inner) => inner.apply(base.pointer_to()),
            Declarator::Array(inner, size) => inner.apply(base.array_of(size)),
        }
    }
}

impl Parser {
    /// Parse a top-level declaration (function definition or global variable)
    pub(crate) fn parse_top_level_declaration(
        &mut self,
        program: &mut Program,
    ) -> Result<(), ParseError> {
        if self.match_token(&TokenKind::Void) {
            let function = self.parse_function_definition()?;
            program.functions.push(function);
            return Ok(());
        }

        if self.is_type_keyword() {
            let decl = self.parse_var_decl()?;
            self.expect_semicolon("after global declaration")?;
            program.globals.push(decl);
            return Ok(());
        }

        Err(self.error_here("Expected 'void', 'int' or 'bool' at top level"))
    }

    /// Parse function definition after `void`: name(params) { body }
    pub(crate) fn parse_function_definition(&mut self) -> Result<FuncDecl, ParseError> {
        let loc = self.current_location();
        let name = self.expect_identifier()?;

        self.expect_lparen("after function name")?;
        let params = self.parse_parameter_list()?;
        self.expect_rparen("after parameters")?;

        let body = self.parse_block_statements("before function body")?;

        Ok(FuncDecl {
            name,
            params,
            body,
            location: loc,
        })
    }

    /// Parse parameter list: (type declarator, type declarator, ...)
    pub(crate) fn parse_parameter_list(&mut self) -> Result<Vec<VarDecl>, ParseError> {
        let mut params = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(params);
        }

        // (void) means no parameters
        if self.check(&TokenKind::Void)
            && matches!(self.peek_ahead(1).map(|t| &t.kind), Some(TokenKind::RParen))
        {
            self.advance();
            return Ok(params);
        }

        loop {
            params.push(self.parse_var_decl()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse a variable declaration: ("int" | "bool") declarator
    pub(crate) fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let base = if self.match_token(&TokenKind::Int) {
            Type::Int
        } else if self.match_token(&TokenKind::Bool) {
            Type::Bool
        } else {
            return Err(self.error_here("Expected type 'int' or 'bool'"));
        };

        let (name, location, var_type) = self.parse_declarator()?.apply(base);

        Ok(VarDecl {
            id: self.node_id(),
            name,
            var_type,
            location,
        })
    }

    fn parse_declarator(&mut self) -> Result<Declarator, ParseError> {
        let mut declarator = if self.match_token(&TokenKind::Star) {
            // The pointer binds looser than any suffix that follows the
            // inner declarator, so return without reading suffixes here.
            return Ok(Declarator::Pointer(Box::new(self.parse_declarator()?)));
        } else if self.match_token(&TokenKind::LParen) {
            let inner = self.parse_declarator()?;
            self.expect_rparen("in declarator")?;
            inner
        } else {
            let loc = self.current_location();
            let name = self.expect_identifier()?;
            Declarator::Name(name, loc)
        };

        while self.match_token(&TokenKind::LBracket) {
            let size = if let TokenKind::IntLiteral(n) = self.peek().kind {
                self.advance();
                Some(n as usize)
            } else {
                None
            };
            self.expect_rbracket("after array size")?;
            declarator = Declarator::Array(Box::new(declarator), size);
        }

        Ok(declarator)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::Lexer;
    use crate::parser::parse::Parser;

    fn global_type(source: &str) -> Type {
        let tokens = Lexer::new(source).tokenize().unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        program.globals[0].var_type.clone()
    }

    #[test]
    fn test_scalar_and_pointer() {
        assert_eq!(global_type("int x;"), Type::Int);
        assert_eq!(global_type("bool **p;"), Type::Bool.pointer_to().pointer_to());
    }

    #[test]
    fn test_array_of_pointers() {
        assert_eq!(
            global_type("int *ipa[4];"),
            Type::Int.pointer_to().array_of(Some(4))
        );
    }

    #[test]
    fn test_pointer_to_array() {
        assert_eq!(
            global_type("int (*iap)[3];"),
            Type::Int.array_of(Some(3)).pointer_to()
        );
    }

    #[test]
    fn test_pointer_to_array_of_pointers() {
        assert_eq!(
            global_type("int *(*ipap)[4];"),
            Type::Int.pointer_to().array_of(Some(4)).pointer_to()
        );
    }

    #[test]
    fn test_multi_dimensional_array() {
        assert_eq!(
            global_type("int m[2][3];"),
            Type::Int.array_of(Some(3)).array_of(Some(2))
        );
    }

    #[test]
    fn test_parameters() {
        let source = "void f(int ns[], bool *b, int n) { } void g(void) { }";
        let tokens = Lexer::new(source).tokenize().unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();

        let f = &program.functions[0];
        assert_eq!(f.params.len(), 3);
        assert_eq!(f.params[0].var_type, Type::Int.array_of(None));
        assert_eq!(f.params[1].var_type, Type::Bool.pointer_to());
        assert!(program.functions[1].params.is_empty());
    }

    #[test]
    fn test_declaration_location_is_the_name() {
        let tokens = Lexer::new("int\n  *(*p)[2];").tokenize().unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        assert_eq!(program.globals[0].location, SourceLocation::new(2, 6));
    }
}
