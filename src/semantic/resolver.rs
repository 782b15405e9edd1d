//! Two-pass name resolution
//!
//! Pass 1 registers every global variable and every function signature, so
//! functions may call each other regardless of order. Pass 2 walks each body
//! with a [`ScopeChain`], binding every declaration to a fresh symbol and
//! every variable reference to the nearest visible declaration.

use super::errors::{NameError, NameErrorKind};
use super::scope::ScopeChain;
use super::symbols::{FunctionInfo, Resolution, Storage, Symbol, SymbolId};
use crate::parser::ast::*;

/// Resolve every name in `program`.
pub fn resolve(program: &Program) -> Result<Resolution, NameError> {
    let mut resolver = Resolver::default();
    resolver.register_globals(program)?;
    resolver.register_functions(program)?;
    resolver.check_main(program)?;
    for function in &program.functions {
        resolver.resolve_function(function)?;
    }
    Ok(resolver.resolution)
}

#[derive(Default)]
struct Resolver {
    resolution: Resolution,
    scopes: ScopeChain,
    /// Next free slot in the function being resolved
    next_slot: usize,
}

impl Resolver {
    fn new_symbol(&mut self, decl: &VarDecl, ty: Type, storage: Storage) -> SymbolId {
        let id = self.resolution.symbols.len();
        self.resolution.symbols.push(Symbol {
            name: decl.name.clone(),
            ty,
            storage,
            location: decl.location,
        });
        self.resolution.decls.insert(decl.id, id);
        id
    }

    fn declare(&mut self, decl: &VarDecl, symbol: SymbolId) -> Result<(), NameError> {
        self.scopes.declare(&decl.name, symbol).map_err(|previous| NameError {
            kind: NameErrorKind::Redeclared {
                name: decl.name.clone(),
                previous: self.resolution.symbols[previous].location,
            },
            location: decl.location,
        })
    }

    // ===== Pass 1 =====

    fn register_globals(&mut self, program: &Program) -> Result<(), NameError> {
        for (index, global) in program.globals.iter().enumerate() {
            let symbol = self.new_symbol(global, global.var_type.clone(), Storage::Global(index));
            self.declare(global, symbol)?;
            self.resolution.globals.push(symbol);
        }
        Ok(())
    }

    fn register_functions(&mut self, program: &Program) -> Result<(), NameError> {
        for (index, function) in program.functions.iter().enumerate() {
            if let Some(previous) = self.resolution.functions.get(&function.name) {
                return Err(NameError {
                    kind: NameErrorKind::Redeclared {
                        name: function.name.clone(),
                        previous: previous.location,
                    },
                    location: function.location,
                });
            }
            self.resolution.functions.insert(
                function.name.clone(),
                FunctionInfo {
                    index,
                    params: Vec::new(),
                    slot_count: 0,
                    location: function.location,
                },
            );
        }

        // Parameter symbols are part of the signature, so calls can be
        // checked before the callee's body has been visited.
        for function in &program.functions {
            let mut params = Vec::with_capacity(function.params.len());
            for (slot, param) in function.params.iter().enumerate() {
                let ty = match &param.var_type {
                    Type::Array(element, _) => Type::Pointer(element.clone()),
                    other => other.clone(),
                };
                params.push(self.new_symbol(param, ty, Storage::Parameter(slot)));
            }
            if let Some(info) = self.resolution.functions.get_mut(&function.name) {
                info.params = params;
            }
        }
        Ok(())
    }

    fn check_main(&self, program: &Program) -> Result<(), NameError> {
        match program.function("main") {
            None => Err(NameError {
                kind: NameErrorKind::MissingMain,
                location: SourceLocation::new(1, 1),
            }),
            Some(main) if !main.params.is_empty() => Err(NameError {
                kind: NameErrorKind::MainHasParameters,
                location: main.location,
            }),
            Some(_) => Ok(()),
        }
    }

    // ===== Pass 2 =====

    fn resolve_function(&mut self, function: &FuncDecl) -> Result<(), NameError> {
        self.next_slot = function.params.len();

        self.scopes.push_scope();
        for param in &function.params {
            let symbol = self.resolution.decls.get(&param.id).copied();
            if let Some(symbol) = symbol {
                self.declare(param, symbol)?;
            }
        }

        self.scopes.push_scope();
        let result = self.resolve_statements(&function.body);
        self.scopes.pop_scope();
        self.scopes.pop_scope();
        result?;

        if let Some(info) = self.resolution.functions.get_mut(&function.name) {
            info.slot_count = self.next_slot;
        }
        Ok(())
    }

    fn resolve_statements(&mut self, stmts: &[Stmt]) -> Result<(), NameError> {
        for stmt in stmts {
            self.resolve_statement(stmt)?;
        }
        Ok(())
    }

    fn resolve_statement(&mut self, stmt: &Stmt) -> Result<(), NameError> {
        match &stmt.kind {
            StmtKind::VarDecl(decl) => {
                let slot = self.next_slot;
                self.next_slot += 1;
                let symbol = self.new_symbol(decl, decl.var_type.clone(), Storage::Local(slot));
                self.declare(decl, symbol)
            }
            StmtKind::Block(items) => {
                self.scopes.push_scope();
                let result = self.resolve_statements(items);
                self.scopes.pop_scope();
                result
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expression(condition)?;
                self.resolve_statement(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.resolve_statement(else_branch)?;
                }
                Ok(())
            }
            StmtKind::While { condition, body } => {
                self.resolve_expression(condition)?;
                self.resolve_statement(body)
            }
            StmtKind::Expr(expr) | StmtKind::Read(expr) | StmtKind::Write(expr) => {
                self.resolve_expression(expr)
            }
        }
    }

    fn resolve_expression(&mut self, expr: &Expr) -> Result<(), NameError> {
        match &expr.kind {
            ExprKind::IntLiteral(_) | ExprKind::BoolLiteral(_) => Ok(()),
            ExprKind::Variable(name) => {
                let symbol = self.scopes.lookup(name).ok_or_else(|| NameError {
                    kind: NameErrorKind::UndeclaredVariable(name.clone()),
                    location: expr.location,
                })?;
                self.resolution.uses.insert(expr.id, symbol);
                Ok(())
            }
            ExprKind::UnaryOp { operand, .. }
            | ExprKind::AddressOf(operand)
            | ExprKind::Deref(operand) => self.resolve_expression(operand),
            ExprKind::BinaryOp { left, right, .. } => {
                self.resolve_expression(left)?;
                self.resolve_expression(right)
            }
            ExprKind::Index { array, index } => {
                self.resolve_expression(array)?;
                self.resolve_expression(index)
            }
            ExprKind::Assign { target, value } => {
                self.resolve_expression(target)?;
                self.resolve_expression(value)
            }
            ExprKind::Call { name, args } => {
                let info = self.resolution.functions.get(name).ok_or_else(|| NameError {
                    kind: NameErrorKind::UndeclaredFunction(name.clone()),
                    location: expr.location,
                })?;
                if info.params.len() != args.len() {
                    return Err(NameError {
                        kind: NameErrorKind::ArityMismatch {
                            function: name.clone(),
                            expected: info.params.len(),
                            found: args.len(),
                        },
                        location: expr.location,
                    });
                }
                for arg in args {
                    self.resolve_expression(arg)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;
    use crate::parser::parse::Parser;

    fn parse(source: &str) -> Program {
        let tokens = Lexer::new(source).tokenize().unwrap();
        Parser::new(tokens).parse_program().unwrap()
    }

    fn resolve_source(source: &str) -> Result<(Program, Resolution), NameError> {
        let program = parse(source);
        let resolution = resolve(&program)?;
        Ok((program, resolution))
    }

    /// Symbols of every `write x;` statement in main, in order.
    fn written_symbols<'a>(program: &Program, resolution: &'a Resolution) -> Vec<&'a Symbol> {
        fn walk<'a>(stmts: &[Stmt], resolution: &'a Resolution, out: &mut Vec<&'a Symbol>) {
            for stmt in stmts {
                match &stmt.kind {
                    StmtKind::Write(e) => out.extend(resolution.use_of(e.id)),
                    StmtKind::Block(items) => walk(items, resolution, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&program.function("main").unwrap().body, resolution, &mut out);
        out
    }

    #[test]
    fn test_nearest_declaration_wins() {
        let (program, resolution) = resolve_source(
            "int x; void main() { write x; int x; write x; { write x; bool x; write x; } write x; }",
        )
        .unwrap();

        let storages: Vec<Storage> = written_symbols(&program, &resolution)
            .iter()
            .map(|s| s.storage)
            .collect();
        assert_eq!(
            storages,
            [
                Storage::Global(0),
                Storage::Local(0),
                Storage::Local(0),
                Storage::Local(1),
                Storage::Local(0),
            ]
        );
    }

    #[test]
    fn test_slots_are_unique_per_function() {
        let (_, resolution) = resolve_source(
            "void f(int a, int b) { int c; { int d; } { int e; } } void main() { int m; }",
        )
        .unwrap();

        let f = resolution.function("f").unwrap();
        assert_eq!(f.slot_count, 5);
        assert_eq!(resolution.function("main").unwrap().slot_count, 1);
    }

    #[test]
    fn test_mutual_recursion_resolves() {
        assert!(resolve_source(
            "void a(int n) { if (n > 0) b(n - 1); } void b(int n) { a(n); } void main() { a(3); }"
        )
        .is_ok());
    }

    #[test]
    fn test_array_parameter_is_adjusted_to_pointer() {
        let (_, resolution) = resolve_source("void f(int ns[]) { } void main() { }").unwrap();
        assert_eq!(resolution.param_types("f"), [Type::Int.pointer_to()]);
    }

    #[test]
    fn test_functions_and_variables_have_separate_namespaces() {
        assert!(resolve_source("int f; void f() { } void main() { f(); f = 1; }").is_ok());
    }

    #[test]
    fn test_undeclared_variable() {
        let err = resolve_source("void main() { { int y; } y = 1; }").unwrap_err();
        assert_eq!(err.kind, NameErrorKind::UndeclaredVariable("y".to_string()));
        assert_eq!(err.location, SourceLocation::new(1, 26));
    }

    #[test]
    fn test_undeclared_function() {
        let err = resolve_source("void main() { g(); }").unwrap_err();
        assert_eq!(err.kind, NameErrorKind::UndeclaredFunction("g".to_string()));
    }

    #[test]
    fn test_redeclaration() {
        let err = resolve_source("void main() { int x; bool x; }").unwrap_err();
        assert!(matches!(err.kind, NameErrorKind::Redeclared { ref name, .. } if name == "x"));

        let err = resolve_source("void f(int a, int a) { } void main() { }").unwrap_err();
        assert!(matches!(err.kind, NameErrorKind::Redeclared { .. }));

        let err = resolve_source("void main() { } void main() { }").unwrap_err();
        assert!(matches!(err.kind, NameErrorKind::Redeclared { .. }));
    }

    #[test]
    fn test_parameter_shadowed_by_body_local() {
        // The body block is a child scope of the parameter scope
        assert!(resolve_source("void f(int a) { int a; } void main() { }").is_ok());
    }

    #[test]
    fn test_arity_mismatch() {
        let err = resolve_source("void f(int a, int b) { } void main() { f(1); }").unwrap_err();
        assert_eq!(
            err.kind,
            NameErrorKind::ArityMismatch {
                function: "f".to_string(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_main_checks() {
        let err = resolve_source("void f() { }").unwrap_err();
        assert_eq!(err.kind, NameErrorKind::MissingMain);

        let err = resolve_source("void main(int argc) { }").unwrap_err();
        assert_eq!(err.kind, NameErrorKind::MainHasParameters);
    }
}
