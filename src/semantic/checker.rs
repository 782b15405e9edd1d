//! Static type checking
//!
//! Assigns exactly one [`Type`] to every expression node and rejects
//! ill-typed programs. Arrays decay to pointers wherever a value is needed;
//! the recorded type is the undecayed one, so the evaluator can tell an
//! array lvalue from a pointer.

use super::errors::{TypeError, TypeErrorKind};
use super::symbols::Resolution;
use crate::parser::ast::*;
use rustc_hash::FxHashMap;

/// Expression node → type.
pub type ExprTypes = FxHashMap<NodeId, Type>;

/// Largest object, in cells, a declaration may allocate.
pub const MAX_OBJECT_CELLS: usize = 1 << 24;

/// Type-check `program` using the bindings from name resolution.
pub fn check(program: &Program, resolution: &Resolution) -> Result<ExprTypes, TypeError> {
    let mut checker = Checker {
        resolution,
        types: ExprTypes::default(),
    };

    for global in &program.globals {
        checker.check_declaration(global, false)?;
    }
    for function in &program.functions {
        for param in &function.params {
            checker.check_declaration(param, true)?;
        }
        checker.check_statements(&function.body)?;
    }

    Ok(checker.types)
}

/// Whether a value of type `found` may be stored where `expected` lives.
pub fn assignable(expected: &Type, found: &Type) -> bool {
    found == expected || found.decay() == *expected
}

struct Checker<'a> {
    resolution: &'a Resolution,
    types: ExprTypes,
}

fn error(kind: TypeErrorKind, location: SourceLocation) -> TypeError {
    TypeError { kind, location }
}

impl Checker<'_> {
    /// Arrays need a positive size, except the outermost dimension of a
    /// parameter, and may hold at most `MAX_OBJECT_CELLS` cells.
    fn check_declaration(&self, decl: &VarDecl, is_param: bool) -> Result<(), TypeError> {
        let mut ty = &decl.var_type;
        let mut outermost = true;
        loop {
            match ty {
                Type::Array(element, size) => {
                    let sized = matches!(size, Some(n) if *n > 0);
                    if !sized && !(is_param && outermost && size.is_none()) {
                        return Err(error(
                            TypeErrorKind::UnsizedArray(decl.name.clone()),
                            decl.location,
                        ));
                    }
                    if ty.cell_count() > MAX_OBJECT_CELLS {
                        return Err(error(
                            TypeErrorKind::ArrayTooLarge {
                                name: decl.name.clone(),
                                limit: MAX_OBJECT_CELLS,
                            },
                            decl.location,
                        ));
                    }
                    ty = element;
                }
                Type::Pointer(inner) => ty = inner,
                _ => return Ok(()),
            }
            outermost = false;
        }
    }

    fn check_statements(&mut self, stmts: &[Stmt]) -> Result<(), TypeError> {
        for stmt in stmts {
            self.check_statement(stmt)?;
        }
        Ok(())
    }

    fn check_statement(&mut self, stmt: &Stmt) -> Result<(), TypeError> {
        match &stmt.kind {
            StmtKind::VarDecl(decl) => self.check_declaration(decl, false),
            StmtKind::Expr(expr) => self.check_expr(expr).map(|_| ()),
            StmtKind::Block(items) => self.check_statements(items),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_condition(condition)?;
                self.check_statement(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.check_statement(else_branch)?;
                }
                Ok(())
            }
            StmtKind::While { condition, body } => {
                self.check_condition(condition)?;
                self.check_statement(body)
            }
            StmtKind::Read(target) => {
                let ty = self.check_value(target)?;
                if !target.is_lvalue() {
                    return Err(error(TypeErrorKind::NotAssignable, target.location));
                }
                if !matches!(ty, Type::Int | Type::Bool) {
                    return Err(error(TypeErrorKind::InvalidReadTarget(ty), target.location));
                }
                Ok(())
            }
            StmtKind::Write(value) => {
                let ty = self.check_value(value)?.decay();
                if !matches!(ty, Type::Int | Type::Bool | Type::Pointer(_)) {
                    return Err(error(TypeErrorKind::InvalidWrite(ty), value.location));
                }
                Ok(())
            }
        }
    }

    fn check_condition(&mut self, condition: &Expr) -> Result<(), TypeError> {
        let ty = self.check_value(condition)?;
        if ty != Type::Bool {
            return Err(error(
                TypeErrorKind::Mismatch {
                    context: "condition".to_string(),
                    expected: Type::Bool,
                    found: ty,
                },
                condition.location,
            ));
        }
        Ok(())
    }

    /// Check an expression whose value is used; calls produce no value.
    fn check_value(&mut self, expr: &Expr) -> Result<Type, TypeError> {
        let ty = self.check_expr(expr)?;
        if ty == Type::Void {
            let name = match &expr.kind {
                ExprKind::Call { name, .. } => name.clone(),
                _ => String::new(),
            };
            return Err(error(TypeErrorKind::VoidValue(name), expr.location));
        }
        Ok(ty)
    }

    /// Check an operand that must have exactly type `expected`.
    fn expect_operand(
        &mut self,
        expr: &Expr,
        expected: Type,
        context: &str,
    ) -> Result<(), TypeError> {
        let found = self.check_value(expr)?;
        if found != expected {
            return Err(error(
                TypeErrorKind::Mismatch {
                    context: context.to_string(),
                    expected,
                    found,
                },
                expr.location,
            ));
        }
        Ok(())
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<Type, TypeError> {
        let ty = self.infer(expr)?;
        self.types.insert(expr.id, ty.clone());
        Ok(ty)
    }

    fn infer(&mut self, expr: &Expr) -> Result<Type, TypeError> {
        let loc = expr.location;
        match &expr.kind {
            ExprKind::IntLiteral(_) => Ok(Type::Int),
            ExprKind::BoolLiteral(_) => Ok(Type::Bool),
            ExprKind::Variable(name) => self
                .resolution
                .use_of(expr.id)
                .map(|symbol| symbol.ty.clone())
                .ok_or_else(|| error(TypeErrorKind::Unresolved(name.clone()), loc)),
            ExprKind::UnaryOp { op, operand } => match op {
                UnOp::Neg => {
                    self.expect_operand(operand, Type::Int, "operand of '-'")?;
                    Ok(Type::Int)
                }
                UnOp::Not => {
                    self.expect_operand(operand, Type::Bool, "operand of '!'")?;
                    Ok(Type::Bool)
                }
            },
            ExprKind::BinaryOp { op, left, right } => self.infer_binary(*op, left, right, loc),
            ExprKind::AddressOf(operand) => {
                let ty = self.check_value(operand)?;
                if !operand.is_lvalue() {
                    return Err(error(TypeErrorKind::NotAddressable, loc));
                }
                Ok(ty.pointer_to())
            }
            ExprKind::Deref(operand) => {
                let ty = self.check_value(operand)?;
                match ty.decay() {
                    Type::Pointer(pointee) => Ok(*pointee),
                    _ => Err(error(TypeErrorKind::NotPointer(ty), loc)),
                }
            }
            ExprKind::Index { array, index } => {
                let ty = self.check_value(array)?;
                self.expect_operand(index, Type::Int, "array index")?;
                match ty.decay() {
                    Type::Pointer(element) => Ok(*element),
                    _ => Err(error(TypeErrorKind::NotIndexable(ty), array.location)),
                }
            }
            ExprKind::Assign { target, value } => {
                let target_ty = self.check_value(target)?;
                if !target.is_lvalue() {
                    return Err(error(TypeErrorKind::NotAssignable, target.location));
                }
                if target_ty.is_array() {
                    return Err(error(TypeErrorKind::ArrayAssignment(target_ty), target.location));
                }
                let value_ty = self.check_value(value)?;
                if !assignable(&target_ty, &value_ty) {
                    return Err(error(
                        TypeErrorKind::Mismatch {
                            context: "assignment".to_string(),
                            expected: target_ty,
                            found: value_ty,
                        },
                        loc,
                    ));
                }
                Ok(target_ty)
            }
            ExprKind::Call { name, args } => {
                let params = self.resolution.param_types(name);
                for (i, (arg, expected)) in args.iter().zip(params).enumerate() {
                    let found = self.check_value(arg)?;
                    if !assignable(&expected, &found) {
                        return Err(error(
                            TypeErrorKind::ArgumentMismatch {
                                function: name.clone(),
                                index: i + 1,
                                expected,
                                found,
                            },
                            arg.location,
                        ));
                    }
                }
                Ok(Type::Void)
            }
        }
    }

    fn infer_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        loc: SourceLocation,
    ) -> Result<Type, TypeError> {
        let left_ty = self.check_value(left)?;
        let right_ty = self.check_value(right)?;
        let incompatible = || {
            error(
                TypeErrorKind::IncompatibleOperands {
                    op: op.symbol(),
                    left: left_ty.clone(),
                    right: right_ty.clone(),
                },
                loc,
            )
        };

        match op {
            BinOp::Add | BinOp::Sub => match (left_ty.decay(), right_ty.decay()) {
                (Type::Int, Type::Int) => Ok(Type::Int),
                (pointer @ Type::Pointer(_), Type::Int) => Ok(pointer),
                (Type::Int, pointer @ Type::Pointer(_)) if op == BinOp::Add => Ok(pointer),
                _ => Err(incompatible()),
            },
            BinOp::Mul | BinOp::Div => {
                if left_ty == Type::Int && right_ty == Type::Int {
                    Ok(Type::Int)
                } else {
                    Err(incompatible())
                }
            }
            BinOp::Eq | BinOp::Ne => {
                if left_ty.decay() == right_ty.decay() {
                    Ok(Type::Bool)
                } else {
                    Err(incompatible())
                }
            }
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                if left_ty == right_ty && matches!(left_ty, Type::Int | Type::Bool) {
                    Ok(Type::Bool)
                } else {
                    Err(incompatible())
                }
            }
            BinOp::And | BinOp::Or => {
                if left_ty == Type::Bool && right_ty == Type::Bool {
                    Ok(Type::Bool)
                } else {
                    Err(incompatible())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;
    use crate::parser::parse::Parser;
    use crate::semantic::resolver::resolve;

    fn check_source(source: &str) -> Result<(Program, ExprTypes), TypeError> {
        let tokens = Lexer::new(source).tokenize().unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        let resolution = resolve(&program).unwrap();
        let types = check(&program, &resolution)?;
        Ok((program, types))
    }

    fn check_main(body: &str) -> Result<(Program, ExprTypes), TypeError> {
        check_source(&format!("void main() {{ {} }}", body))
    }

    fn err_kind(body: &str) -> TypeErrorKind {
        check_main(body).unwrap_err().kind
    }

    /// Type of the expression in the last `write` of main.
    fn written_type(body: &str) -> Type {
        let (program, types) = check_main(body).unwrap();
        let main = program.function("main").unwrap();
        let expr = main
            .body
            .iter()
            .rev()
            .find_map(|s| match &s.kind {
                StmtKind::Write(e) => Some(e),
                _ => None,
            })
            .unwrap();
        types[&expr.id].clone()
    }

    #[test]
    fn test_every_expression_gets_a_type() {
        let (program, types) =
            check_main("int x; int a[3]; x = a[1] + 2 * -x; write x == 3 && !false;").unwrap();
        let main = program.function("main").unwrap();

        fn count(expr: &Expr) -> usize {
            1 + match &expr.kind {
                ExprKind::UnaryOp { operand, .. }
                | ExprKind::AddressOf(operand)
                | ExprKind::Deref(operand) => count(operand),
                ExprKind::BinaryOp { left, right, .. } => count(left) + count(right),
                ExprKind::Index { array, index } => count(array) + count(index),
                ExprKind::Assign { target, value } => count(target) + count(value),
                ExprKind::Call { args, .. } => args.iter().map(count).sum(),
                _ => 0,
            }
        }
        let total: usize = main
            .body
            .iter()
            .map(|s| match &s.kind {
                StmtKind::Expr(e) | StmtKind::Write(e) => count(e),
                _ => 0,
            })
            .sum();
        assert_eq!(types.len(), total);
    }

    #[test]
    fn test_pointer_types() {
        assert_eq!(written_type("int *ipa[4]; write ipa[1];"), Type::Int.pointer_to());
        assert_eq!(written_type("int *ipa[4]; write *ipa[1];"), Type::Int);
        assert_eq!(
            written_type("int ia[3]; int (*iap)[3]; iap = &ia; write iap;"),
            Type::Int.array_of(Some(3)).pointer_to()
        );
        assert_eq!(written_type("int (*iap)[3]; write (*iap)[2];"), Type::Int);
        assert_eq!(written_type("int *(*ipap)[4]; write *(*ipap)[0];"), Type::Int);
    }

    #[test]
    fn test_pointer_arithmetic() {
        assert_eq!(written_type("int a[4]; write a + 1;"), Type::Int.pointer_to());
        assert_eq!(written_type("int *p; write 2 + p;"), Type::Int.pointer_to());
        assert!(matches!(
            err_kind("int *p; int *q; write p + q;"),
            TypeErrorKind::IncompatibleOperands { .. }
        ));
        assert!(matches!(
            err_kind("int *p; write 1 - p;"),
            TypeErrorKind::IncompatibleOperands { .. }
        ));
    }

    #[test]
    fn test_array_decays_in_assignment_and_arguments() {
        assert!(check_main("int a[3]; int *p; p = a;").is_ok());
        assert!(check_source("void f(int ns[]) { } void main() { int a[3]; f(a); }").is_ok());
        assert!(matches!(
            check_source("void f(bool *b) { } void main() { int a[3]; f(a); }")
                .unwrap_err()
                .kind,
            TypeErrorKind::ArgumentMismatch { index: 1, .. }
        ));
    }

    #[test]
    fn test_assignment_rules() {
        assert!(matches!(
            err_kind("int x; bool b; x = b;"),
            TypeErrorKind::Mismatch { .. }
        ));
        assert!(matches!(
            err_kind("int a[3]; int b[3]; a = b;"),
            TypeErrorKind::ArrayAssignment(_)
        ));
        assert_eq!(err_kind("int x; 1 = x;"), TypeErrorKind::NotAssignable);
        assert_eq!(err_kind("int x; int *p; p = &(x + 1);"), TypeErrorKind::NotAddressable);
    }

    #[test]
    fn test_conditions_must_be_bool() {
        let err = check_main("int x; if (x) write 1;").unwrap_err();
        assert_eq!(
            err.kind,
            TypeErrorKind::Mismatch {
                context: "condition".to_string(),
                expected: Type::Bool,
                found: Type::Int,
            }
        );
        assert!(check_main("bool b; while (b && 1 < 2) b = false;").is_ok());
    }

    #[test]
    fn test_comparisons() {
        assert!(check_main("int *p; int a[2]; write p == a;").is_ok());
        assert!(check_main("bool b; write b < true;").is_ok());
        assert!(matches!(
            err_kind("int *p; int *q; write p < q;"),
            TypeErrorKind::IncompatibleOperands { .. }
        ));
        assert!(matches!(
            err_kind("int x; bool b; write x == b;"),
            TypeErrorKind::IncompatibleOperands { .. }
        ));
    }

    #[test]
    fn test_void_call_is_not_a_value() {
        let err = check_source("void f() { } void main() { int x; x = f(); }").unwrap_err();
        assert_eq!(err.kind, TypeErrorKind::VoidValue("f".to_string()));
        assert!(check_source("void f() { } void main() { f(); }").is_ok());
    }

    #[test]
    fn test_read_and_write() {
        assert!(check_main("int a[2]; bool b; read a[1]; read b; write a;").is_ok());
        assert!(matches!(
            err_kind("int *p; read p;"),
            TypeErrorKind::InvalidReadTarget(_)
        ));
        assert_eq!(err_kind("read 3;"), TypeErrorKind::NotAssignable);
    }

    #[test]
    fn test_array_sizes() {
        assert!(matches!(err_kind("int a[0];"), TypeErrorKind::UnsizedArray(_)));
        assert!(matches!(err_kind("int a[];"), TypeErrorKind::UnsizedArray(_)));
        assert!(matches!(
            check_source("void f(int m[][]) { } void main() { }").unwrap_err().kind,
            TypeErrorKind::UnsizedArray(_)
        ));
    }

    #[test]
    fn test_oversized_arrays_are_rejected() {
        assert!(matches!(
            err_kind("int a[2147483647];"),
            TypeErrorKind::ArrayTooLarge { .. }
        ));
        assert!(matches!(
            err_kind("int a[2147483647][2147483647][2147483647];"),
            TypeErrorKind::ArrayTooLarge { .. }
        ));
        assert!(matches!(
            check_source("void f(int m[][65536][65536]) { } void main() { }")
                .unwrap_err()
                .kind,
            TypeErrorKind::ArrayTooLarge { .. }
        ));
        assert!(check_main("int a[4096][4096];").is_ok());
    }

    #[test]
    fn test_dereference_and_index_errors() {
        assert_eq!(err_kind("int x; write *x;"), TypeErrorKind::NotPointer(Type::Int));
        assert_eq!(err_kind("bool b; write b[0];"), TypeErrorKind::NotIndexable(Type::Bool));
        assert!(matches!(
            err_kind("int a[2]; bool b; write a[b];"),
            TypeErrorKind::Mismatch { .. }
        ));
    }

    #[test]
    fn test_error_location_points_at_node() {
        let err = check_main("int x;\n bool b;\n x = b;").unwrap_err();
        assert_eq!(err.location, SourceLocation::new(3, 4));
    }
}
