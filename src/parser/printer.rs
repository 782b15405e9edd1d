//! Canonical source printer
//!
//! Renders a [`Program`] back to Micro-C text: globals first, then
//! functions, one declaration or statement per line with 4-space
//! indentation. Nested binary subexpressions are always parenthesized, so
//! the output re-parses to an equal tree.

use crate::parser::ast::*;

const INDENT: &str = "    ";

/// Render a whole program.
pub fn print_program(program: &Program) -> String {
    let mut printer = Printer::default();

    for global in &program.globals {
        printer.line(&format!("{};", declaration(global)));
    }

    for (i, function) in program.functions.iter().enumerate() {
        if i > 0 || !program.globals.is_empty() {
            printer.out.push('\n');
        }
        printer.function(function);
    }

    printer.out
}

/// Render a declaration with C declarator syntax, e.g. `int *(*p)[4]`.
pub fn declaration(decl: &VarDecl) -> String {
    declarator(&decl.var_type, decl.name.clone())
}

fn declarator(ty: &Type, inner: String) -> String {
    match ty {
        Type::Int => format!("int {}", inner),
        Type::Bool => format!("bool {}", inner),
        Type::Void => format!("void {}", inner),
        Type::Pointer(pointee) => declarator(pointee, format!("*{}", inner)),
        Type::Array(element, size) => {
            let inner = if inner.starts_with('*') {
                format!("({})", inner)
            } else {
                inner
            };
            let size = size.map(|n| n.to_string()).unwrap_or_default();
            declarator(element, format!("{}[{}]", inner, size))
        }
    }
}

/// Render an expression. The outermost operator is left bare.
pub fn expression(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::IntLiteral(n) => n.to_string(),
        ExprKind::BoolLiteral(b) => b.to_string(),
        ExprKind::Variable(name) => name.clone(),
        ExprKind::UnaryOp { op, operand } => format!("{}{}", op.symbol(), operand_text(operand)),
        ExprKind::BinaryOp { op, left, right } => format!(
            "{} {} {}",
            operand_text(left),
            op.symbol(),
            operand_text(right)
        ),
        ExprKind::AddressOf(operand) => format!("&{}", operand_text(operand)),
        ExprKind::Deref(operand) => format!("*{}", operand_text(operand)),
        ExprKind::Index { array, index } => {
            let base = match array.kind {
                ExprKind::UnaryOp { .. } | ExprKind::AddressOf(_) | ExprKind::Deref(_) => {
                    format!("({})", expression(array))
                }
                _ => operand_text(array),
            };
            format!("{}[{}]", base, expression(index))
        }
        ExprKind::Assign { target, value } => {
            format!("{} = {}", operand_text(target), expression(value))
        }
        ExprKind::Call { name, args } => {
            let args: Vec<String> = args.iter().map(expression).collect();
            format!("{}({})", name, args.join(", "))
        }
    }
}

/// Text of a subexpression: binary operations and assignments are
/// parenthesized.
fn operand_text(expr: &Expr) -> String {
    match expr.kind {
        ExprKind::BinaryOp { .. } | ExprKind::Assign { .. } => format!("({})", expression(expr)),
        _ => expression(expr),
    }
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn function(&mut self, function: &FuncDecl) {
        let params: Vec<String> = function.params.iter().map(declaration).collect();
        self.line(&format!("void {}({}) {{", function.name, params.join(", ")));
        self.items(&function.body);
        self.line("}");
    }

    fn items(&mut self, stmts: &[Stmt]) {
        self.depth += 1;
        for stmt in stmts {
            self.statement(stmt);
        }
        self.depth -= 1;
    }

    /// Print a statement used as an `if`/`else`/`while` body. Blocks open
    /// on the header line; anything else goes on its own indented line.
    fn body(&mut self, header: String, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Block(items) => {
                self.line(&format!("{} {{", header));
                self.items(items);
            }
            _ => {
                self.line(&header);
                self.depth += 1;
                self.statement(stmt);
                self.depth -= 1;
            }
        }
    }

    fn closes_block(stmt: &Stmt) -> bool {
        matches!(stmt.kind, StmtKind::Block(_))
    }

    fn statement(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::VarDecl(decl) => self.line(&format!("{};", declaration(decl))),
            StmtKind::Expr(expr) => self.line(&format!("{};", expression(expr))),
            StmtKind::Read(expr) => self.line(&format!("read {};", expression(expr))),
            StmtKind::Write(expr) => self.line(&format!("write {};", expression(expr))),
            StmtKind::Block(items) => {
                self.line("{");
                self.items(items);
                self.line("}");
            }
            StmtKind::While { condition, body } => {
                self.body(format!("while ({})", expression(condition)), body);
                if Self::closes_block(body) {
                    self.line("}");
                }
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.body(format!("if ({})", expression(condition)), then_branch);
                let Some(else_branch) = else_branch else {
                    if Self::closes_block(then_branch) {
                        self.line("}");
                    }
                    return;
                };

                let header = if Self::closes_block(then_branch) {
                    "} else"
                } else {
                    "else"
                };

                self.body(header.to_string(), else_branch);
                if Self::closes_block(else_branch) {
                    self.line("}");
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

    fn parse(source: &str) -> Program {
        let tokens = Lexer::new(source).tokenize().unwrap();
        Parser::new(tokens).parse_program().unwrap()
    }

    fn round_trip(source: &str) {
        let program = parse(source);
        let printed = print_program(&program);
        assert_eq!(parse(&printed), program, "printed:\n{}", printed);
    }

    #[test]
    fn test_declarators() {
        let program = parse("int *ipa[4]; int (*iap)[3]; int *(*ipap)[4]; bool m[2][3];");
        let printed: Vec<String> = program.globals.iter().map(declaration).collect();
        assert_eq!(
            printed,
            ["int *ipa[4]", "int (*iap)[3]", "int *(*ipap)[4]", "bool m[2][3]"]
        );
    }

    #[test]
    fn test_canonical_layout() {
        let program = parse("int n; void main() { int x; if (n < 1) { x = 1; } else x = 2; while (x > 0) x = x - 1; }");
        let expected = "\
int n;

void main() {
    int x;
    if (n < 1) {
        x = 1;
    } else
        x = 2;
    while (x > 0)
        x = x - 1;
}
";
        assert_eq!(print_program(&program), expected);
    }

    #[test]
    fn test_round_trip_constructs() {
        round_trip(
            "int g; bool flag; int *(*ipap)[4];
             void f(int ns[], int *out, bool b) {
                 *out = ns[0] + ns[1] * 2 / 1 - -3;
                 if (!b && (g == 1 || g != 2)) write true; else { write false; }
                 while (g <= 10) { g = g + 1; ; }
                 { int inner; read inner; write &inner; }
             }
             void main(void) {
                 int a[3]; int x; int y;
                 x = (y = y + 1) * y;
                 x = y = 7;
                 f(a, &x, x >= y);
                 write (*ipap)[1];
                 write *(*ipap)[2];
                 if (x > y) if (y < 0) write 1; else write 2;
             }",
        );
    }
}
