// AST (Abstract Syntax Tree) definitions for Micro-C

use std::fmt;

/// Unique identifier for expression and declaration nodes.
///
/// The resolver and checker record their results in side tables keyed by
/// `NodeId`, so the tree itself stays immutable after parsing.
pub type NodeId = usize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Micro-C types.
///
/// Pointer and array types nest to any depth: `int *(*ipap)[4]` is
/// `Pointer(Array(Pointer(Int), Some(4)))`. An array without a size only
/// appears as a parameter type (`int ns[]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Bool,
    Void,
    Pointer(Box<Type>),
    Array(Box<Type>, Option<usize>),
}

impl Type {
    pub fn pointer_to(self) -> Self {
        Type::Pointer(Box::new(self))
    }

    pub fn array_of(self, size: Option<usize>) -> Self {
        Type::Array(Box::new(self), size)
    }

    /// Array-to-pointer decay; every other type is returned unchanged.
    pub fn decay(&self) -> Type {
        match self {
            Type::Array(element, _) => Type::Pointer(element.clone()),
            other => other.clone(),
        }
    }

    /// The type a pointer (or decayed array) designates.
    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::Pointer(inner) | Type::Array(inner, _) => Some(inner),
            _ => None,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(..))
    }

    /// Number of storage cells a value of this type occupies.
    ///
    /// Scalars (int, bool, pointers) take one cell; arrays take
    /// `size * cell_count(element)`, saturating at `usize::MAX`. Unsized
    /// arrays and void take none.
    pub fn cell_count(&self) -> usize {
        match self {
            Type::Int | Type::Bool | Type::Pointer(_) => 1,
            Type::Void => 0,
            Type::Array(element, size) => size
                .unwrap_or(0)
                .saturating_mul(element.cell_count()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::Pointer(inner) => write!(f, "pointer to {}", inner),
            Type::Array(element, Some(size)) => write!(f, "array[{}] of {}", size, element),
            Type::Array(element, None) => write!(f, "array of {}", element),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Unary operators (address-of and dereference have their own nodes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg, // -x
    Not, // !x
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
        }
    }
}

/// An expression node.
///
/// Equality is structural: node ids and source locations are ignored, so a
/// re-parsed program compares equal to the original.
#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub location: SourceLocation,
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLiteral(i32),
    BoolLiteral(bool),
    Variable(String),
    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
    },
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    AddressOf(Box<Expr>),
    Deref(Box<Expr>),
    Index {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Whether this expression denotes a storage location.
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Variable(_) | ExprKind::Deref(_) | ExprKind::Index { .. }
        )
    }
}

/// A variable declaration: global, local, or parameter.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub id: NodeId,
    pub name: String,
    pub var_type: Type,
    pub location: SourceLocation,
}

impl PartialEq for VarDecl {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.var_type == other.var_type
    }
}

/// A statement node. Equality ignores the location.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub location: SourceLocation,
}

impl PartialEq for Stmt {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    VarDecl(VarDecl),
    Expr(Expr),
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Read(Expr),
    Write(Expr),
}

/// A function definition. Micro-C functions return nothing; results travel
/// through pointer parameters or `write`.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    pub params: Vec<VarDecl>,
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

impl PartialEq for FuncDecl {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params && self.body == other.body
    }
}

/// Top-level program structure, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub globals: Vec<VarDecl>,
    pub functions: Vec<FuncDecl>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    pub fn function(&self, name: &str) -> Option<&FuncDecl> {
        self.functions.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count_nests() {
        let ipa = Type::Int.pointer_to().array_of(Some(4));
        assert_eq!(ipa.cell_count(), 4);

        let grid = Type::Int.array_of(Some(3)).array_of(Some(2));
        assert_eq!(grid.cell_count(), 6);

        let iap = Type::Int.array_of(Some(3)).pointer_to();
        assert_eq!(iap.cell_count(), 1);
        assert_eq!(iap.pointee().map(Type::cell_count), Some(3));
    }

    #[test]
    fn test_decay() {
        let arr = Type::Bool.array_of(Some(5));
        assert_eq!(arr.decay(), Type::Bool.pointer_to());
        assert_eq!(Type::Int.decay(), Type::Int);
    }

    #[test]
    fn test_type_display() {
        let ipap = Type::Int.pointer_to().array_of(Some(4)).pointer_to();
        assert_eq!(
            ipap.to_string(),
            "pointer to array[4] of pointer to int"
        );
    }
}
