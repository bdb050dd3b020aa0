//! Declaration-level syntax tree of a Go source file.

use crate::types::TypeExpr;

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Name from the `package` clause.
    pub package: String,
    /// Every type spec in declaration order, top level and function-local.
    pub types: Vec<TypeSpec>,
}

/// One `Name Type` (or `Name = Type`) entry of a `type` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: String,
    /// Normalized doc comment text.
    pub doc: Option<String>,
    /// `type Name = Type`.
    pub alias: bool,
    pub ty: TypeNode,
}

/// The underlying type of a type spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    Struct(StructType),
    Expr(TypeExpr),
}

impl TypeNode {
    /// Collapse into a type expression, the way a struct literal type looks
    /// when it appears as a field type.
    pub fn into_expr(self) -> TypeExpr {
        match self {
            TypeNode::Struct(_) => TypeExpr::Other(crate::types::ExprKind::StructType),
            TypeNode::Expr(expr) => expr,
        }
    }
}

/// `struct { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructType {
    pub fields: Vec<FieldDecl>,
}

/// One line of a struct body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Declared names; empty for an embedded field.
    pub names: Vec<String>,
    pub ty: TypeExpr,
    /// Raw tag literal including its delimiters, e.g. `` `json:"id"` ``.
    pub tag: Option<String>,
    pub doc: Option<String>,
}

impl FieldDecl {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}
