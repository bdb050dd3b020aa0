//! The normalized model handed to templates.

use serde::Serialize;
use std::fmt;
use strum::Display;

/// One record type found in the model directory.
///
/// Serializes with the key names templates refer to: `Name`, `Fields` and
/// `Comment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Struct {
    pub name: String,
    pub fields: Vec<Field>,
    /// Doc comment of the declaration.
    pub comment: Option<String>,
}

impl Struct {
    /// Case-folded type name, used for file names.
    pub fn lower_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// Look up a field by its declared name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A named member of a [`Struct`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    #[serde(rename = "Name")]
    pub name: String,
    /// Canonical rendering of the declared type, see [`TypeExpr::signature`].
    #[serde(rename = "Type")]
    pub type_signature: String,
    /// Tag literal as written in the source, delimiters included.
    #[serde(rename = "Tag")]
    pub raw_tag: Option<String>,
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
    /// External name taken from the tag, e.g. `id` for `` `json:"id,omitempty"` ``.
    #[serde(rename = "JsonName")]
    pub serialization_name: Option<String>,
}

/// A type expression as it appears in a field declaration.
///
/// Only the shapes that have a readable signature get their own variant;
/// everything else keeps just the kind of expression it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `int64`, `User`
    Ident(String),
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `time.Time`
    Qualified { package: String, name: String },
    /// `[]T`; fixed-size arrays are folded in here as well.
    Slice(Box<TypeExpr>),
    Other(ExprKind),
}

/// Expression kinds without a dedicated [`TypeExpr`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExprKind {
    MapType,
    ChanType,
    FuncType,
    InterfaceType,
    StructType,
    /// Generic instantiation such as `Page[T]`.
    IndexExpr,
    ParenExpr,
}

impl TypeExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeExpr::Ident(name.into())
    }

    pub fn pointer(inner: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(inner))
    }

    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Qualified {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn slice(inner: TypeExpr) -> Self {
        TypeExpr::Slice(Box::new(inner))
    }

    /// Render the canonical type signature.
    ///
    /// | Expression | Signature |
    /// |------------|-----------|
    /// | `T` | `T` |
    /// | `*T` | `*` + signature of `T` |
    /// | `pkg.T` | `pkg.T` |
    /// | `[]T`, `[N]T` | `[]` + signature of `T` |
    /// | anything else | `<Kind>`, e.g. `<MapType>` |
    pub fn signature(&self) -> String {
        match self {
            TypeExpr::Ident(name) => name.clone(),
            TypeExpr::Pointer(inner) => format!("*{}", inner.signature()),
            TypeExpr::Qualified { package, name } => format!("{package}.{name}"),
            TypeExpr::Slice(inner) => format!("[]{}", inner.signature()),
            TypeExpr::Other(kind) => format!("<{kind}>"),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}
