//! Go source parsing, reduced to what the model extractor needs.
//!
//! The lexer tokenizes the whole file (so lexical errors anywhere are
//! reported), inserts the implicit semicolons Go's grammar relies on and
//! attaches lead doc comments to the token that follows them. The parser
//! then reads the declaration structure of the file: package clause,
//! imports, and every `type` declaration, including the ones declared inside
//! function bodies. Statements and expressions are parsed in full so that a
//! malformed file is rejected, but nothing beyond the type declarations is
//! kept.

mod ast;
mod lexer;
mod parser;

pub use ast::{FieldDecl, SourceFile, StructType, TypeNode, TypeSpec};
pub use parser::parse_file;

use thiserror::Error;

/// A malformed source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct SyntaxError {
    /// 1-based line of the offending token.
    pub line: usize,
    /// 1-based column of the offending token.
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}
