//! Recursive-descent parser over the token stream.
//!
//! Declarations are turned into the syntax tree. Function bodies and value
//! initializers are parsed in full by [`stmt`] and [`expr`] so that malformed
//! code is rejected, but only the `type` declarations found inside them are
//! kept.

mod expr;
mod stmt;

use super::SyntaxError;
use super::ast::{FieldDecl, SourceFile, StructType, TypeNode, TypeSpec};
use super::lexer::{Token, TokenKind, tokenize};
use crate::types::{ExprKind, TypeExpr};

type ParseResult<T> = Result<T, SyntaxError>;

/// Parse a Go source file.
///
/// Returns the first syntax error encountered; there is no recovery.
pub fn parse_file(source: &str) -> Result<SourceFile, SyntaxError> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).file()
}

struct Parser {
    /// Always ends with an `Eof` token.
    tokens: Vec<Token>,
    pos: usize,
    /// Expression nesting: raised inside parentheses and brackets, `-1` in
    /// the header of an `if`, `for` or `switch`, where a `{` after a type
    /// name opens the block rather than a composite literal.
    expr_lev: i32,
    /// Type specs in the order they were parsed, function-local ones included.
    types: Vec<TypeSpec>,
}

fn closer_for(open: &str) -> &'static str {
    match open {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

fn is_opener(tok: &Token) -> bool {
    tok.kind == TokenKind::Punct && matches!(tok.text.as_str(), "(" | "[" | "{")
}

fn is_closer(tok: &Token) -> bool {
    tok.kind == TokenKind::Punct && matches!(tok.text.as_str(), ")" | "]" | "}")
}

fn token_starts_type(tok: &Token) -> bool {
    match tok.kind {
        TokenKind::Ident => true,
        TokenKind::Punct => matches!(tok.text.as_str(), "*" | "[" | "(" | "<-"),
        TokenKind::Keyword => matches!(
            tok.text.as_str(),
            "map" | "chan" | "func" | "interface" | "struct"
        ),
        _ => false,
    }
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            expr_lev: 0,
            types: Vec::new(),
        }
    }

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    fn next(&mut self) -> Token {
        let tok = self.peek().clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn error_at(tok: &Token, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(tok.line, tok.column, message)
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let tok = self.peek();
        Self::error_at(tok, format!("expected {expected}, found {}", tok.describe()))
    }

    fn expect_punct(&mut self, punct: &str) -> ParseResult<Token> {
        if self.peek().is_punct(punct) {
            Ok(self.next())
        } else {
            Err(self.unexpected(&format!("'{punct}'")))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<Token> {
        if self.peek().is_keyword(keyword) {
            Ok(self.next())
        } else {
            Err(self.unexpected(&format!("'{keyword}'")))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        if self.peek().kind == TokenKind::Ident {
            Ok(self.next().text)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    /// End of a top-level declaration.
    fn expect_decl_end(&mut self) -> ParseResult<()> {
        match self.peek().kind {
            TokenKind::Semicolon => {
                self.next();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("';'")),
        }
    }

    /// End of an entry inside `( ... )` or `{ ... }`; the separator may be
    /// omitted before the closing delimiter.
    fn expect_entry_end(&mut self, close: &str) -> ParseResult<()> {
        if self.peek().kind == TokenKind::Semicolon {
            self.next();
            Ok(())
        } else if self.peek().is_punct(close) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("';' or '{close}'")))
        }
    }

    /// Run `f` one expression level deeper.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let saved = self.expr_lev;
        self.expr_lev = saved + 1;
        let result = f(self);
        self.expr_lev = saved;
        result
    }

    /// Run `f` as the header of a control clause.
    fn control_clause<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let saved = self.expr_lev;
        self.expr_lev = -1;
        let result = f(self);
        self.expr_lev = saved;
        result
    }

    fn file(mut self) -> ParseResult<SourceFile> {
        self.expect_keyword("package")?;
        let package = self.expect_ident()?;
        self.expect_decl_end()?;

        while self.peek().is_keyword("import") {
            self.import_decl()?;
            self.expect_decl_end()?;
        }

        while self.peek().kind != TokenKind::Eof {
            match self.peek().keyword() {
                Some("type") => self.type_decl()?,
                Some("var" | "const") => self.value_decl()?,
                Some("func") => self.func_decl()?,
                Some("import") => {
                    return Err(Self::error_at(
                        self.peek(),
                        "imports must appear before other declarations",
                    ));
                }
                _ => {
                    return Err(Self::error_at(
                        self.peek(),
                        "non-declaration statement outside function body",
                    ));
                }
            }
            self.expect_decl_end()?;
        }

        Ok(SourceFile {
            package,
            types: self.types,
        })
    }

    fn import_decl(&mut self) -> ParseResult<()> {
        self.expect_keyword("import")?;
        if self.peek().is_punct("(") {
            self.next();
            while !self.peek().is_punct(")") {
                self.import_spec()?;
                self.expect_entry_end(")")?;
            }
            self.next();
            Ok(())
        } else {
            self.import_spec()
        }
    }

    fn import_spec(&mut self) -> ParseResult<()> {
        if self.peek().kind == TokenKind::Ident || self.peek().is_punct(".") {
            self.next();
        }
        if self.peek().kind != TokenKind::String {
            return Err(self.unexpected("import path"));
        }
        self.next();
        Ok(())
    }

    fn type_decl(&mut self) -> ParseResult<()> {
        let keyword = self.expect_keyword("type")?;
        if self.peek().is_punct("(") {
            self.next();
            while !self.peek().is_punct(")") {
                let doc = self.peek().doc.clone();
                let spec = self.type_spec(doc)?;
                self.types.push(spec);
                self.expect_entry_end(")")?;
            }
            self.next();
        } else {
            let spec = self.type_spec(keyword.doc)?;
            self.types.push(spec);
        }
        Ok(())
    }

    fn type_spec(&mut self, doc: Option<String>) -> ParseResult<TypeSpec> {
        let name = self.expect_ident()?;
        if self.starts_type_params() {
            self.skip_group()?;
        }
        let alias = self.peek().is_punct("=");
        if alias {
            self.next();
        }
        let ty = self.parse_type()?;
        Ok(TypeSpec {
            name,
            doc,
            alias,
            ty,
        })
    }

    /// `type List[T any] ...` as opposed to `type Buf [N]byte`.
    fn starts_type_params(&self) -> bool {
        if !self.peek().is_punct("[") || self.peek_nth(1).kind != TokenKind::Ident {
            return false;
        }
        let after = self.peek_nth(2);
        !(after.is_punct("]") || after.is_punct("."))
    }

    fn starts_type(&self) -> bool {
        token_starts_type(self.peek())
    }

    fn parse_type_expr(&mut self) -> ParseResult<TypeExpr> {
        Ok(self.parse_type()?.into_expr())
    }

    fn parse_type(&mut self) -> ParseResult<TypeNode> {
        let tok = self.peek().clone();
        let expr = match (tok.kind, tok.text.as_str()) {
            (TokenKind::Ident, _) => {
                self.next();
                let expr = if self.peek().is_punct(".") {
                    self.next();
                    TypeExpr::qualified(tok.text.clone(), self.expect_ident()?)
                } else {
                    TypeExpr::ident(tok.text.clone())
                };
                if self.peek().is_punct("[") {
                    // Generic instantiation, e.g. `List[int]`.
                    self.skip_group()?;
                    TypeExpr::Other(ExprKind::IndexExpr)
                } else {
                    expr
                }
            }
            (TokenKind::Punct, "*") => {
                self.next();
                TypeExpr::pointer(self.parse_type_expr()?)
            }
            (TokenKind::Punct, "[") => {
                if self.peek_nth(1).is_punct("]") {
                    self.next();
                    self.next();
                } else {
                    // `[N]T` and `[...]T` render like slices.
                    self.skip_group()?;
                }
                TypeExpr::slice(self.parse_type_expr()?)
            }
            (TokenKind::Punct, "(") => {
                self.next();
                self.parse_type()?;
                self.expect_punct(")")?;
                TypeExpr::Other(ExprKind::ParenExpr)
            }
            (TokenKind::Punct, "<-") => {
                self.next();
                self.expect_keyword("chan")?;
                self.parse_type()?;
                TypeExpr::Other(ExprKind::ChanType)
            }
            (TokenKind::Keyword, "map") => {
                self.next();
                self.expect_punct("[")?;
                self.parse_type()?;
                self.expect_punct("]")?;
                self.parse_type()?;
                TypeExpr::Other(ExprKind::MapType)
            }
            (TokenKind::Keyword, "chan") => {
                self.next();
                if self.peek().is_punct("<-") {
                    self.next();
                }
                self.parse_type()?;
                TypeExpr::Other(ExprKind::ChanType)
            }
            (TokenKind::Keyword, "func") => {
                self.next();
                self.signature()?;
                TypeExpr::Other(ExprKind::FuncType)
            }
            (TokenKind::Keyword, "interface") => {
                self.next();
                if !self.peek().is_punct("{") {
                    return Err(self.unexpected("'{'"));
                }
                self.skip_group()?;
                TypeExpr::Other(ExprKind::InterfaceType)
            }
            (TokenKind::Keyword, "struct") => return Ok(TypeNode::Struct(self.struct_type()?)),
            _ => return Err(self.unexpected("type")),
        };
        Ok(TypeNode::Expr(expr))
    }

    /// Parameters and optional result of a function type or declaration.
    fn signature(&mut self) -> ParseResult<()> {
        self.params()?;
        if self.peek().is_punct("(") {
            self.params()?;
        } else if self.starts_type() {
            self.parse_type()?;
        }
        Ok(())
    }

    fn params(&mut self) -> ParseResult<()> {
        self.expect_punct("(")?;
        while !self.peek().is_punct(")") {
            self.param_decl()?;
            if !self.peek().is_punct(",") {
                break;
            }
            self.next();
        }
        self.expect_punct(")")?;
        Ok(())
    }

    /// `T`, `name T`, `name ...T` or `...T`. Grouped names such as `a, b int`
    /// arrive one entry at a time and the leading ones read as bare types.
    fn param_decl(&mut self) -> ParseResult<()> {
        if self.peek().is_punct("...") {
            self.next();
            self.parse_type()?;
            return Ok(());
        }
        if self.peek().kind == TokenKind::Ident {
            let after = self.peek_nth(1);
            if after.is_punct("...") {
                self.next();
                self.next();
                self.parse_type()?;
                return Ok(());
            }
            if after.is_punct("[") {
                // `buf []byte`, `buf [4]byte` or the instantiation `List[T]`.
                self.next();
                self.skip_group()?;
                if self.starts_type() {
                    self.parse_type()?;
                }
                return Ok(());
            }
            if token_starts_type(after) {
                self.next();
            }
        }
        self.parse_type()?;
        Ok(())
    }

    fn struct_type(&mut self) -> ParseResult<StructType> {
        self.expect_keyword("struct")?;
        self.expect_punct("{")?;
        let mut fields = Vec::new();
        while !self.peek().is_punct("}") {
            fields.push(self.field_decl()?);
            self.expect_entry_end("}")?;
        }
        self.next();
        Ok(StructType { fields })
    }

    fn field_decl(&mut self) -> ParseResult<FieldDecl> {
        let first = self.peek().clone();
        let doc = first.doc.clone();

        let (names, ty) = if first.is_punct("*") {
            (Vec::new(), self.parse_type_expr()?)
        } else if first.kind == TokenKind::Ident {
            if self.starts_embedded_field() {
                (Vec::new(), self.parse_type_expr()?)
            } else {
                let mut names = vec![self.expect_ident()?];
                while self.peek().is_punct(",") {
                    self.next();
                    names.push(self.expect_ident()?);
                }
                (names, self.parse_type_expr()?)
            }
        } else {
            return Err(self.unexpected("field name or embedded type"));
        };

        let tag = (self.peek().kind == TokenKind::String).then(|| self.next().text);
        Ok(FieldDecl {
            names,
            ty,
            tag,
            doc,
        })
    }

    /// Whether the identifier at the cursor starts an embedded type rather
    /// than a field name: `Base`, `pkg.Base`, `Base[int]`, each optionally
    /// followed by a tag.
    fn starts_embedded_field(&self) -> bool {
        let ends_field = |tok: &Token| {
            tok.is_punct("}") || matches!(tok.kind, TokenKind::Semicolon | TokenKind::String)
        };
        let after = self.peek_nth(1);
        if after.is_punct(".") || ends_field(after) {
            return true;
        }
        if after.is_punct("[") {
            return self
                .group_end(self.pos + 1)
                .is_some_and(|end| ends_field(&self.tokens[end]));
        }
        false
    }

    /// Index of the token after the balanced group opening at `start`.
    fn group_end(&self, start: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, tok) in self.tokens.iter().enumerate().skip(start) {
            if is_opener(tok) {
                depth += 1;
            } else if is_closer(tok) {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            } else if tok.kind == TokenKind::Eof {
                return None;
            }
        }
        None
    }

    fn func_decl(&mut self) -> ParseResult<()> {
        self.expect_keyword("func")?;
        if self.peek().is_punct("(") {
            // receiver
            self.params()?;
        }
        self.expect_ident()?;
        if self.peek().is_punct("[") {
            self.skip_group()?;
        }
        self.signature()?;
        if self.peek().is_punct("{") {
            self.block()?;
        }
        Ok(())
    }

    /// `var` or `const` declaration, single or grouped.
    fn value_decl(&mut self) -> ParseResult<()> {
        self.next();
        if self.peek().is_punct("(") {
            self.next();
            while !self.peek().is_punct(")") {
                self.value_spec()?;
                self.expect_entry_end(")")?;
            }
            self.next();
            Ok(())
        } else {
            self.value_spec()
        }
    }

    /// `a, b T = x, y`; the type, the values, or both may be present.
    fn value_spec(&mut self) -> ParseResult<()> {
        self.expect_ident()?;
        while self.peek().is_punct(",") {
            self.next();
            self.expect_ident()?;
        }
        if self.starts_type() {
            self.parse_type()?;
        }
        if self.peek().is_punct("=") {
            self.next();
            self.expr_list()?;
        }
        Ok(())
    }

    /// Consume a balanced `(...)`, `[...]` or `{...}` group starting at the
    /// current token.
    fn skip_group(&mut self) -> ParseResult<()> {
        if !is_opener(self.peek()) {
            return Err(self.unexpected("'(', '[' or '{'"));
        }
        let mut open = vec![self.next()];
        while let Some(innermost) = open.last() {
            let tok = self.peek();
            if tok.kind == TokenKind::Eof {
                let expected = closer_for(&innermost.text);
                return Err(Self::error_at(tok, format!("expected '{expected}', found EOF")));
            }
            if is_opener(tok) {
                open.push(self.next());
            } else if is_closer(tok) {
                let expected = closer_for(&innermost.text);
                if tok.text != expected {
                    return Err(self.unexpected(&format!("'{expected}'")));
                }
                self.next();
                open.pop();
            } else {
                self.next();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_struct(source: &str) -> StructType {
        let file = parse_file(source).unwrap();
        assert_eq!(file.types.len(), 1);
        match file.types.into_iter().next().unwrap().ty {
            TypeNode::Struct(st) => st,
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_simple_struct() {
        let st = single_struct(
            r#"
package model

type User struct {
    ID   int64
    Name string `json:"name"`
}
"#,
        );
        assert_eq!(st.fields.len(), 2);
        assert_eq!(st.fields[0].names, vec!["ID"]);
        assert_eq!(st.fields[0].ty, TypeExpr::ident("int64"));
        assert_eq!(st.fields[0].tag, None);
        assert_eq!(st.fields[1].tag.as_deref(), Some("`json:\"name\"`"));
    }

    #[test]
    fn test_parse_field_types() {
        let st = single_struct(
            r#"
package model

import "time"

type Order struct {
    Items    []*Item
    Created  time.Time
    Meta     map[string]any
    Buf      [16]byte
    Done     chan struct{}
    Handler  func(int) error
    Inner    struct{ A int }
    Any      interface{}
    Grouped  (int)
    Page     Page[Item]
}
"#,
        );
        let sigs: Vec<String> = st.fields.iter().map(|f| f.ty.signature()).collect();
        assert_eq!(
            sigs,
            vec![
                "[]*Item",
                "time.Time",
                "<MapType>",
                "[]byte",
                "<ChanType>",
                "<FuncType>",
                "<StructType>",
                "<InterfaceType>",
                "<ParenExpr>",
                "<IndexExpr>",
            ]
        );
    }

    #[test]
    fn test_embedded_fields_have_no_names() {
        let st = single_struct(
            r#"
package model

type Admin struct {
    User
    *Base
    gorm.Model `json:"-"`
    Level int
}
"#,
        );
        let embedded: Vec<bool> = st.fields.iter().map(FieldDecl::is_embedded).collect();
        assert_eq!(embedded, vec![true, true, true, false]);
        assert_eq!(st.fields[2].tag.as_deref(), Some("`json:\"-\"`"));
    }

    #[test]
    fn test_multiple_names_per_line() {
        let st = single_struct("package p\ntype P struct { X, Y float64 }\n");
        assert_eq!(st.fields[0].names, vec!["X", "Y"]);
    }

    #[test]
    fn test_grouped_declarations_and_aliases() {
        let file = parse_file(
            r#"
package model

type (
    // A is a struct.
    A struct{}
    B = A
    C interface{ M() }
    D int
)
"#,
        )
        .unwrap();
        let names: Vec<_> = file.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
        assert_eq!(file.types[0].doc.as_deref(), Some("A is a struct.\n"));
        assert!(file.types[1].alias);
        assert_eq!(
            file.types[2].ty,
            TypeNode::Expr(TypeExpr::Other(ExprKind::InterfaceType))
        );
    }

    #[test]
    fn test_ungrouped_doc_comes_from_type_keyword() {
        let file = parse_file("package p\n\n// Thing does things.\ntype Thing struct{}\n").unwrap();
        assert_eq!(file.types[0].doc.as_deref(), Some("Thing does things.\n"));
    }

    #[test]
    fn test_field_docs() {
        let st = single_struct(
            r#"
package p

type T struct {
    // ID is the key.
    ID int64 // trailing, ignored

    Name string
}
"#,
        );
        assert_eq!(st.fields[0].doc.as_deref(), Some("ID is the key.\n"));
        assert_eq!(st.fields[1].doc, None);
    }

    #[test]
    fn test_functions_and_values_are_skipped() {
        let file = parse_file(
            r#"
package p

import (
    "fmt"
    str "strings"
)

const Max = 10

var (
    names = []string{"a", "b"}
)

func (u *User) String() string {
    return fmt.Sprintf("%s", str.ToLower(u.Name))
}

func Check(v interface{}) (bool, error) {
    switch v.(type) {
    case int:
        return true, nil
    }
    return false, nil
}

type User struct{ Name string }
"#,
        )
        .unwrap();
        assert_eq!(file.package, "p");
        let names: Vec<_> = file.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["User"]);
    }

    #[test]
    fn test_types_inside_function_bodies() {
        let file = parse_file(
            r#"
package p

func build() {
    type local struct {
        Value int
    }
    _ = local{}
}
"#,
        )
        .unwrap();
        assert_eq!(file.types.len(), 1);
        assert_eq!(file.types[0].name, "local");
    }

    #[test]
    fn test_generic_type_params_are_skipped() {
        let file = parse_file("package p\ntype Page[T any] struct { Items []T }\n").unwrap();
        assert_eq!(file.types[0].name, "Page");
        assert!(matches!(file.types[0].ty, TypeNode::Struct(_)));
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = parse_file("package p\ntype User struct {\n    ID int64\n").unwrap_err();
        assert_eq!(err.line, 4);
        assert!(err.message.contains("found EOF"), "{}", err.message);
    }

    #[test]
    fn test_missing_package_clause() {
        let err = parse_file("type User struct{}").unwrap_err();
        assert_eq!(err.message, "expected 'package', found 'type'");
    }

    #[test]
    fn test_statement_outside_function() {
        let err = parse_file("package p\nx := 1\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.message, "non-declaration statement outside function body");
    }

    #[test]
    fn test_mismatched_delimiters_in_body() {
        let err = parse_file("package p\nfunc f() {\n    g(]\n}\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.message, "expected operand, found ']'");
    }

    #[test]
    fn test_malformed_statements_are_rejected() {
        let cases = [
            ("package p
func f() { x := := 1 }
", "expected operand, found ':='"),
            ("package p
var x = = = 1
", "expected operand, found '='"),
            (
                "package p
func f() int { return return }
",
                "expected operand, found 'return'",
            ),
            ("package p
func f() {
    if {
    }
}
", "missing condition in if statement"),
            ("package p
func f() {
    x.
}
", "expected identifier, found '}'"),
        ];
        for (source, message) in cases {
            let err = parse_file(source).unwrap_err();
            assert_eq!(err.message, message, "{source:?}");
        }
    }

    #[test]
    fn test_function_bodies_are_parsed() {
        let file = parse_file(
            r#"
package p

import "errors"

var ErrMissing = errors.New("missing")

const (
    A Kind = iota
    B
)

func Sum[T int | float64](xs ...T) (total T) {
    for _, x := range xs {
        total += x
    }
    return
}

func (r *Repo[T]) Find(ids []int64, keep func(T) bool) (out []T, err error) {
    seen := map[int64]struct{}{}
outer:
    for i := 0; i < len(ids); i++ {
        switch id := ids[i]; {
        case id < 0:
            continue outer
        case id == 0:
            break outer
        default:
            seen[id] = struct{}{}
        }
    }
    if v, ok := r.cache.(interface{ Get() T }); ok && keep(v.Get()) {
        out = append(out, v.Get())
    } else if err != nil {
        return nil, err
    }
    ch := make(chan T, 1)
    go func() { ch <- *new(T) }()
    select {
    case v := <-ch:
        out = append(out, v)
    default:
    }
    defer func() {
        if rec := recover(); rec != nil {
            err = ErrMissing
        }
    }()
    items := []*Item{{Name: "a"}, {Name: "b"}}
    _ = items[1:len(items):cap(items)]
    for range ch {
        type Local struct{ ID int64 }
        _ = Local{ID: 1}
    }
    return out, nil
}
"#,
        )
        .unwrap();
        let names: Vec<_> = file.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Local"]);
    }

    #[test]
    fn test_embedded_generic_field() {
        let st = single_struct(
            r#"
package model

type Post struct {
    Base[int]
    pkg.Wrapper[string] `json:"-"`
    Page Page[Item]
}
"#,
        );
        let embedded: Vec<bool> = st.fields.iter().map(FieldDecl::is_embedded).collect();
        assert_eq!(embedded, vec![true, true, false]);
        assert_eq!(st.fields[2].names, vec!["Page"]);
    }

    #[test]
    fn test_array_field_is_not_embedded() {
        let st = single_struct("package p
type T struct {
    Buf [4]byte
}
");
        assert_eq!(st.fields[0].names, vec!["Buf"]);
        assert_eq!(st.fields[0].ty.signature(), "[]byte");
    }

    #[test]
    fn test_bad_field_type() {
        let err = parse_file("package p\ntype T struct { A = int }\n").unwrap_err();
        assert_eq!(err.message, "expected type, found '='");
    }
}
