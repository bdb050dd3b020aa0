//! Statements inside function bodies.
//!
//! Nothing is built from them except the `type` declarations they contain,
//! which land in the parser's type list like top-level ones.

use super::{ParseResult, Parser};
use crate::syntax::lexer::TokenKind;

const ASSIGN_OPS: &[&str] = &[
    "=", ":=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", "&^=",
];

impl Parser {
    pub(super) fn block(&mut self) -> ParseResult<()> {
        self.expect_punct("{")?;
        self.stmt_list()?;
        self.expect_punct("}")?;
        Ok(())
    }

    /// Statements up to the closing `}` of a block or the next clause of a
    /// `switch` or `select`.
    fn stmt_list(&mut self) -> ParseResult<()> {
        loop {
            let tok = self.peek();
            let done = tok.is_punct("}")
                || tok.is_keyword("case")
                || tok.is_keyword("default")
                || tok.kind == TokenKind::Eof;
            if done {
                return Ok(());
            }
            self.stmt()?;
            self.expect_entry_end("}")?;
        }
    }

    fn stmt(&mut self) -> ParseResult<()> {
        let tok = self.peek().clone();
        match (tok.kind, tok.text.as_str()) {
            // empty statement
            (TokenKind::Semicolon, _) => Ok(()),
            (TokenKind::Keyword, "type") => self.type_decl(),
            (TokenKind::Keyword, "var" | "const") => self.value_decl(),
            (TokenKind::Keyword, "go" | "defer") => {
                self.next();
                self.expr()
            }
            (TokenKind::Keyword, "return") => {
                self.next();
                if !self.at_stmt_end() {
                    self.expr_list()?;
                }
                Ok(())
            }
            (TokenKind::Keyword, "break" | "continue") => {
                self.next();
                if self.peek().kind == TokenKind::Ident {
                    self.next();
                }
                Ok(())
            }
            (TokenKind::Keyword, "goto") => {
                self.next();
                self.expect_ident()?;
                Ok(())
            }
            (TokenKind::Keyword, "fallthrough") => {
                self.next();
                Ok(())
            }
            (TokenKind::Keyword, "if") => self.if_stmt(),
            (TokenKind::Keyword, "switch") => self.switch_stmt(),
            (TokenKind::Keyword, "select") => self.select_stmt(),
            (TokenKind::Keyword, "for") => self.for_stmt(),
            (TokenKind::Keyword, "func" | "struct" | "map" | "chan" | "interface") => {
                self.simple_stmt(false)?;
                Ok(())
            }
            (TokenKind::Keyword, _) => Err(self.unexpected("statement")),
            (TokenKind::Punct, "{") => self.block(),
            (TokenKind::Ident, _) if self.peek_nth(1).is_punct(":") => {
                // label
                self.next();
                self.next();
                if self.at_stmt_end() {
                    Ok(())
                } else {
                    self.stmt()
                }
            }
            _ => {
                self.simple_stmt(false)?;
                Ok(())
            }
        }
    }

    fn at_stmt_end(&self) -> bool {
        let tok = self.peek();
        matches!(tok.kind, TokenKind::Semicolon | TokenKind::Eof) || tok.is_punct("}")
    }

    /// Expression, send, inc/dec or assignment statement. With `range_ok`
    /// the right-hand side may be a `range` clause; returns whether it was.
    fn simple_stmt(&mut self, range_ok: bool) -> ParseResult<bool> {
        if range_ok && self.peek().is_keyword("range") {
            self.next();
            self.expr()?;
            return Ok(true);
        }
        self.expr_list()?;

        let tok = self.peek().clone();
        if tok.kind != TokenKind::Punct {
            return Ok(false);
        }
        match tok.text.as_str() {
            op if ASSIGN_OPS.contains(&op) => {
                self.next();
                if range_ok && matches!(op, "=" | ":=") && self.peek().is_keyword("range") {
                    self.next();
                    self.expr()?;
                    return Ok(true);
                }
                self.expr_list()?;
            }
            "<-" => {
                self.next();
                self.expr()?;
            }
            "++" | "--" => {
                self.next();
            }
            _ => {}
        }
        Ok(false)
    }

    fn if_stmt(&mut self) -> ParseResult<()> {
        self.expect_keyword("if")?;
        self.control_clause(Self::if_header)?;
        self.block()?;
        if self.peek().is_keyword("else") {
            self.next();
            if self.peek().is_keyword("if") {
                self.if_stmt()?;
            } else if self.peek().is_punct("{") {
                self.block()?;
            } else {
                return Err(self.unexpected("if statement or block"));
            }
        }
        Ok(())
    }

    /// `cond` or `init; cond`.
    fn if_header(&mut self) -> ParseResult<()> {
        if self.peek().is_punct("{") {
            return Err(Self::error_at(self.peek(), "missing condition in if statement"));
        }
        if self.peek().kind != TokenKind::Semicolon {
            self.simple_stmt(false)?;
        }
        if self.peek().kind == TokenKind::Semicolon {
            self.next();
            if self.peek().is_punct("{") {
                return Err(Self::error_at(self.peek(), "missing condition in if statement"));
            }
            self.expr()?;
        }
        Ok(())
    }

    fn switch_stmt(&mut self) -> ParseResult<()> {
        self.expect_keyword("switch")?;
        self.control_clause(|p| {
            if p.peek().is_punct("{") {
                return Ok(());
            }
            if p.peek().kind != TokenKind::Semicolon {
                p.simple_stmt(false)?;
            }
            if p.peek().kind == TokenKind::Semicolon {
                p.next();
                if !p.peek().is_punct("{") {
                    p.simple_stmt(false)?;
                }
            }
            Ok(())
        })?;
        self.clauses(Self::expr_list)
    }

    fn select_stmt(&mut self) -> ParseResult<()> {
        self.expect_keyword("select")?;
        self.clauses(|p| p.simple_stmt(false).map(drop))
    }

    /// `{ case ...: stmts default: stmts }` of a `switch` or `select`.
    fn clauses(&mut self, header: fn(&mut Self) -> ParseResult<()>) -> ParseResult<()> {
        self.expect_punct("{")?;
        while !self.peek().is_punct("}") {
            if self.peek().is_keyword("case") {
                self.next();
                header(self)?;
            } else if self.peek().is_keyword("default") {
                self.next();
            } else {
                return Err(self.unexpected("'case' or 'default'"));
            }
            self.expect_punct(":")?;
            self.stmt_list()?;
        }
        self.next();
        Ok(())
    }

    fn for_stmt(&mut self) -> ParseResult<()> {
        self.expect_keyword("for")?;
        self.control_clause(Self::for_header)?;
        self.block()
    }

    /// Empty, `cond`, `init; cond; post` or a range clause.
    fn for_header(&mut self) -> ParseResult<()> {
        if self.peek().is_punct("{") {
            return Ok(());
        }
        if self.peek().kind != TokenKind::Semicolon && self.simple_stmt(true)? {
            return Ok(());
        }
        if self.peek().kind == TokenKind::Semicolon {
            self.next();
            if self.peek().kind != TokenKind::Semicolon {
                self.expr()?;
            }
            if self.peek().kind != TokenKind::Semicolon {
                return Err(self.unexpected("';'"));
            }
            self.next();
            if !self.peek().is_punct("{") {
                self.simple_stmt(false)?;
            }
        }
        Ok(())
    }
}
