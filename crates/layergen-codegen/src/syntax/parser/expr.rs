//! Expressions. They are checked and discarded.

use super::{ParseResult, Parser};
use crate::syntax::lexer::{Token, TokenKind};

/// What an operand may be followed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    /// `T`, `pkg.T` or `T[int]`: a composite literal only outside control
    /// clause headers.
    TypeName,
    /// `[]T`, `[N]T`, `map[K]V` or `struct{...}`: always a composite literal.
    LiteralType,
    Value,
}

fn binary_precedence(tok: &Token) -> Option<u8> {
    if tok.kind != TokenKind::Punct {
        return None;
    }
    let prec = match tok.text.as_str() {
        "||" => 1,
        "&&" => 2,
        "==" | "!=" | "<" | "<=" | ">" | ">=" => 3,
        "+" | "-" | "|" | "^" => 4,
        "*" | "/" | "%" | "<<" | ">>" | "&" | "&^" => 5,
        _ => return None,
    };
    Some(prec)
}

impl Parser {
    pub(super) fn expr_list(&mut self) -> ParseResult<()> {
        self.expr()?;
        while self.peek().is_punct(",") {
            self.next();
            self.expr()?;
        }
        Ok(())
    }

    pub(super) fn expr(&mut self) -> ParseResult<()> {
        self.binary_expr(1)
    }

    fn binary_expr(&mut self, min_prec: u8) -> ParseResult<()> {
        self.unary_expr()?;
        while let Some(prec) = binary_precedence(self.peek()).filter(|&p| p >= min_prec) {
            self.next();
            self.binary_expr(prec + 1)?;
        }
        Ok(())
    }

    fn unary_expr(&mut self) -> ParseResult<()> {
        let tok = self.peek();
        if tok.is_punct("<-") && self.peek_nth(1).is_keyword("chan") {
            // `<-chan T(x)` is a conversion, not a receive.
            self.parse_type()?;
            return self.primary_suffixes(Operand::Value);
        }
        let unary = tok.kind == TokenKind::Punct
            && matches!(tok.text.as_str(), "+" | "-" | "!" | "^" | "*" | "&" | "<-");
        if unary {
            self.next();
            return self.unary_expr();
        }
        let operand = self.operand()?;
        self.primary_suffixes(operand)
    }

    fn operand(&mut self) -> ParseResult<Operand> {
        let tok = self.peek().clone();
        match (tok.kind, tok.text.as_str()) {
            (TokenKind::Ident, _) => {
                self.next();
                Ok(Operand::TypeName)
            }
            (
                TokenKind::Int
                | TokenKind::Float
                | TokenKind::Imag
                | TokenKind::Char
                | TokenKind::String,
                _,
            ) => {
                self.next();
                Ok(Operand::Value)
            }
            (TokenKind::Punct, "(") => {
                self.next();
                self.nested(Self::expr)?;
                self.expect_punct(")")?;
                Ok(Operand::Value)
            }
            (TokenKind::Punct, "[") | (TokenKind::Keyword, "struct" | "map") => {
                self.parse_type()?;
                Ok(Operand::LiteralType)
            }
            (TokenKind::Keyword, "chan" | "interface") => {
                self.parse_type()?;
                Ok(Operand::Value)
            }
            (TokenKind::Keyword, "func") => {
                self.next();
                self.signature()?;
                if self.peek().is_punct("{") {
                    self.nested(Self::block)?;
                }
                Ok(Operand::Value)
            }
            _ => Err(self.unexpected("operand")),
        }
    }

    fn primary_suffixes(&mut self, mut operand: Operand) -> ParseResult<()> {
        loop {
            let tok = self.peek();
            if tok.is_punct(".") {
                self.next();
                if self.peek().is_punct("(") {
                    // type assertion, or the `.(type)` of a type switch
                    self.next();
                    if self.peek().is_keyword("type") {
                        self.next();
                    } else {
                        self.parse_type()?;
                    }
                    self.expect_punct(")")?;
                    operand = Operand::Value;
                } else {
                    self.expect_ident()?;
                    if operand != Operand::TypeName {
                        operand = Operand::Value;
                    }
                }
            } else if tok.is_punct("[") {
                self.next();
                self.nested(Self::index_or_slice)?;
                self.expect_punct("]")?;
                if operand != Operand::TypeName {
                    operand = Operand::Value;
                }
            } else if tok.is_punct("(") {
                self.next();
                self.nested(Self::call_args)?;
                self.expect_punct(")")?;
                operand = Operand::Value;
            } else if tok.is_punct("{") && self.takes_literal(operand) {
                self.literal_value()?;
                operand = Operand::Value;
            } else {
                return Ok(());
            }
        }
    }

    fn takes_literal(&self, operand: Operand) -> bool {
        match operand {
            Operand::TypeName => self.expr_lev >= 0,
            Operand::LiteralType => true,
            Operand::Value => false,
        }
    }

    /// Inside `[...]`: an index, a slice `lo:hi:max` or a list of type
    /// arguments.
    fn index_or_slice(&mut self) -> ParseResult<()> {
        if !self.peek().is_punct(":") {
            self.expr()?;
        }
        if self.peek().is_punct(":") {
            for _ in 0..2 {
                if !self.peek().is_punct(":") {
                    break;
                }
                self.next();
                if !self.peek().is_punct(":") && !self.peek().is_punct("]") {
                    self.expr()?;
                }
            }
            return Ok(());
        }
        while self.peek().is_punct(",") {
            self.next();
            if self.peek().is_punct("]") {
                break;
            }
            self.expr()?;
        }
        Ok(())
    }

    fn call_args(&mut self) -> ParseResult<()> {
        while !self.peek().is_punct(")") {
            self.expr()?;
            if self.peek().is_punct("...") {
                self.next();
            }
            if !self.peek().is_punct(",") {
                break;
            }
            self.next();
        }
        Ok(())
    }

    /// `{ elem, key: elem, ... }` where elements may themselves be bare
    /// literal values.
    fn literal_value(&mut self) -> ParseResult<()> {
        self.expect_punct("{")?;
        self.nested(|p| {
            while !p.peek().is_punct("}") {
                p.element()?;
                if p.peek().is_punct(":") {
                    p.next();
                    p.element()?;
                }
                if !p.peek().is_punct(",") {
                    break;
                }
                p.next();
            }
            Ok(())
        })?;
        self.expect_punct("}")?;
        Ok(())
    }

    fn element(&mut self) -> ParseResult<()> {
        if self.peek().is_punct("{") {
            self.literal_value()
        } else {
            self.expr()
        }
    }
}
