//! Go tokenizer.
//!
//! Produces the full token stream of a file up front, terminated by a single
//! [`TokenKind::Eof`] token. Comments never become tokens: a comment group
//! that ends on the line right before a token is normalized and attached to
//! that token as its `doc`.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_until, take_while, take_while1};
use nom::character::complete::{char, none_of, one_of, satisfy};
use nom::combinator::{cut, opt, recognize};
use nom::multi::{many0_count, many1_count};
use nom::sequence::pair;
use nom::{IResult, Parser};

use super::SyntaxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    Keyword,
    Int,
    Float,
    Imag,
    Char,
    /// Interpreted (`"..."`) or raw (`` `...` ``) string literal.
    String,
    Punct,
    /// Explicit `;` or one inserted at a line break.
    Semicolon,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Source text; `"\n"` for an inserted semicolon.
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub doc: Option<String>,
}

impl Token {
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == punct
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    pub fn keyword(&self) -> Option<&str> {
        (self.kind == TokenKind::Keyword).then_some(self.text.as_str())
    }

    /// How the token reads in an error message.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "EOF".to_string(),
            TokenKind::Semicolon if self.text == "\n" => "newline".to_string(),
            TokenKind::Ident => self.text.clone(),
            _ => format!("'{}'", self.text),
        }
    }
}

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

#[derive(Debug, Clone)]
struct Comment {
    text: String,
    start_line: usize,
    end_line: usize,
}

#[derive(Debug, Clone, Copy)]
struct Position {
    line: usize,
    column: usize,
}

impl Position {
    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

/// One step of the scan: either something the token pass looks at, or
/// layout it only needs for semicolon insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme<'a> {
    Newline,
    Space,
    Comment(&'a str),
    Token(TokenKind, &'a str),
}

fn lexeme(input: &str) -> IResult<&str, Lexeme<'_>> {
    alt((
        char('\n').map(|_| Lexeme::Newline),
        take_while1(|c: char| matches!(c, ' ' | '\t' | '\r')).map(|_| Lexeme::Space),
        alt((line_comment, block_comment)).map(Lexeme::Comment),
        token.map(|(kind, text)| Lexeme::Token(kind, text)),
    ))
    .parse(input)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), take_while(|c: char| c != '\n'))).parse(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("/*"), cut(pair(take_until("*/"), tag("*/"))))).parse(input)
}

fn token(input: &str) -> IResult<&str, (TokenKind, &str)> {
    alt((
        word,
        number,
        interpreted_string.map(|text| (TokenKind::String, text)),
        raw_string.map(|text| (TokenKind::String, text)),
        rune.map(|text| (TokenKind::Char, text)),
        operator,
    ))
    .parse(input)
}

/// Identifier or keyword.
fn word(input: &str) -> IResult<&str, (TokenKind, &str)> {
    let (rest, text) = recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)?;
    let kind = if KEYWORDS.contains(&text) {
        TokenKind::Keyword
    } else {
        TokenKind::Ident
    };
    Ok((rest, (kind, text)))
}

fn number(input: &str) -> IResult<&str, (TokenKind, &str)> {
    let (rest, text) =
        recognize(pair(alt((prefixed_number, decimal_number)), opt(char('i')))).parse(input)?;
    Ok((rest, (number_kind(text), text)))
}

/// `0x1F`, `0x1p-4`, `0b1010`, `0o17`.
fn prefixed_number(input: &str) -> IResult<&str, &str> {
    recognize((
        char('0'),
        one_of("xXbBoO"),
        take_while(|c: char| c.is_ascii_hexdigit() || c == '_' || c == '.'),
        opt((one_of("pP"), opt(one_of("+-")), digits)),
    ))
    .parse(input)
}

/// `42`, `1.5`, `1.`, `.5`, each with an optional exponent.
fn decimal_number(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((
            recognize(pair(digits, opt(pair(char('.'), opt(digits))))),
            recognize(pair(char('.'), digits)),
        )),
        opt((one_of("eE"), opt(one_of("+-")), digits)),
    ))
    .parse(input)
}

fn digits(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_digit()),
        take_while(|c: char| c.is_ascii_digit() || c == '_'),
    ))
    .parse(input)
}

fn number_kind(text: &str) -> TokenKind {
    if text.ends_with('i') {
        return TokenKind::Imag;
    }
    let prefix = text.get(..2).unwrap_or_default();
    let float = match prefix {
        "0x" | "0X" => text.contains('.') || text.contains(['p', 'P']),
        "0b" | "0B" | "0o" | "0O" => false,
        _ => text.contains('.') || text.contains(['e', 'E']),
    };
    if float {
        TokenKind::Float
    } else {
        TokenKind::Int
    }
}

fn interpreted_string(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        char('"'),
        cut(pair(
            many0_count(alt((
                recognize(pair(char('\\'), none_of("\n"))),
                take_while1(|c: char| !matches!(c, '"' | '\\' | '\n')),
            ))),
            char('"'),
        )),
    ))
    .parse(input)
}

fn raw_string(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('`'), cut(pair(take_until("`"), char('`'))))).parse(input)
}

fn rune(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        char('\''),
        cut(pair(
            many1_count(alt((
                recognize(pair(char('\\'), none_of("\n"))),
                take_while1(|c: char| !matches!(c, '\'' | '\\' | '\n')),
            ))),
            char('\''),
        )),
    ))
    .parse(input)
}

/// Operators and delimiters, longer spellings tried first.
fn operator(input: &str) -> IResult<&str, (TokenKind, &str)> {
    let (rest, text) = alt((
        alt((tag("<<="), tag(">>="), tag("&^="), tag("..."))),
        alt((
            tag("&&"),
            tag("||"),
            tag("<-"),
            tag("++"),
            tag("--"),
            tag("=="),
            tag("!="),
            tag("<="),
            tag(">="),
            tag(":="),
            tag("+="),
        )),
        alt((
            tag("-="),
            tag("*="),
            tag("/="),
            tag("%="),
            tag("&="),
            tag("|="),
            tag("^="),
            tag("<<"),
            tag(">>"),
            tag("&^"),
        )),
        recognize(one_of("+-*/%&|^<>=!~()[]{},;.:")),
    ))
    .parse(input)?;
    let kind = if text == ";" {
        TokenKind::Semicolon
    } else {
        TokenKind::Punct
    };
    Ok((rest, (kind, text)))
}

/// Error for input no lexeme matches, named after the literal it opens.
fn lex_error(input: &str, at: Position) -> SyntaxError {
    let message = if input.starts_with("/*") {
        "comment not terminated".to_string()
    } else if input.starts_with("''") {
        "empty rune literal or unescaped ' in rune literal".to_string()
    } else if input.starts_with('"') {
        "string literal not terminated".to_string()
    } else if input.starts_with('`') {
        "raw string literal not terminated".to_string()
    } else if input.starts_with('\'') {
        "rune literal not terminated".to_string()
    } else {
        let c = input.chars().next().unwrap_or_default();
        format!("invalid character U+{:04X} '{c}'", c as u32)
    };
    SyntaxError::new(at.line, at.column, message)
}

/// Whether a line break after a token of this kind ends the statement.
fn inserts_semicolon(kind: TokenKind, text: &str) -> bool {
    match kind {
        TokenKind::Ident
        | TokenKind::Int
        | TokenKind::Float
        | TokenKind::Imag
        | TokenKind::Char
        | TokenKind::String => true,
        TokenKind::Keyword => matches!(text, "break" | "continue" | "fallthrough" | "return"),
        TokenKind::Punct => matches!(text, "++" | "--" | ")" | "]" | "}"),
        TokenKind::Semicolon | TokenKind::Eof => false,
    }
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut input = source.strip_prefix('\u{FEFF}').unwrap_or(source);
    let mut pos = Position { line: 1, column: 1 };
    let mut tokens = Vec::new();
    let mut comments: Vec<Comment> = Vec::new();
    let mut insert_semi = false;
    // Line on which the previous significant token ended.
    let mut prev_line: Option<usize> = None;

    while !input.is_empty() {
        let (rest, lexeme) = lexeme(input).map_err(|_| lex_error(input, pos))?;
        let start = pos;
        pos.advance(&input[..input.len() - rest.len()]);
        input = rest;

        match lexeme {
            Lexeme::Newline => {
                if insert_semi {
                    tokens.push(implicit_semicolon(start));
                    insert_semi = false;
                }
            }
            Lexeme::Space => {}
            Lexeme::Comment(text) => {
                if pos.line > start.line && insert_semi {
                    tokens.push(implicit_semicolon(start));
                    insert_semi = false;
                }
                comments.push(Comment {
                    text: text.to_string(),
                    start_line: start.line,
                    end_line: pos.line,
                });
            }
            Lexeme::Token(kind, text) => {
                let doc = lead_comment(&comments, prev_line, start.line);
                comments.clear();
                insert_semi = inserts_semicolon(kind, text);
                prev_line = Some(pos.line);
                tokens.push(Token {
                    kind,
                    text: text.to_string(),
                    line: start.line,
                    column: start.column,
                    doc,
                });
            }
        }
    }

    if insert_semi {
        tokens.push(implicit_semicolon(pos));
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        text: String::new(),
        line: pos.line,
        column: pos.column,
        doc: None,
    });
    Ok(tokens)
}

fn implicit_semicolon(at: Position) -> Token {
    Token {
        kind: TokenKind::Semicolon,
        text: "\n".to_string(),
        line: at.line,
        column: at.column,
        doc: None,
    }
}

/// The comment group ending on the line right before `line`, if any.
///
/// Comments on the same line as the previous token trail that token and are
/// never a lead comment.
fn lead_comment(comments: &[Comment], prev_line: Option<usize>, line: usize) -> Option<String> {
    let trailing = prev_line.map_or(0, |prev| {
        comments.iter().take_while(|c| c.start_line == prev).count()
    });
    let rest = &comments[trailing..];

    let mut group_start = 0;
    for i in 1..rest.len() {
        if rest[i].start_line > rest[i - 1].end_line + 1 {
            group_start = i;
        }
    }
    let group = &rest[group_start..];
    let last = group.last()?;
    if last.end_line + 1 != line {
        return None;
    }
    let text = comment_text(group);
    (!text.is_empty()).then_some(text)
}

/// Text of a comment group with the comment markers removed.
///
/// Mirrors Go's `CommentGroup.Text`: the first space of a line comment is
/// dropped, directives such as `//go:generate` are skipped, trailing space is
/// trimmed, leading and trailing blank lines are removed and runs of blank
/// lines collapse into one. Non-empty results end with a newline.
fn comment_text(comments: &[Comment]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for comment in comments {
        if let Some(body) = comment.text.strip_prefix("//") {
            let body = match body.strip_prefix(' ') {
                Some(rest) => rest,
                None if is_directive(body) => continue,
                None => body,
            };
            lines.push(body.trim_end().to_string());
        } else if let Some(body) = comment
            .text
            .strip_prefix("/*")
            .and_then(|b| b.strip_suffix("*/"))
        {
            lines.extend(body.split('\n').map(|l| l.trim_end().to_string()));
        }
    }

    let mut out: Vec<String> = Vec::new();
    for line in lines {
        let blank = line.is_empty();
        if blank && out.last().is_none_or(String::is_empty) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(String::is_empty) {
        out.pop();
    }

    if out.is_empty() {
        String::new()
    } else {
        out.join("\n") + "\n"
    }
}

fn is_directive(body: &str) -> bool {
    if ["line ", "extern ", "export "]
        .iter()
        .any(|prefix| body.starts_with(prefix))
    {
        return true;
    }
    let Some(colon) = body.find(':') else {
        return false;
    };
    let is_word = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    colon > 0
        && body[..colon].bytes().all(is_word)
        && body.as_bytes().get(colon + 1).copied().is_some_and(is_word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_inserts_semicolons_at_line_ends() {
        let tokens = kinds("package models\n\ntype ID int64\n");
        let texts: Vec<_> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(
            texts,
            vec!["package", "models", "\n", "type", "ID", "int64", "\n", ""]
        );
        assert_eq!(tokens[2].0, TokenKind::Semicolon);
        assert_eq!(tokens.last().unwrap().0, TokenKind::Eof);
    }

    #[test]
    fn test_no_semicolon_after_open_brace() {
        let tokens = kinds("struct {\n}");
        let texts: Vec<_> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["struct", "{", "}", "\n", ""]);
    }

    #[test]
    fn test_literals() {
        let tokens = kinds(r#"x 0x1F 1.5e-3 2i 'a' "s\"q" `raw`"#);
        let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Imag,
                TokenKind::Char,
                TokenKind::String,
                TokenKind::String,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[5].1, r#""s\"q""#);
    }

    #[test]
    fn test_longest_operator_wins() {
        let tokens = kinds("a &^= <-b ...");
        let texts: Vec<_> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["a", "&^=", "<-", "b", "...", ""]);
    }

    #[test]
    fn test_lead_comment_attaches_to_next_line() {
        let tokens = tokenize("// User is a user.\n// Second line.\ntype User struct{}").unwrap();
        assert_eq!(
            tokens[0].doc.as_deref(),
            Some("User is a user.\nSecond line.\n")
        );
    }

    #[test]
    fn test_detached_comment_is_not_doc() {
        let tokens = tokenize("// detached\n\ntype User struct{}").unwrap();
        assert_eq!(tokens[0].doc, None);
    }

    #[test]
    fn test_trailing_comment_is_not_doc() {
        let tokens = tokenize("a int // trailing\nb int").unwrap();
        let b = tokens.iter().find(|t| t.text == "b").unwrap();
        assert_eq!(b.doc, None);
    }

    #[test]
    fn test_block_comment_doc() {
        let tokens = tokenize("/*\n  Block doc\n*/\ntype T struct{}").unwrap();
        assert_eq!(tokens[0].doc.as_deref(), Some("  Block doc\n"));
    }

    #[test]
    fn test_directives_are_dropped() {
        let tokens = tokenize("//go:generate stringer\n// Doc.\ntype T int").unwrap();
        assert_eq!(tokens[0].doc.as_deref(), Some("Doc.\n"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("x := \"abc\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 6);
        assert_eq!(err.message, "string literal not terminated");
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("/* open").unwrap_err();
        assert_eq!(err.message, "comment not terminated");
    }

    #[test]
    fn test_invalid_character() {
        let err = tokenize("type @ struct{}").unwrap_err();
        assert_eq!(err.column, 6);
        assert!(err.message.starts_with("invalid character U+0040"));
    }

    #[test]
    fn test_rune_errors() {
        let err = tokenize("r := ''").unwrap_err();
        assert_eq!(err.column, 6);
        assert_eq!(err.message, "empty rune literal or unescaped ' in rune literal");

        let err = tokenize("r := 'a\n").unwrap_err();
        assert_eq!(err.message, "rune literal not terminated");

        let err = tokenize("s := `open").unwrap_err();
        assert_eq!(err.message, "raw string literal not terminated");
    }

    #[test]
    fn test_number_forms() {
        let tokens = kinds("0b1010 0o17 0x1p-2 .5 1_000 3.");
        let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Int,
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[4].1, "1_000");
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let tokens = tokenize("\u{FEFF}// Doc.\npackage models\n").unwrap();
        assert_eq!(tokens[0].text, "package");
        assert_eq!((tokens[0].line, tokens[0].column), (2, 1));
        assert_eq!(tokens[0].doc.as_deref(), Some("Doc.\n"));
    }

    #[test]
    fn test_multiline_raw_string_positions() {
        let tokens = tokenize("x `a\nb`\ny").unwrap();
        let y = tokens.iter().find(|t| t.text == "y").unwrap();
        assert_eq!((y.line, y.column), (3, 1));
        assert_eq!(tokens[2].text, "\n");
    }
}
