//! Template text → node tree.
//!
//! Scanning splits the text into literal runs, `{{ ... }}` actions and
//! comments; the contents of each action are then parsed into a pipeline.
//! Both steps are nom parsers.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_until, take_while, take_while1};
use nom::character::complete::{char, multispace0, multispace1};
use nom::combinator::{all_consuming, cut, map, not, opt, peek, recognize, rest};
use nom::multi::{many0_count, many1, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::{IResult, Parser};

use super::TemplateError;
use super::funcs::FuncMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Text(String),
    Action(Pipeline),
    If {
        cond: Pipeline,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    Range {
        over: Pipeline,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

/// Commands joined by `|`; each command's result is passed as the last
/// argument of the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pipeline {
    pub line: usize,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Command {
    pub args: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operand {
    /// `.`
    Dot,
    /// `.A.B`
    Field(Vec<String>),
    /// `$` or `$.A.B`
    Root(Vec<String>),
    /// `"text"`
    Str(String),
    /// helper name
    Func(String),
}

enum Item<'a> {
    Text(String),
    Action { body: &'a str, line: usize },
}

/// Why a node list stopped.
enum Stop {
    Eof,
    Else(usize),
    End(usize),
}

pub(crate) fn parse(name: &str, text: &str, funcs: &FuncMap) -> Result<Vec<Node>, TemplateError> {
    let items = scan(name, text)?;
    let mut parser = TreeParser {
        name,
        funcs,
        items: items.into_iter(),
    };
    let (nodes, stop) = parser.nodes()?;
    match stop {
        Stop::Eof => Ok(nodes),
        Stop::Else(line) => Err(parser.error(line, "unexpected {{else}}")),
        Stop::End(line) => Err(parser.error(line, "unexpected {{end}}")),
    }
}

fn line_at(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

/// One `{{ ... }}` with its trim markers. `body` is `None` for a comment.
struct Action<'a> {
    trim_left: bool,
    body: Option<&'a str>,
    trim_right: bool,
}

/// Text up to the next `{{`, or all of it.
fn literal_text(input: &str) -> IResult<&str, &str> {
    alt((take_until("{{"), rest)).parse(input)
}

fn action(input: &str) -> IResult<&str, Action<'_>> {
    let (input, _) = tag("{{").parse(input)?;
    // `{{- ` trims, `{{-3}}` does not.
    let (input, trim_left) = map(
        opt(terminated(char('-'), peek(multispace1))),
        |m: Option<char>| m.is_some(),
    )
    .parse(input)?;
    alt((
        map(comment, |trim_right| Action {
            trim_left,
            body: None,
            trim_right,
        }),
        map(action_body, |(body, trim_right)| Action {
            trim_left,
            body: Some(body),
            trim_right,
        }),
    ))
    .parse(input)
}

/// `/* ... */` up to and including the closing braces. Quotes inside a
/// comment are not string delimiters.
fn comment(input: &str) -> IResult<&str, bool> {
    preceded(
        pair(multispace0, tag("/*")),
        cut(preceded(
            pair(take_until("*/"), tag("*/")),
            terminated(
                map(opt(preceded(multispace1, char('-'))), |m: Option<char>| m.is_some()),
                tag("}}"),
            ),
        )),
    )
    .parse(input)
}

/// Action contents up to and including the closing braces; a `}}` inside a
/// string literal does not close the action.
fn action_body(input: &str) -> IResult<&str, (&str, bool)> {
    let (input, body) = recognize(many0_count(alt((
        recognize((char('"'), take_while(|c: char| c != '"'), char('"'))),
        take_while1(|c: char| c != '"' && c != '}'),
        recognize(terminated(char('}'), not(char('}')))),
    ))))
    .parse(input)?;
    let (input, _) = tag("}}").parse(input)?;

    // ` -}}` trims the text that follows.
    let trimmed = body
        .strip_suffix('-')
        .filter(|b| b.ends_with(char::is_whitespace));
    Ok((input, (trimmed.unwrap_or(body), trimmed.is_some())))
}

/// Whether the unclosed action at the start of `input` is a comment.
fn opens_comment(input: &str) -> bool {
    let inner = input.strip_prefix("{{").unwrap_or(input);
    let inner = inner.strip_prefix('-').unwrap_or(inner);
    inner.trim_start().starts_with("/*")
}

fn scan<'a>(name: &str, text: &'a str) -> Result<Vec<Item<'a>>, TemplateError> {
    let mut items = Vec::new();
    let mut input = text;
    let mut trim_next = false;

    loop {
        let (after_text, mut literal) = literal_text(input).unwrap_or(("", input));
        if trim_next {
            literal = literal.trim_start();
        }
        if after_text.is_empty() {
            if !literal.is_empty() {
                items.push(Item::Text(literal.to_string()));
            }
            return Ok(items);
        }

        let line = line_at(text, text.len() - after_text.len());
        let (after_action, action) = action(after_text).map_err(|_| {
            let what = if opens_comment(after_text) {
                "comment"
            } else {
                "action"
            };
            TemplateError::Parse {
                name: name.to_string(),
                line,
                message: format!("unclosed {what}"),
            }
        })?;

        if action.trim_left {
            literal = literal.trim_end();
        }
        if !literal.is_empty() {
            items.push(Item::Text(literal.to_string()));
        }
        if let Some(body) = action.body {
            items.push(Item::Action {
                body: body.trim(),
                line,
            });
        }
        trim_next = action.trim_right;
        input = after_action;
    }
}

struct TreeParser<'a, I> {
    name: &'a str,
    funcs: &'a FuncMap,
    items: I,
}

impl<'a, I> TreeParser<'a, I>
where
    I: Iterator<Item = Item<'a>>,
{
    fn error(&self, line: usize, message: impl Into<String>) -> TemplateError {
        TemplateError::Parse {
            name: self.name.to_string(),
            line,
            message: message.into(),
        }
    }

    fn nodes(&mut self) -> Result<(Vec<Node>, Stop), TemplateError> {
        let mut nodes = Vec::new();
        while let Some(item) = self.items.next() {
            let (body, line) = match item {
                Item::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Item::Action { body, line } => (body, line),
            };

            if body == "end" {
                return Ok((nodes, Stop::End(line)));
            }
            if body == "else" {
                return Ok((nodes, Stop::Else(line)));
            }
            if let Some(cond) = keyword_arg(body, "if") {
                let cond = self.pipeline(cond, line)?;
                let (then, otherwise) = self.branches("if", line)?;
                nodes.push(Node::If {
                    cond,
                    then,
                    otherwise,
                });
            } else if let Some(over) = keyword_arg(body, "range") {
                let over = self.pipeline(over, line)?;
                let (body, otherwise) = self.branches("range", line)?;
                nodes.push(Node::Range {
                    over,
                    body,
                    otherwise,
                });
            } else {
                nodes.push(Node::Action(self.pipeline(body, line)?));
            }
        }
        Ok((nodes, Stop::Eof))
    }

    /// Body of an `if`/`range` up to its `{{end}}`, split at `{{else}}`.
    fn branches(
        &mut self,
        keyword: &str,
        line: usize,
    ) -> Result<(Vec<Node>, Vec<Node>), TemplateError> {
        let (then, stop) = self.nodes()?;
        match stop {
            Stop::End(_) => Ok((then, Vec::new())),
            Stop::Else(_) => {
                let (otherwise, stop) = self.nodes()?;
                match stop {
                    Stop::End(_) => Ok((then, otherwise)),
                    Stop::Else(line) => Err(self.error(line, "unexpected {{else}}")),
                    Stop::Eof => Err(self.error(line, format!("unclosed {{{{{keyword}}}}}"))),
                }
            }
            Stop::Eof => Err(self.error(line, format!("unclosed {{{{{keyword}}}}}"))),
        }
    }

    fn pipeline(&self, body: &str, line: usize) -> Result<Pipeline, TemplateError> {
        if body.is_empty() {
            return Err(self.error(line, "missing value for command"));
        }
        let (_, commands) = all_consuming(delimited(multispace0, pipeline, multispace0))
            .parse(body)
            .map_err(|_| self.error(line, format!("malformed action {{{{{body}}}}}")))?;

        for (stage, command) in commands.iter().enumerate() {
            for (position, arg) in command.args.iter().enumerate() {
                if let Operand::Func(name) = arg {
                    if !self.funcs.contains(name) {
                        return Err(self.error(line, format!("function \"{name}\" not defined")));
                    }
                    if position > 0 {
                        return Err(
                            self.error(line, format!("function \"{name}\" used as an argument"))
                        );
                    }
                }
            }
            let callable = matches!(command.args.first(), Some(Operand::Func(_)));
            if !callable && stage > 0 {
                return Err(self.error(
                    line,
                    format!("non executable command in pipeline stage {}", stage + 1),
                ));
            }
            if !callable && command.args.len() > 1 {
                return Err(self.error(line, "can't give argument to non-function"));
            }
        }

        Ok(Pipeline { line, commands })
    }
}

/// `if .X` → `Some(".X")`
fn keyword_arg<'b>(body: &'b str, keyword: &str) -> Option<&'b str> {
    let rest = body.strip_prefix(keyword)?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn field_chain(input: &str) -> IResult<&str, Vec<String>> {
    many1(map(preceded(char('.'), identifier), String::from)).parse(input)
}

fn string_lit(input: &str) -> IResult<&str, Operand> {
    map(
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        |s: &str| Operand::Str(s.to_string()),
    )
    .parse(input)
}

fn operand(input: &str) -> IResult<&str, Operand> {
    alt((
        string_lit,
        map(preceded(char('$'), opt(field_chain)), |chain| {
            Operand::Root(chain.unwrap_or_default())
        }),
        map(field_chain, Operand::Field),
        map(char('.'), |_| Operand::Dot),
        map(identifier, |name| Operand::Func(name.to_string())),
    ))
    .parse(input)
}

fn command(input: &str) -> IResult<&str, Command> {
    map(separated_list1(multispace1, operand), |args| Command { args }).parse(input)
}

fn pipeline(input: &str) -> IResult<&str, Vec<Command>> {
    separated_list1(delimited(multispace0, char('|'), multispace0), command).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(text: &str) -> Vec<Node> {
        parse("t", text, &FuncMap::with_builtins()).unwrap()
    }

    fn parse_err(text: &str) -> TemplateError {
        parse("t", text, &FuncMap::with_builtins()).unwrap_err()
    }

    #[test]
    fn test_text_and_actions() {
        let nodes = parse_ok("type {{.Name}}Repository {{ .Name | toLower }}");
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0], Node::Text("type ".into()));
        let Node::Action(p) = &nodes[1] else {
            panic!("expected action");
        };
        assert_eq!(p.commands[0].args, vec![Operand::Field(vec!["Name".into()])]);
        let Node::Action(p) = &nodes[3] else {
            panic!("expected action");
        };
        assert_eq!(p.commands.len(), 2);
        assert_eq!(p.commands[1].args, vec![Operand::Func("toLower".into())]);
    }

    #[test]
    fn test_operands() {
        let nodes = parse_ok(r#"{{toLower $.Name}}{{.}}{{$}}{{"lit"}}{{.A.B}}"#);
        let args: Vec<_> = nodes
            .iter()
            .map(|n| match n {
                Node::Action(p) => p.commands[0].args.clone(),
                _ => panic!("expected action"),
            })
            .collect();
        assert_eq!(
            args[0],
            vec![
                Operand::Func("toLower".into()),
                Operand::Root(vec!["Name".into()])
            ]
        );
        assert_eq!(args[1], vec![Operand::Dot]);
        assert_eq!(args[2], vec![Operand::Root(vec![])]);
        assert_eq!(args[3], vec![Operand::Str("lit".into())]);
        assert_eq!(args[4], vec![Operand::Field(vec!["A".into(), "B".into()])]);
    }

    #[test]
    fn test_trim_markers() {
        let nodes = parse_ok("a  \n{{- .X -}}\n  b");
        assert_eq!(nodes[0], Node::Text("a".into()));
        assert_eq!(nodes[2], Node::Text("b".into()));
    }

    #[test]
    fn test_comments_are_dropped() {
        let nodes = parse_ok("a{{/* note */}}b");
        assert_eq!(nodes, vec![Node::Text("a".into()), Node::Text("b".into())]);
    }

    #[test]
    fn test_comment_may_contain_quotes() {
        let nodes = parse_ok("a{{/* say \"hi */}}b");
        assert_eq!(nodes, vec![Node::Text("a".into()), Node::Text("b".into())]);
    }

    #[test]
    fn test_trimmed_comment() {
        let nodes = parse_ok("a \n{{- /* note */ -}}\n b");
        assert_eq!(nodes, vec![Node::Text("a".into()), Node::Text("b".into())]);
    }

    #[test]
    fn test_unclosed_comment() {
        let err = parse_err("x\n{{/* open }}");
        assert_eq!(
            err,
            TemplateError::Parse {
                name: "t".into(),
                line: 2,
                message: "unclosed comment".into()
            }
        );
    }

    #[test]
    fn test_braces_inside_string_literal() {
        let nodes = parse_ok(r#"{{"}}" | toUpper}}}x"#);
        let Node::Action(p) = &nodes[0] else {
            panic!("expected action");
        };
        assert_eq!(p.commands[0].args, vec![Operand::Str("}}".into())]);
        assert_eq!(nodes[1], Node::Text("}x".into()));
    }

    #[test]
    fn test_control_structures() {
        let nodes = parse_ok("{{range .Fields}}{{if .JsonName}}x{{else}}y{{end}}{{else}}none{{end}}");
        let Node::Range {
            body, otherwise, ..
        } = &nodes[0]
        else {
            panic!("expected range");
        };
        assert_eq!(otherwise, &vec![Node::Text("none".into())]);
        assert!(matches!(&body[0], Node::If { then, otherwise, .. }
            if then == &vec![Node::Text("x".into())] && otherwise == &vec![Node::Text("y".into())]));
    }

    #[test]
    fn test_go_braces_are_text() {
        let nodes = parse_ok("func() map[string]interface{}{ return nil }");
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_unclosed_action() {
        let err = parse_err("line one\n{{.Name");
        assert_eq!(
            err,
            TemplateError::Parse {
                name: "t".into(),
                line: 2,
                message: "unclosed action".into()
            }
        );
    }

    #[test]
    fn test_unknown_function() {
        let err = parse_err("{{.Name | plural}}");
        assert!(err.to_string().contains("function \"plural\" not defined"));
    }

    #[test]
    fn test_unbalanced_blocks() {
        assert!(parse_err("{{end}}").to_string().contains("unexpected {{end}}"));
        assert!(parse_err("{{else}}").to_string().contains("unexpected {{else}}"));
        assert!(parse_err("{{if .X}}a").to_string().contains("unclosed {{if}}"));
        assert!(parse_err("{{range .X}}a{{else}}b").to_string().contains("unclosed {{range}}"));
    }

    #[test]
    fn test_malformed_commands() {
        assert!(parse_err("{{}}").to_string().contains("missing value for command"));
        assert!(parse_err("{{.A | .B}}").to_string().contains("non executable command"));
        assert!(parse_err("{{.A .B}}").to_string().contains("can't give argument"));
        assert!(parse_err("{{.A |}}").to_string().contains("malformed action"));
    }
}
