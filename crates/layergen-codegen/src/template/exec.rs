use serde_json::Value;

use super::TemplateError;
use super::funcs::FuncMap;
use super::parse::{Command, Node, Operand, Pipeline};

/// Execution state for one render.
pub(crate) struct Exec<'a> {
    name: &'a str,
    funcs: &'a FuncMap,
    root: &'a Value,
    out: String,
}

impl<'a> Exec<'a> {
    pub fn new(name: &'a str, funcs: &'a FuncMap, root: &'a Value) -> Self {
        Self {
            name,
            funcs,
            root,
            out: String::new(),
        }
    }

    pub fn run(mut self, nodes: &[Node]) -> Result<String, TemplateError> {
        let root = self.root;
        self.walk(nodes, root)?;
        Ok(self.out)
    }

    fn error(&self, line: usize, message: impl Into<String>) -> TemplateError {
        TemplateError::Exec {
            name: self.name.to_string(),
            line,
            message: message.into(),
        }
    }

    fn walk(&mut self, nodes: &[Node], dot: &Value) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => self.out.push_str(text),
                Node::Action(pipeline) => {
                    let value = self.eval_pipeline(pipeline, dot)?;
                    print(&mut self.out, &value);
                }
                Node::If {
                    cond,
                    then,
                    otherwise,
                } => {
                    let value = self.eval_pipeline(cond, dot)?;
                    let branch = if truthy(&value) { then } else { otherwise };
                    self.walk(branch, dot)?;
                }
                Node::Range {
                    over,
                    body,
                    otherwise,
                } => {
                    let value = self.eval_pipeline(over, dot)?;
                    match &value {
                        Value::Array(items) if !items.is_empty() => {
                            for item in items {
                                self.walk(body, item)?;
                            }
                        }
                        Value::Object(entries) if !entries.is_empty() => {
                            for item in entries.values() {
                                self.walk(body, item)?;
                            }
                        }
                        Value::Array(_) | Value::Object(_) | Value::Null => {
                            self.walk(otherwise, dot)?;
                        }
                        other => {
                            return Err(self.error(
                                over.line,
                                format!("range can't iterate over {}", kind(other)),
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn eval_pipeline(&self, pipeline: &Pipeline, dot: &Value) -> Result<Value, TemplateError> {
        let mut piped = None;
        for command in &pipeline.commands {
            piped = Some(self.eval_command(command, dot, piped, pipeline.line)?);
        }
        Ok(piped.unwrap_or(Value::Null))
    }

    fn eval_command(
        &self,
        command: &Command,
        dot: &Value,
        piped: Option<Value>,
        line: usize,
    ) -> Result<Value, TemplateError> {
        let Some((first, rest)) = command.args.split_first() else {
            return Err(self.error(line, "empty command"));
        };
        let Operand::Func(name) = first else {
            return self.operand(first, dot, line);
        };

        let mut args = rest
            .iter()
            .map(|arg| self.operand(arg, dot, line))
            .collect::<Result<Vec<_>, _>>()?;
        args.extend(piped);
        self.call(name, &args, line)
    }

    fn operand(&self, operand: &Operand, dot: &Value, line: usize) -> Result<Value, TemplateError> {
        match operand {
            Operand::Dot => Ok(dot.clone()),
            Operand::Field(chain) => self.lookup(dot, chain, line),
            Operand::Root(chain) => self.lookup(self.root, chain, line),
            Operand::Str(text) => Ok(Value::String(text.clone())),
            Operand::Func(name) => Err(self.error(
                line,
                format!("function \"{name}\" used as an argument"),
            )),
        }
    }

    fn lookup(&self, start: &Value, chain: &[String], line: usize) -> Result<Value, TemplateError> {
        let mut current = start;
        for field in chain {
            current = match current {
                Value::Object(map) => map.get(field).ok_or_else(|| {
                    self.error(line, format!("can't evaluate field {field}"))
                })?,
                other => {
                    return Err(self.error(
                        line,
                        format!("can't evaluate field {field} in type {}", kind(other)),
                    ));
                }
            };
        }
        Ok(current.clone())
    }

    fn call(&self, name: &str, args: &[Value], line: usize) -> Result<Value, TemplateError> {
        let helper = self
            .funcs
            .get(name)
            .ok_or_else(|| self.error(line, format!("function \"{name}\" not defined")))?;
        let [arg] = args else {
            return Err(self.error(
                line,
                format!("wrong number of args for {name}: want 1 got {}", args.len()),
            ));
        };
        let Value::String(arg) = arg else {
            return Err(self.error(
                line,
                format!(
                    "error calling {name}: expected string; found {}",
                    kind(arg)
                ),
            ));
        };
        Ok(Value::String(helper(arg)))
    }
}

fn print(out: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!([])));
        assert!(truthy(&json!("x")));
        assert!(truthy(&json!(1.5)));
        assert!(truthy(&json!({"a": 1})));
    }

    #[test]
    fn test_print() {
        let mut out = String::new();
        print(&mut out, &json!(null));
        print(&mut out, &json!("raw"));
        print(&mut out, &json!(42));
        print(&mut out, &json!(true));
        assert_eq!(out, "raw42true");
    }
}
