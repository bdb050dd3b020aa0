//! A small text template engine.
//!
//! Supports the subset of Go's `text/template` syntax that layer templates
//! need:
//!
//! - `{{.Name}}`, `{{.A.B}}`, `{{.}}`, `{{$}}` and `{{$.Name}}`
//! - string literals: `{{"text"}}`
//! - helper calls: `{{toLower .Name}}` and pipes: `{{.Name | toLower}}`
//! - `{{if ...}}` / `{{else}}` / `{{end}}`
//! - `{{range ...}}` / `{{else}}` / `{{end}}`
//! - trim markers `{{- ` and ` -}}`, comments `{{/* ... */}}`
//!
//! Data is bound through its serde serialization, so any `Serialize` value
//! can be rendered.

mod exec;
mod funcs;
mod parse;

pub use funcs::{FuncMap, Helper};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template: {name}:{line}: {message}")]
    Parse {
        name: String,
        line: usize,
        message: String,
    },
    #[error("template: {name}:{line}: executing: {message}")]
    Exec {
        name: String,
        line: usize,
        message: String,
    },
}

/// A compiled template.
///
/// ```
/// use layergen_codegen::template::{FuncMap, Template};
/// use serde_json::json;
///
/// let tpl = Template::compile("greet", "hi {{.Name | toLower}}", &FuncMap::default()).unwrap();
/// assert_eq!(tpl.render(&json!({"Name": "Ann"})).unwrap(), "hi ann");
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<parse::Node>,
    funcs: FuncMap,
}

impl Template {
    /// Parse `text`. Helper names are resolved against `funcs` here, so an
    /// unknown helper is a compile error rather than a render error.
    pub fn compile(
        name: impl Into<String>,
        text: &str,
        funcs: &FuncMap,
    ) -> Result<Self, TemplateError> {
        let name = name.into();
        let nodes = parse::parse(&name, text, funcs)?;
        Ok(Self {
            name,
            nodes,
            funcs: funcs.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render<T: Serialize + ?Sized>(&self, data: &T) -> Result<String, TemplateError> {
        let value = serde_json::to_value(data).map_err(|err| TemplateError::Exec {
            name: self.name.clone(),
            line: 0,
            message: err.to_string(),
        })?;
        self.render_value(&value)
    }

    pub fn render_value(&self, data: &Value) -> Result<String, TemplateError> {
        exec::Exec::new(&self.name, &self.funcs, data).run(&self.nodes)
    }
}
