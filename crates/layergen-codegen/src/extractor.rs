//! Model extraction from Go source files.
//!
//! Walks a model directory, parses every Go file and collects the struct type
//! declarations it finds into [`Struct`] values.

use crate::error::{Error, Result};
use crate::syntax::{self, FieldDecl, TypeNode, TypeSpec};
use crate::tags;
use crate::types::{Field, Struct};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Source file extension recognized by default.
pub const DEFAULT_EXTENSION: &str = "go";

/// Tag key the serialization name is read from by default.
pub const DEFAULT_TAG_KEY: &str = "json";

/// Extracts struct models from a directory of source files.
#[derive(Debug, Clone)]
pub struct ModelExtractor {
    extension: String,
    tag_key: String,
}

impl Default for ModelExtractor {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            tag_key: DEFAULT_TAG_KEY.to_string(),
        }
    }
}

impl ModelExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only files with this extension (without the dot) are parsed.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Tag key used to derive [`Field::serialization_name`].
    pub fn with_tag_key(mut self, tag_key: impl Into<String>) -> Self {
        self.tag_key = tag_key.into();
        self
    }

    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    /// Recursively extract every struct declared under `dir`.
    ///
    /// Files are visited in file-name order; structs keep their in-file
    /// declaration order. The first unreadable or unparsable file aborts the
    /// walk.
    ///
    /// ```rust,ignore
    /// let structs = ModelExtractor::new().extract_dir("internal/repository/model")?;
    /// ```
    pub fn extract_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<Struct>> {
        let dir = dir.as_ref();
        let mut structs = Vec::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(dir).to_path_buf();
                Error::Traversal {
                    path,
                    source: io::Error::from(err),
                }
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_source(path) {
                continue;
            }

            let source = fs::read_to_string(path).map_err(|source| Error::Traversal {
                path: path.to_path_buf(),
                source,
            })?;
            let found = self.extract_source(path, &source)?;
            tracing::debug!(path = %path.display(), structs = found.len(), "parsed model file");
            structs.extend(found);
        }

        tracing::info!(dir = %dir.display(), structs = structs.len(), "extracted model");
        Ok(structs)
    }

    /// Extract the structs declared in one file's contents. `path` is only
    /// used for error reporting.
    pub fn extract_source(&self, path: impl AsRef<Path>, source: &str) -> Result<Vec<Struct>> {
        let file = syntax::parse_file(source).map_err(|source| Error::Parse {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        Ok(file
            .types
            .into_iter()
            .filter_map(|spec| self.struct_from_spec(spec))
            .collect())
    }

    fn is_source(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == self.extension.as_str())
    }

    fn struct_from_spec(&self, spec: TypeSpec) -> Option<Struct> {
        if spec.alias {
            return None;
        }
        let TypeNode::Struct(st) = spec.ty else {
            return None;
        };

        let fields = st
            .fields
            .into_iter()
            .filter(|decl| !decl.is_embedded())
            .flat_map(|decl| self.fields_from_decl(decl))
            .collect();

        Some(Struct {
            name: spec.name,
            fields,
            comment: spec.doc,
        })
    }

    /// One [`Field`] per declared name; `X, Y int` yields two.
    fn fields_from_decl(&self, decl: FieldDecl) -> Vec<Field> {
        let type_signature = decl.ty.signature();
        let serialization_name = decl
            .tag
            .as_deref()
            .and_then(|tag| tags::serialization_name(tag, &self.tag_key));

        decl.names
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(|name| Field {
                name,
                type_signature: type_signature.clone(),
                raw_tag: decl.tag.clone(),
                comment: decl.doc.clone(),
                serialization_name: serialization_name.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Vec<Struct> {
        ModelExtractor::new()
            .extract_source("model.go", source)
            .unwrap()
    }

    #[test]
    fn test_extract_simple_struct() {
        let structs = extract(
            r#"
package model

// User is an account.
type User struct {
    ID   int64
    // Name is shown in the UI.
    Name string `json:"name" gorm:"size:64"`
}
"#,
        );

        assert_eq!(structs.len(), 1);
        let user = &structs[0];
        assert_eq!(user.name, "User");
        assert_eq!(user.comment.as_deref(), Some("User is an account.\n"));
        assert_eq!(user.fields.len(), 2);

        let id = user.field("ID").unwrap();
        assert_eq!(id.type_signature, "int64");
        assert_eq!(id.raw_tag, None);
        assert_eq!(id.serialization_name, None);

        let name = user.field("Name").unwrap();
        assert_eq!(name.type_signature, "string");
        assert_eq!(name.raw_tag.as_deref(), Some(r#"`json:"name" gorm:"size:64"`"#));
        assert_eq!(name.comment.as_deref(), Some("Name is shown in the UI.\n"));
        assert_eq!(name.serialization_name.as_deref(), Some("name"));
    }

    #[test]
    fn test_field_type_signatures() {
        let structs = extract(
            r#"
package model

import "time"

type Order struct {
    Owner    *User
    Items    []*Item
    Created  time.Time
    Grid     [4]int
    Meta     map[string]string
    Callback func() error
}
"#,
        );
        let sigs: Vec<&str> = structs[0]
            .fields
            .iter()
            .map(|f| f.type_signature.as_str())
            .collect();
        assert_eq!(
            sigs,
            [
                "*User",
                "[]*Item",
                "time.Time",
                "[]int",
                "<MapType>",
                "<FuncType>"
            ]
        );
    }

    #[test]
    fn test_embedded_fields_are_dropped() {
        let structs = extract(
            r#"
package model

type Audited struct {
    gorm.Model
    *Base
    Note string
}
"#,
        );
        let names: Vec<&str> = structs[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Note"]);
    }

    #[test]
    fn test_multi_name_fields_expand() {
        let structs = extract(
            r#"
package model

type Point struct {
    X, Y float64 `json:"coord"`
}
"#,
        );
        let fields = &structs[0].fields;
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "X");
        assert_eq!(fields[1].name, "Y");
        assert!(fields.iter().all(|f| f.type_signature == "float64"));
        assert!(
            fields
                .iter()
                .all(|f| f.serialization_name.as_deref() == Some("coord"))
        );
    }

    #[test]
    fn test_non_structs_are_ignored() {
        let structs = extract(
            r#"
package model

type (
    ID      int64
    Alias = User
    Reader  interface{ Read() }
    User    struct{ ID ID }
)

func helper() {
    type local struct{ n int }
}
"#,
        );
        let names: Vec<&str> = structs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["User", "local"]);
    }

    #[test]
    fn test_custom_tag_key() {
        let source = r#"
package model

type User struct {
    Name string `json:"name" yaml:"user_name"`
}
"#;
        let structs = ModelExtractor::new()
            .with_tag_key("yaml")
            .extract_source("model.go", source)
            .unwrap();
        assert_eq!(
            structs[0].fields[0].serialization_name.as_deref(),
            Some("user_name")
        );
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = ModelExtractor::new()
            .extract_source("broken.go", "package model\n\ntype User struct {\n")
            .unwrap_err();
        match &err {
            Error::Parse { path, .. } => assert_eq!(path, Path::new("broken.go")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("broken.go"));
    }

    #[test]
    fn test_malformed_function_body_is_a_parse_error() {
        let source = "package model\n\ntype User struct{ ID int64 }\n\nfunc f() {\n    x := := 1\n}\n";
        let err = ModelExtractor::new()
            .extract_source("user.go", source)
            .unwrap_err();
        match &err {
            Error::Parse { source, .. } => {
                assert_eq!(source.line, 6);
                assert_eq!(source.message, "expected operand, found ':='");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_byte_order_mark() {
        let structs = extract("\u{FEFF}package model\n\ntype User struct{ ID int64 }\n");
        assert_eq!(structs.len(), 1);
        assert_eq!(structs[0].name, "User");
    }

    #[test]
    fn test_builder_settings() {
        let extractor = ModelExtractor::new();
        assert_eq!(extractor.tag_key(), DEFAULT_TAG_KEY);
        let extractor = extractor.with_tag_key("yaml");
        assert_eq!(extractor.tag_key(), "yaml");
    }

    #[test]
    fn test_custom_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("user.go"), "package model\ntype User struct{}\n").unwrap();
        fs::write(dir.path().join("order.gox"), "package model\ntype Order struct{}\n").unwrap();

        let names = |extractor: ModelExtractor| -> Vec<String> {
            extractor
                .extract_dir(dir.path())
                .unwrap()
                .into_iter()
                .map(|s| s.name)
                .collect()
        };
        assert_eq!(names(ModelExtractor::new()), ["User"]);
        assert_eq!(names(ModelExtractor::new().with_extension("gox")), ["Order"]);
    }
}
