//! Renders one layer's template for a struct and writes the result.

use crate::error::{Error, Result};
use crate::registry::ArtifactKind;
use crate::template::{FuncMap, Template, TemplateError};
use crate::types::Struct;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Generates one layer's file for each struct it is given.
///
/// The template is compiled once, when the generator is created. A template
/// that fails to compile does not fail construction; instead every
/// [`generate`](Self::generate) call reports the same compilation error with
/// that call's struct name.
#[derive(Debug)]
pub struct LayerGenerator {
    kind: ArtifactKind,
    output_root: PathBuf,
    template: std::result::Result<Template, TemplateError>,
}

impl LayerGenerator {
    pub fn new(kind: ArtifactKind, output_root: impl Into<PathBuf>, funcs: &FuncMap) -> Self {
        let template = Template::compile(kind.name.as_str(), &kind.template, funcs);
        if let Err(err) = &template {
            tracing::warn!(layer = %kind.name, error = %err, "template failed to compile");
        }
        Self {
            kind,
            output_root: output_root.into(),
            template,
        }
    }

    pub fn kind(&self) -> &ArtifactKind {
        &self.kind
    }

    /// Directory this generator writes into.
    pub fn output_dir(&self) -> PathBuf {
        self.kind.output_dir(&self.output_root)
    }

    /// Where the file for `st` goes.
    pub fn output_path(&self, st: &Struct) -> PathBuf {
        self.kind.output_path(&self.output_root, &st.lower_name())
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_dir(&self, st: &Struct) -> Result<()> {
        let dir = self.output_dir();
        fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreation {
            layer: self.kind.name.clone(),
            struct_name: st.name.clone(),
            path: dir,
            source,
        })
    }

    /// Render the template for `st` and write it, replacing any existing
    /// file. Returns the path written.
    ///
    /// Nothing is written when rendering fails.
    pub fn generate(&self, st: &Struct) -> Result<PathBuf> {
        let template = self
            .template
            .as_ref()
            .map_err(|err| Error::TemplateCompilation {
                layer: self.kind.name.clone(),
                struct_name: st.name.clone(),
                source: err.clone(),
            })?;

        let rendered = template
            .render(st)
            .map_err(|source| Error::TemplateExecution {
                layer: self.kind.name.clone(),
                struct_name: st.name.clone(),
                source,
            })?;

        let path = self.output_path(st);
        self.write(st, &path, rendered.as_bytes())?;
        tracing::debug!(layer = %self.kind.name, name = %st.name, path = %path.display(), "wrote file");
        Ok(path)
    }

    fn write(&self, st: &Struct, path: &Path, contents: &[u8]) -> Result<()> {
        let mut file = File::create(path).map_err(|source| Error::FileCreation {
            layer: self.kind.name.clone(),
            struct_name: st.name.clone(),
            path: path.to_path_buf(),
            source,
        })?;
        file.write_all(contents).map_err(|source| Error::FileWrite {
            layer: self.kind.name.clone(),
            struct_name: st.name.clone(),
            path: path.to_path_buf(),
            source,
        })
    }
}
