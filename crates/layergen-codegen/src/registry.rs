//! The set of layers generated for every struct.

use indexmap::IndexMap;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

const REPOSITORY_TEMPLATE: &str = include_str!("../templates/repository.go.tmpl");
const SERVICE_TEMPLATE: &str = include_str!("../templates/service.go.tmpl");
const HANDLER_TEMPLATE: &str = include_str!("../templates/handler.go.tmpl");

/// One generated layer: where its files go and what they contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactKind {
    /// Layer name, also the file name suffix.
    pub name: String,
    /// Directory relative to the output root.
    pub directory: PathBuf,
    /// Output file extension, without the dot.
    pub extension: String,
    pub template: Cow<'static, str>,
}

impl ArtifactKind {
    pub fn new(
        name: impl Into<String>,
        directory: impl Into<PathBuf>,
        extension: impl Into<String>,
        template: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            extension: extension.into(),
            template: template.into(),
        }
    }

    /// `<lower_name>_<layer>.<ext>`, e.g. `user_repository.go`.
    pub fn file_name(&self, lower_name: &str) -> String {
        format!("{lower_name}_{}.{}", self.name, self.extension)
    }

    /// Directory this layer writes into under `output_root`.
    pub fn output_dir(&self, output_root: &Path) -> PathBuf {
        output_root.join(&self.directory)
    }

    pub fn output_path(&self, output_root: &Path, lower_name: &str) -> PathBuf {
        self.output_dir(output_root).join(self.file_name(lower_name))
    }
}

/// Ordered map of layer name to [`ArtifactKind`].
///
/// Generation visits layers in registration order.
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    layers: IndexMap<String, ArtifactKind>,
}

impl LayerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository, service and handler layers with the bundled templates.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register(ArtifactKind::new(
                "repository",
                "internal/repository",
                "go",
                REPOSITORY_TEMPLATE,
            ))
            .register(ArtifactKind::new(
                "service",
                "internal/service",
                "go",
                SERVICE_TEMPLATE,
            ))
            .register(ArtifactKind::new(
                "handler",
                "internal/handler",
                "go",
                HANDLER_TEMPLATE,
            ));
        registry
    }

    /// Add a layer. Re-registering an existing name replaces it in place.
    pub fn register(&mut self, kind: ArtifactKind) -> &mut Self {
        self.layers.insert(kind.name.clone(), kind);
        self
    }

    /// Remove a layer, keeping the order of the rest.
    pub fn unregister(&mut self, name: &str) -> Option<ArtifactKind> {
        self.layers.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&ArtifactKind> {
        self.layers.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ArtifactKind> {
        self.layers.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArtifactKind> {
        self.layers.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
