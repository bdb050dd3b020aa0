//! Drives extraction and generation end to end.

use crate::config::Config;
use crate::error::Result;
use crate::generator::LayerGenerator;
use crate::registry::{ArtifactKind, LayerRegistry};
use crate::template::{FuncMap, Helper};
use crate::types::Struct;
use std::path::{Path, PathBuf};

/// Generates every registered layer for every struct.
///
/// # Example
///
/// ```rust,ignore
/// use layergen_codegen::{CodeGenerator, ModelExtractor};
///
/// let structs = ModelExtractor::new().extract_dir("internal/repository/model")?;
/// let written = CodeGenerator::new(".").generate(&structs)?;
/// ```
#[derive(Debug)]
pub struct CodeGenerator {
    output_root: PathBuf,
    registry: LayerRegistry,
    funcs: FuncMap,
}

impl CodeGenerator {
    /// A generator writing the builtin layers under `output_root`.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self::with_registry(output_root, LayerRegistry::with_builtins())
    }

    pub fn with_registry(output_root: impl Into<PathBuf>, registry: LayerRegistry) -> Self {
        Self {
            output_root: output_root.into(),
            registry,
            funcs: FuncMap::default(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    /// Add or replace a layer.
    pub fn register_layer(&mut self, kind: ArtifactKind) -> &mut Self {
        self.registry.register(kind);
        self
    }

    pub fn unregister_layer(&mut self, name: &str) -> &mut Self {
        self.registry.unregister(name);
        self
    }

    /// Make a helper available to every template.
    pub fn register_helper(&mut self, name: impl Into<String>, helper: Helper) -> &mut Self {
        self.funcs.insert(name, helper);
        self
    }

    /// Generate every layer for every struct, in order, and return the paths
    /// written.
    ///
    /// Stops at the first error. Files written before the failure are kept.
    pub fn generate(&self, structs: &[Struct]) -> Result<Vec<PathBuf>> {
        let generators: Vec<LayerGenerator> = self
            .registry
            .iter()
            .map(|kind| LayerGenerator::new(kind.clone(), &self.output_root, &self.funcs))
            .collect();

        let mut written = Vec::with_capacity(structs.len() * generators.len());
        for st in structs {
            for generator in &generators {
                generator.ensure_dir(st)?;
            }
            for generator in &generators {
                written.push(generator.generate(st)?);
            }
        }

        tracing::info!(
            structs = structs.len(),
            files = written.len(),
            output = %self.output_root.display(),
            "generation complete"
        );
        Ok(written)
    }
}

/// Extract the model described by `config` and generate all layers for it.
pub fn run(config: &Config) -> Result<Vec<PathBuf>> {
    let registry = config.layer_registry()?;
    let structs = config.extractor().extract_dir(&config.model_path)?;
    CodeGenerator::with_registry(&config.output_path, registry).generate(&structs)
}
