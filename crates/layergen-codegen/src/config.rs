use crate::error::{Error, Result};
use crate::extractor::{DEFAULT_EXTENSION, DEFAULT_TAG_KEY, ModelExtractor};
use crate::registry::LayerRegistry;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Settings for one generation run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing the model source files.
    pub model_path: PathBuf,
    /// Root the layer directories are created under.
    pub output_path: PathBuf,
    /// Directory of `<layer>.tmpl` files overriding the bundled templates.
    pub templates_dir: Option<PathBuf>,
    /// Tag key the serialization name is read from.
    pub tag_key: String,
    /// Extension (without the dot) of the files treated as model sources.
    pub extension: String,
}

impl Config {
    pub fn new(model_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            output_path: output_path.into(),
            templates_dir: None,
            tag_key: DEFAULT_TAG_KEY.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn extractor(&self) -> ModelExtractor {
        ModelExtractor::new()
            .with_extension(self.extension.as_str())
            .with_tag_key(self.tag_key.as_str())
    }

    /// The builtin layers, with templates replaced by any overrides found
    /// in [`templates_dir`](Self::templates_dir).
    pub fn layer_registry(&self) -> Result<LayerRegistry> {
        let mut registry = LayerRegistry::with_builtins();
        let Some(dir) = &self.templates_dir else {
            return Ok(registry);
        };
        if !dir.is_dir() {
            return Err(Error::TemplateLoad {
                path: dir.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            });
        }

        let names: Vec<String> = registry.names().map(str::to_string).collect();
        for name in names {
            let path = dir.join(format!("{name}.tmpl"));
            if !path.exists() {
                continue;
            }
            let text = fs::read_to_string(&path).map_err(|source| Error::TemplateLoad {
                path: path.clone(),
                source,
            })?;
            if let Some(kind) = registry.get_mut(&name) {
                tracing::debug!(layer = %name, path = %path.display(), "using template override");
                kind.template = text.into();
            }
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_bundled_templates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("service.tmpl"), "custom {{.Name}}").unwrap();
        fs::write(dir.path().join("unknown.tmpl"), "ignored").unwrap();

        let mut config = Config::new("model", "out");
        config.templates_dir = Some(dir.path().to_path_buf());
        let registry = config.layer_registry().unwrap();

        assert_eq!(registry.get("service").unwrap().template, "custom {{.Name}}");
        assert!(registry.get("repository").unwrap().template.contains("Repository"));
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_extractor_follows_config() {
        let mut config = Config::new("model", "out");
        config.tag_key = "yaml".to_string();
        config.extension = "gox".to_string();

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.go"), "package m\ntype A struct{}\n").unwrap();
        fs::write(
            dir.path().join("b.gox"),
            "package m\ntype B struct{ N int `yaml:\"n\"` }\n",
        )
        .unwrap();

        let extractor = config.extractor();
        assert_eq!(extractor.tag_key(), "yaml");
        let structs = extractor.extract_dir(dir.path()).unwrap();
        assert_eq!(structs.len(), 1);
        assert_eq!(structs[0].name, "B");
        assert_eq!(structs[0].fields[0].serialization_name.as_deref(), Some("n"));
    }

    #[test]
    fn test_missing_templates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new("model", "out");
        config.templates_dir = Some(dir.path().join("nope"));
        assert!(matches!(
            config.layer_registry(),
            Err(Error::TemplateLoad { .. })
        ));
    }
}
