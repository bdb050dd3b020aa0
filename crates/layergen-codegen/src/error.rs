use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::syntax::SyntaxError;
use crate::template::TemplateError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to walk model directory at {}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },
    #[error("failed to create {layer} directory {} for {struct_name}", path.display())]
    DirectoryCreation {
        layer: String,
        struct_name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create {layer} file {} for {struct_name}", path.display())]
    FileCreation {
        layer: String,
        struct_name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {layer} file {} for {struct_name}", path.display())]
    FileWrite {
        layer: String,
        struct_name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to compile {layer} template for {struct_name}")]
    TemplateCompilation {
        layer: String,
        struct_name: String,
        #[source]
        source: TemplateError,
    },
    #[error("failed to render {layer} template for {struct_name}")]
    TemplateExecution {
        layer: String,
        struct_name: String,
        #[source]
        source: TemplateError,
    },
    #[error("failed to load template override {}", path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
