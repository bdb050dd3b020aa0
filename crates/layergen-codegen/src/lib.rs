//! # layergen-codegen
//!
//! Layer code generator for Go models. This crate reads the struct types
//! declared in a directory of Go source files and renders a set of templates
//! for each one, producing repository, service and handler files.
//!
//! ## Usage
//!
//! ### 1. Extract the model
//!
//! ```rust,ignore
//! use layergen_codegen::ModelExtractor;
//!
//! let structs = ModelExtractor::new().extract_dir("internal/repository/model")?;
//! ```
//!
//! ### 2. Generate the layers
//!
//! ```rust,ignore
//! use layergen_codegen::CodeGenerator;
//!
//! CodeGenerator::new(".").generate(&structs)?;
//! ```
//!
//! For a model type `User` this writes
//! `internal/repository/user_repository.go`, `internal/service/user_service.go`
//! and `internal/handler/user_handler.go`.
//!
//! Layers can be added, replaced or removed through [`LayerRegistry`], and the
//! templates are written in a subset of Go's `text/template` syntax, see
//! [`template`].

mod config;
mod error;
mod extractor;
mod generator;
mod pipeline;
mod types;

pub mod registry;
pub mod syntax;
pub mod tags;
pub mod template;

pub use config::Config;
pub use error::{Error, Result};
pub use extractor::{DEFAULT_EXTENSION, DEFAULT_TAG_KEY, ModelExtractor};
pub use generator::LayerGenerator;
pub use pipeline::{CodeGenerator, run};
pub use registry::{ArtifactKind, LayerRegistry};
pub use types::{ExprKind, Field, Struct, TypeExpr};
