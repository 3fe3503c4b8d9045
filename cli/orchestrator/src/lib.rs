#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Helpers behind the `protogen` command line.

use std::path::{Path, PathBuf};

use codegen::SkeletonEngine;
use config::Config;
use pipeline::Generator;
use schema::SchemaFile;
use thiserror::Error;

/// Errors that can occur during protogen operations.
#[derive(Debug, Error)]
pub enum CompilerError {
    /// The environment file could not be loaded.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// The generator stage failed.
    #[error(transparent)]
    Pipeline(#[from] pipeline::PipelineError),
    /// The schema description could not be read.
    #[error("Failed to load schema {path}: {message}")]
    Schema {
        /// Schema description path
        path: PathBuf,
        /// Loader message
        message: String,
    },
    /// JSON output could not be produced.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for protogen operations.
pub type Result<T> = std::result::Result<T, CompilerError>;

/// Load the environment file at `path`, or the default location when absent.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default()?,
    };
    Ok(config)
}

/// Load a JSON schema description.
pub fn load_schema(path: &Path) -> Result<SchemaFile> {
    SchemaFile::from_file(path)
        .map_err(|e| CompilerError::Schema { path: path.to_path_buf(), message: e.to_string() })
}

/// Generator for the runtime described by `config`.
pub fn generator_for(config: &Config) -> Generator<SkeletonEngine> {
    Generator::new(SkeletonEngine, config.runtime.clone())
}
