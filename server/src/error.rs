//! @ai:module:intent Define host-boundary error types for the diagnostics server
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use crate::schema::SchemaType;
use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Failures at the edges (disk, settings, schema start-up); never raised for document content
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path cannot be expressed as a file URI: {0}")]
    InvalidPath(PathBuf),

    #[error("Invalid settings: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to compile {schema_type} schema: {message}")]
    SchemaCompile {
        schema_type: SchemaType,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
