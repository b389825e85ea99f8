//! @ai:module:intent Define error types for the ACP annotation parser
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Host-boundary failures; document content problems are diagnostics, never errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
}

pub type Result<T> = std::result::Result<T, Error>;
