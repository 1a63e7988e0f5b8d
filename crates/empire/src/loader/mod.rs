//! Loading RDF documents and data source configuration from disk.

pub mod config_loader;
pub mod rdf_loader;

use thiserror::Error;

use crate::model::ModelError;

/// Errors that can occur during loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RDF parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("unknown RDF format: {0}")]
    UnknownFormat(String),

    #[error("malformed configuration line {line}: {content}")]
    MalformedLine { line: usize, content: String },
}
