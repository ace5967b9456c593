//! Pipeline error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while refining a technique
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("Missing field '{field}' in {context}")]
    MissingField { context: String, field: String },

    #[error("Test '{test}' has no argument '{argument}' to override")]
    UnknownArgument { test: String, argument: String },

    #[error("No value for placeholder '{name}'")]
    UnresolvedPlaceholder { name: String },

    #[error("Invalid placeholder pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl PipelineError {
    /// Build a missing-field error
    pub fn missing(context: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            context: context.into(),
            field: field.into(),
        }
    }

    /// Check if this is a filesystem failure (reading or writing a document)
    pub fn is_io(&self) -> bool {
        matches!(self, PipelineError::Io { .. })
    }
}
