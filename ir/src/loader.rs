//! Document loading and writing
//!
//! Whole-file read into a YAML document, and whole-file write of a serialized
//! document with an explicit `---` start marker.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use tracing::{debug, error};

use crate::error::PipelineError;
use crate::technique::{CustomTechnique, Technique};

/// Explicit YAML document start marker
const DOCUMENT_START: &str = "---\n";

fn read(path: &Path) -> Result<String, PipelineError> {
    fs::read_to_string(path).map_err(|source| {
        error!("IOError: {}", path.display());
        PipelineError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Load a YAML file as an untyped document
pub fn load_yaml(path: impl AsRef<Path>) -> Result<Value, PipelineError> {
    load_document(path)
}

/// Load a YAML file into a typed document
pub fn load_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, PipelineError> {
    let path = path.as_ref();
    debug!(?path, "load_document: called");
    let content = read(path)?;
    serde_yaml::from_str(&content).map_err(|source| PipelineError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_technique(path: impl AsRef<Path>) -> Result<Technique, PipelineError> {
    load_document(path)
}

pub fn load_custom_technique(path: impl AsRef<Path>) -> Result<CustomTechnique, PipelineError> {
    load_document(path)
}

/// Serialize a document as block-style YAML with an explicit document start
pub fn to_yaml_document<T: Serialize>(document: &T) -> Result<String, PipelineError> {
    let body = serde_yaml::to_string(document)?;
    Ok(format!("{}{}", DOCUMENT_START, body))
}

/// Write a document to `path`, creating the parent directory if needed
pub fn write_document<T: Serialize>(path: impl AsRef<Path>, document: &T) -> Result<(), PipelineError> {
    let path = path.as_ref();
    debug!(?path, "write_document: called");
    let content = to_yaml_document(document)?;

    let io_err = |source| {
        error!("IOError: {}", path.display());
        PipelineError::Io {
            path: path.to_path_buf(),
            source,
        }
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}
