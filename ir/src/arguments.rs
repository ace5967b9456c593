//! Argument indexing
//!
//! Projects one attribute out of every argument, e.g. the `default` values used
//! for placeholder substitution.

use std::collections::BTreeMap;

use serde_yaml::Value;
use tracing::debug;

use crate::error::PipelineError;
use crate::technique::Arguments;

/// Argument name -> value
pub type ArgumentValues = BTreeMap<String, Value>;

/// Build `name -> arguments[name][key]` for every argument.
///
/// Every argument must carry `key`; the first one that doesn't fails the call.
pub fn index_arguments(arguments: &Arguments, key: &str) -> Result<ArgumentValues, PipelineError> {
    debug!(%key, count = arguments.len(), "index_arguments: called");
    arguments
        .iter()
        .map(|(name, argument)| {
            argument
                .get(key)
                .cloned()
                .map(|value| (name.clone(), value))
                .ok_or_else(|| PipelineError::missing(format!("argument '{}'", name), key))
        })
        .collect()
}
