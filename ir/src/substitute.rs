//! Placeholder substitution
//!
//! Replaces `#{name}` markers in command strings with argument values.
//! A name with no value is replaced by nothing and reported with a warning.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::arguments::ArgumentValues;
use crate::error::PipelineError;
use crate::technique::AtomicTest;

/// Default placeholder pattern; group 1 is the argument name
pub const PATTERN: &str = r"#\{(.+?)\}";

static DEFAULT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PATTERN).expect("default placeholder pattern is valid"));

/// What to do when a placeholder names an argument that has no value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingArgumentPolicy {
    /// Warn and substitute an empty value
    #[default]
    Warn,
    /// Fail the substitution
    Error,
}

/// Result of substituting one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The substituted text
    pub text: String,
    /// Placeholder names that had no value, in order of appearance
    pub unresolved: Vec<String>,
}

impl Substitution {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Compiled placeholder substitutor
#[derive(Debug, Clone)]
pub struct Substitutor {
    pattern: Regex,
    policy: MissingArgumentPolicy,
}

impl Default for Substitutor {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
            policy: MissingArgumentPolicy::Warn,
        }
    }
}

impl Substitutor {
    /// Build a substitutor for a custom pattern. Capture group 1 must hold the name.
    pub fn new(pattern: &str) -> Result<Self, PipelineError> {
        debug!(%pattern, "Substitutor::new: called");
        Ok(Self {
            pattern: Regex::new(pattern)?,
            policy: MissingArgumentPolicy::Warn,
        })
    }

    pub fn with_policy(mut self, policy: MissingArgumentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MissingArgumentPolicy {
        self.policy
    }

    /// Replace every placeholder in `field` with its value from `values`
    pub fn substitute(&self, field: &str, values: &ArgumentValues) -> Substitution {
        let mut unresolved = Vec::new();
        let text = self
            .pattern
            .replace_all(field, |caps: &Captures| {
                let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                match values.get(name) {
                    Some(value) => render_value(value),
                    None => {
                        warn!(%name, "Warning: no match found for placeholder");
                        unresolved.push(name.to_string());
                        String::new()
                    }
                }
            })
            .into_owned();

        Substitution { text, unresolved }
    }

    /// Substitute according to the configured policy
    pub fn apply(&self, field: &str, values: &ArgumentValues) -> Result<String, PipelineError> {
        let substitution = self.substitute(field, values);
        match (self.policy, substitution.unresolved.first()) {
            (MissingArgumentPolicy::Error, Some(name)) => {
                Err(PipelineError::UnresolvedPlaceholder { name: name.clone() })
            }
            _ => Ok(substitution.text),
        }
    }

    /// Return `test` with its command and cleanup command substituted
    pub fn process_atomic(&self, mut test: AtomicTest, values: &ArgumentValues) -> Result<AtomicTest, PipelineError> {
        debug!(name = %test.name, "Substitutor::process_atomic: called");
        if let Some(executor) = test.executor.as_mut() {
            executor.command = executor
                .command
                .as_deref()
                .map(|command| self.apply(command, values))
                .transpose()?;
            executor.cleanup_command = executor
                .cleanup_command
                .as_deref()
                .map(|command| self.apply(command, values))
                .transpose()?;
        }
        Ok(test)
    }
}

/// Render an argument value as command text.
///
/// Sequences and mappings render in YAML flow style so the command stays on one line.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Sequence(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Mapping(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", render_value(k), render_value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Tagged(tagged) => render_value(&tagged.value),
    }
}
