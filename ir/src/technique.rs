//! Technique document types
//!
//! These mirror the atomic-test YAML layout:
//!
//! ```yaml
//! attack_technique: T1057
//! display_name: Process Discovery
//! atomic_tests:
//! - name: Process Discovery - ps
//!   supported_platforms: [linux, macos]
//!   input_arguments:
//!     output_file:
//!       description: path of output file
//!       type: path
//!       default: /tmp/loot.txt
//!   executor:
//!     name: sh
//!     command: "ps >> #{output_file}"
//!     cleanup_command: "rm #{output_file}"
//! ```
//!
//! Fields the pipeline never reads (guids, dependencies, ...) are ignored on load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Top-level key holding the list of tests
pub const TESTS: &str = "atomic_tests";
/// Key holding a test's platform list
pub const PLATFORMS: &str = "supported_platforms";
/// Key holding a test's argument map
pub const ARGUMENTS: &str = "input_arguments";
/// Argument attribute consumed by the pipeline
pub const ARG_KEY: &str = "default";
/// Key holding a test's executor
pub const EXECUTOR: &str = "executor";

/// A technique: an identifier plus its atomic tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technique {
    /// Declared technique identifier (e.g. T1057)
    pub attack_technique: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub atomic_tests: Vec<AtomicTest>,
}

impl Technique {
    /// Find a test by name
    pub fn test(&self, name: &str) -> Option<&AtomicTest> {
        self.atomic_tests.iter().find(|t| t.name == name)
    }
}

/// Sparse override document. Only fields present are applied to the base technique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomTechnique {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_technique: Option<String>,

    #[serde(default)]
    pub atomic_tests: Vec<AtomicTest>,
}

/// One executable procedure within a technique
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtomicTest {
    /// Test name, unique within its technique
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_platforms: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_arguments: Option<Arguments>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<Executor>,
}

/// Argument name -> argument attributes
pub type Arguments = BTreeMap<String, Argument>;

/// A named test argument: a free-form attribute map (description, type, default, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Argument {
    pub attributes: BTreeMap<String, Value>,
}

impl Argument {
    /// Argument with only a default value
    pub fn with_default(value: impl Into<Value>) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(ARG_KEY.to_string(), value.into());
        Self { attributes }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.get(ARG_KEY)
    }

    pub fn set_default(&mut self, value: Value) {
        self.attributes.insert(ARG_KEY.to_string(), value);
    }
}

/// How a test is run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Executor {
    /// Generic command runner name (sh, bash, powershell, command_prompt, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_required: Option<bool>,
}
