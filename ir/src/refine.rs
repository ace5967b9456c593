//! Technique refinement
//!
//! Projects a full technique down to the per-test fields needed to run it:
//!
//! ```yaml
//! ---
//! Process Discovery - ps:
//!   supported_platforms: linux
//!   command: ps >> /tmp/loot.txt
//!   cleanup_command: rm /tmp/loot.txt
//!   ansible_cmd: /bin/sh -c
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::error::PipelineError;
use crate::platform::{PlatformClass, PlatformClassifier, windows_or_linux};
use crate::technique::{AtomicTest, EXECUTOR, PLATFORMS, Technique};
use crate::translate::TranslationTable;

/// Minimal fields for one test
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RefinedTest {
    pub supported_platforms: PlatformClass,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_command: Option<String>,

    /// Translated executor command
    pub ansible_cmd: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_required: Option<bool>,
}

/// Test name -> refined test, in technique order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefinedTechnique {
    tests: Vec<(String, RefinedTest)>,
}

impl RefinedTechnique {
    /// Insert a test. A repeated name replaces the earlier entry in place.
    pub fn insert(&mut self, name: String, test: RefinedTest) {
        match self.tests.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = test,
            None => self.tests.push((name, test)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RefinedTest> {
        self.tests.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RefinedTest)> {
        self.tests.iter().map(|(n, t)| (n.as_str(), t))
    }
}

impl Serialize for RefinedTechnique {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tests.len()))?;
        for (name, test) in &self.tests {
            map.serialize_entry(name, test)?;
        }
        map.end()
    }
}

/// Refines techniques against a translation table
pub struct Refiner<'a> {
    table: &'a TranslationTable,
    classifier: PlatformClassifier,
}

impl<'a> Refiner<'a> {
    pub fn new(table: &'a TranslationTable) -> Self {
        Self {
            table,
            classifier: windows_or_linux,
        }
    }

    /// Use a different platform classification strategy
    pub fn with_classifier(mut self, classifier: PlatformClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn refine(&self, technique: &Technique) -> Result<RefinedTechnique, PipelineError> {
        debug!(technique = %technique.attack_technique, tests = technique.atomic_tests.len(), "Refiner::refine: called");
        let mut refined = RefinedTechnique::default();
        for test in &technique.atomic_tests {
            refined.insert(test.name.clone(), self.refine_test(test)?);
        }
        Ok(refined)
    }

    fn refine_test(&self, test: &AtomicTest) -> Result<RefinedTest, PipelineError> {
        let context = || format!("test '{}'", test.name);

        let platforms = test
            .supported_platforms
            .as_deref()
            .ok_or_else(|| PipelineError::missing(context(), PLATFORMS))?;
        let platform = (self.classifier)(platforms);

        let executor = test
            .executor
            .as_ref()
            .ok_or_else(|| PipelineError::missing(context(), EXECUTOR))?;
        let executor_name = executor
            .name
            .as_deref()
            .ok_or_else(|| PipelineError::missing(context(), "executor.name"))?;

        let ansible_cmd = self.table.translate(executor_name, platform.as_str());
        debug!(name = %test.name, %platform, %executor_name, %ansible_cmd, "refine_test: translated");

        Ok(RefinedTest {
            supported_platforms: platform,
            command: executor.command.clone(),
            cleanup_command: executor.cleanup_command.clone(),
            ansible_cmd,
            elevation_required: executor.elevation_required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::to_yaml_document;
    use crate::technique::Executor;

    fn table() -> TranslationTable {
        let mut table = TranslationTable::default();
        table.insert("linux", "sh", "/bin/sh -c");
        table.insert("windows", "command_prompt", "cmd.exe /c");
        table
    }

    fn atomic(name: &str, platforms: &[&str], executor: &str) -> AtomicTest {
        AtomicTest {
            name: name.to_string(),
            supported_platforms: Some(platforms.iter().map(|s| s.to_string()).collect()),
            executor: Some(Executor {
                name: Some(executor.to_string()),
                command: Some("whoami".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn technique(tests: Vec<AtomicTest>) -> Technique {
        Technique {
            attack_technique: "T1033".to_string(),
            display_name: None,
            atomic_tests: tests,
        }
    }

    #[test]
    fn test_platform_classes() {
        let table = table();
        let refined = Refiner::new(&table)
            .refine(&technique(vec![
                atomic("both", &["windows", "linux"], "command_prompt"),
                atomic("linux only", &["linux"], "sh"),
            ]))
            .unwrap();

        let both = refined.get("both").unwrap();
        assert_eq!(both.supported_platforms, PlatformClass::Windows);
        assert_eq!(both.ansible_cmd, "cmd.exe /c");

        let linux = refined.get("linux only").unwrap();
        assert_eq!(linux.supported_platforms, PlatformClass::Linux);
        assert_eq!(linux.ansible_cmd, "/bin/sh -c");
    }

    #[test]
    fn test_carries_optional_fields() {
        let table = table();
        let mut t = atomic("elevated", &["windows"], "command_prompt");
        if let Some(executor) = t.executor.as_mut() {
            executor.cleanup_command = Some("del x".to_string());
            executor.elevation_required = Some(true);
        }

        let refined = Refiner::new(&table).refine(&technique(vec![t])).unwrap();
        let r = refined.get("elevated").unwrap();
        assert_eq!(r.command.as_deref(), Some("whoami"));
        assert_eq!(r.cleanup_command.as_deref(), Some("del x"));
        assert_eq!(r.elevation_required, Some(true));
    }

    #[test]
    fn test_missing_executor_name_fails() {
        let table = table();
        let mut t = atomic("nameless", &["linux"], "sh");
        if let Some(executor) = t.executor.as_mut() {
            executor.name = None;
        }

        let err = Refiner::new(&table).refine(&technique(vec![t])).unwrap_err();
        assert!(matches!(err, PipelineError::MissingField { ref field, .. } if field == "executor.name"));
    }

    #[test]
    fn test_missing_executor_fails() {
        let table = table();
        let mut t = atomic("manual", &["linux"], "sh");
        t.executor = None;

        let err = Refiner::new(&table).refine(&technique(vec![t])).unwrap_err();
        assert!(matches!(err, PipelineError::MissingField { ref field, .. } if field == "executor"));
    }

    #[test]
    fn test_missing_platforms_fails() {
        let table = table();
        let mut t = atomic("anywhere", &[], "sh");
        t.supported_platforms = None;

        assert!(Refiner::new(&table).refine(&technique(vec![t])).is_err());
    }

    #[test]
    fn test_custom_classifier() {
        fn always_windows(_: &[String]) -> PlatformClass {
            PlatformClass::Windows
        }

        let table = table();
        let refined = Refiner::new(&table)
            .with_classifier(always_windows)
            .refine(&technique(vec![atomic("t", &["linux"], "sh")]))
            .unwrap();
        let t = refined.get("t").unwrap();
        assert_eq!(t.supported_platforms, PlatformClass::Windows);
        // sh isn't a windows command
        assert_eq!(t.ansible_cmd, "");
    }

    #[test]
    fn test_serialized_layout() {
        let table = table();
        let refined = Refiner::new(&table)
            .refine(&technique(vec![
                atomic("b", &["linux"], "sh"),
                atomic("a", &["windows"], "command_prompt"),
            ]))
            .unwrap();

        let yaml = to_yaml_document(&refined).unwrap();
        assert_eq!(
            yaml,
            "---\nb:\n  supported_platforms: linux\n  command: whoami\n  ansible_cmd: /bin/sh -c\n\
             a:\n  supported_platforms: windows\n  command: whoami\n  ansible_cmd: cmd.exe /c\n"
        );
    }

    #[test]
    fn test_duplicate_names_replace_in_place() {
        let mut refined = RefinedTechnique::default();
        let entry = |cmd: &str| RefinedTest {
            supported_platforms: PlatformClass::Linux,
            command: Some(cmd.to_string()),
            cleanup_command: None,
            ansible_cmd: String::new(),
            elevation_required: None,
        };
        refined.insert("x".to_string(), entry("first"));
        refined.insert("y".to_string(), entry("other"));
        refined.insert("x".to_string(), entry("second"));

        assert_eq!(refined.len(), 2);
        assert_eq!(refined.iter().next().map(|(n, _)| n), Some("x"));
        assert_eq!(refined.get("x").unwrap().command.as_deref(), Some("second"));
    }
}
