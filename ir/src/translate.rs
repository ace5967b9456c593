//! Command translation
//!
//! Maps a generic executor name (`sh`, `powershell`, ...) to the command string
//! used to run it on a given platform. The table file looks like:
//!
//! ```yaml
//! supported_platforms:
//!   linux:
//!     sh: /bin/sh -c
//!     bash: /bin/bash -c
//!   windows:
//!     powershell: powershell.exe -Command
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PipelineError;
use crate::loader;

/// OS identifier -> generic command name -> OS-specific command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationTable {
    #[serde(rename = "supported_platforms", default)]
    pub platforms: BTreeMap<String, BTreeMap<String, String>>,
}

/// Outcome of a table lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Found(String),
    /// The OS is in the table but the command isn't
    UnknownCommand,
    /// The OS isn't in the table at all
    UnknownPlatform,
}

impl TranslationTable {
    /// Read the table from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        debug!(?path, "TranslationTable::load: called");
        let table: Self = loader::load_document(path)?;
        debug!(platforms = table.platforms.len(), "TranslationTable::load: complete");
        Ok(table)
    }

    /// Add or replace one entry
    pub fn insert(&mut self, os: impl Into<String>, command: impl Into<String>, translated: impl Into<String>) {
        self.platforms
            .entry(os.into())
            .or_default()
            .insert(command.into(), translated.into());
    }

    pub fn lookup(&self, command: &str, os: &str) -> Translation {
        match self.platforms.get(os) {
            None => Translation::UnknownPlatform,
            Some(commands) => match commands.get(command) {
                Some(translated) => Translation::Found(translated.clone()),
                None => Translation::UnknownCommand,
            },
        }
    }

    /// Translate `command` for `os`.
    ///
    /// An unknown OS passes the command through unchanged; a known OS without
    /// the command yields an empty string.
    pub fn translate(&self, command: &str, os: &str) -> String {
        debug!(%command, %os, "TranslationTable::translate: called");
        match self.lookup(command, os) {
            Translation::Found(translated) => translated,
            Translation::UnknownCommand => {
                debug!(%command, %os, "translate: command not in table, returning empty");
                String::new()
            }
            Translation::UnknownPlatform => {
                debug!(%os, "translate: platform not in table, passing command through");
                command.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn table() -> TranslationTable {
        let mut table = TranslationTable::default();
        table.insert("linux", "ps", "run_ps");
        table
    }

    #[test]
    fn test_translate_found() {
        assert_eq!(table().translate("ps", "linux"), "run_ps");
    }

    #[test]
    fn test_translate_unknown_command_is_empty() {
        assert_eq!(table().translate("other", "linux"), "");
    }

    #[test]
    fn test_translate_unknown_os_passes_through() {
        assert_eq!(table().translate("ps", "mac"), "ps");
    }

    #[test]
    fn test_lookup() {
        let table = table();
        assert_eq!(table.lookup("ps", "linux"), Translation::Found("run_ps".to_string()));
        assert_eq!(table.lookup("other", "linux"), Translation::UnknownCommand);
        assert_eq!(table.lookup("ps", "mac"), Translation::UnknownPlatform);
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("translations.yaml");
        fs::write(
            &path,
            r#"---
supported_platforms:
  linux:
    sh: /bin/sh -c
  windows:
    command_prompt: cmd.exe /c
    powershell: powershell.exe -Command
"#,
        )
        .unwrap();

        let table = TranslationTable::load(&path).unwrap();
        assert_eq!(table.translate("sh", "linux"), "/bin/sh -c");
        assert_eq!(table.translate("command_prompt", "windows"), "cmd.exe /c");
        assert_eq!(table.translate("sh", "windows"), "");
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(TranslationTable::load(temp.path().join("none.yaml")).unwrap_err().is_io());
    }
}
