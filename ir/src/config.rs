//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::pipeline::PipelinePaths;
use crate::substitute::MissingArgumentPolicy;

/// Project-local config file name
const LOCAL_CONFIG: &str = ".irradiate.yml";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the atomic-test corpus (`<dir>/<id>/<id>.yaml`)
    #[serde(rename = "atomics-dir")]
    pub atomics_dir: PathBuf,

    /// Directory of site overrides (`<dir>/<id>.yaml`)
    #[serde(rename = "custom-dir")]
    pub custom_dir: PathBuf,

    /// Translation table file
    pub translations: PathBuf,

    /// Where refined documents are written (`<dir>/<id>.yaml`)
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// What to do with placeholders that have no argument value
    #[serde(rename = "missing-argument")]
    pub missing_argument: MissingArgumentPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            atomics_dir: PathBuf::from("files/atomic-red-team/atomics"),
            custom_dir: PathBuf::from("files/custom"),
            translations: PathBuf::from("files/translations/translations.yaml"),
            output_dir: PathBuf::from("vars"),
            log_level: None,
            missing_argument: MissingArgumentPolicy::Warn,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// 1. Explicit path (errors are fatal)
    /// 2. `./.irradiate.yml`
    /// 3. `~/.config/irradiate/irradiate.yml`
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::default_paths() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => warn!("Failed to load config from {}: {}", path.display(), e),
                }
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is set up. Never fails.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::default_paths(),
        };

        candidates
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(p).ok())
            .and_then(|config| config.log_level)
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("irradiate").join("irradiate.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        debug!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Filesystem layout for the pipeline
    pub fn paths(&self) -> PipelinePaths {
        PipelinePaths {
            atomics_dir: self.atomics_dir.clone(),
            custom_dir: self.custom_dir.clone(),
            translations: self.translations.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}
