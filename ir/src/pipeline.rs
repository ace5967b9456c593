//! Technique pipeline
//!
//! Wires the transforms together for one technique identifier:
//! load -> customize -> substitute -> refine -> write.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::arguments::index_arguments;
use crate::customize::customize_optional;
use crate::error::PipelineError;
use crate::loader;
use crate::refine::{RefinedTechnique, Refiner};
use crate::substitute::Substitutor;
use crate::technique::{ARG_KEY, Technique};
use crate::translate::TranslationTable;

/// Extension of every technique document
const YAML_EXT: &str = "yaml";

/// Where the pipeline reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub atomics_dir: PathBuf,
    pub custom_dir: PathBuf,
    pub translations: PathBuf,
    pub output_dir: PathBuf,
}

impl PipelinePaths {
    /// All four locations under one root, using the conventional layout
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            atomics_dir: root.join("atomics"),
            custom_dir: root.join("custom"),
            translations: root.join("translations").join("translations.yaml"),
            output_dir: root.join("vars"),
        }
    }

    pub fn technique_file(&self, id: &str) -> PathBuf {
        self.atomics_dir.join(id).join(yaml_name(id))
    }

    pub fn custom_file(&self, id: &str) -> PathBuf {
        self.custom_dir.join(yaml_name(id))
    }

    pub fn output_file(&self, id: &str) -> PathBuf {
        self.output_dir.join(yaml_name(id))
    }
}

fn yaml_name(id: &str) -> String {
    format!("{}.{}", id, YAML_EXT)
}

/// Runs the refinement pipeline
pub struct Pipeline {
    paths: PipelinePaths,
    substitutor: Substitutor,
}

impl Pipeline {
    pub fn new(paths: PipelinePaths) -> Self {
        debug!(?paths, "Pipeline::new: called");
        Self {
            paths,
            substitutor: Substitutor::default(),
        }
    }

    pub fn with_substitutor(mut self, substitutor: Substitutor) -> Self {
        self.substitutor = substitutor;
        self
    }

    pub fn paths(&self) -> &PipelinePaths {
        &self.paths
    }

    /// Load the base technique and apply its override file, if any
    pub fn load_customized(&self, id: &str) -> Result<Technique, PipelineError> {
        debug!(%id, "Pipeline::load_customized: called");
        let technique = loader::load_technique(self.paths.technique_file(id))?;

        let custom_file = self.paths.custom_file(id);
        let custom = if custom_file.is_file() {
            debug!(?custom_file, "load_customized: applying custom technique");
            Some(loader::load_custom_technique(&custom_file)?)
        } else {
            debug!(?custom_file, "load_customized: no custom technique");
            None
        };

        customize_optional(technique, custom.as_ref())
    }

    /// Substitute argument defaults into every test that declares arguments
    pub fn substitute_arguments(&self, technique: Technique) -> Result<Technique, PipelineError> {
        let Technique {
            attack_technique,
            display_name,
            atomic_tests,
        } = technique;

        let atomic_tests = atomic_tests
            .into_iter()
            .map(|test| {
                let Some(arguments) = test.input_arguments.as_ref() else {
                    return Ok(test);
                };
                let values = index_arguments(arguments, ARG_KEY)?;
                self.substitutor.process_atomic(test, &values)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Technique {
            attack_technique,
            display_name,
            atomic_tests,
        })
    }

    /// Load, customize, substitute and refine one technique
    pub fn refine(&self, id: &str) -> Result<(Technique, RefinedTechnique), PipelineError> {
        let technique = self.load_customized(id)?;
        let technique = self.substitute_arguments(technique)?;

        let table = TranslationTable::load(&self.paths.translations)?;
        let refined = Refiner::new(&table).refine(&technique)?;
        Ok((technique, refined))
    }

    /// The refined document as YAML, without writing it
    pub fn refine_only(&self, id: &str) -> Result<String, PipelineError> {
        let (_, refined) = self.refine(id)?;
        loader::to_yaml_document(&refined)
    }

    /// Refine and write one technique, returning the produced file name
    pub fn run(&self, id: &str) -> Result<String, PipelineError> {
        debug!(%id, "Pipeline::run: called");
        let (technique, refined) = self.refine(id)?;

        let output_file = self.paths.output_file(id);
        loader::write_document(&output_file, &refined)?;

        let produced = yaml_name(&technique.attack_technique);
        info!(%id, tests = refined.len(), output = %output_file.display(), "Refined technique");
        Ok(produced)
    }

    /// Like [`Pipeline::run`], but file-system failures are logged and give `None`.
    ///
    /// Structural failures (missing fields, unknown override arguments) still
    /// propagate.
    pub fn process_technique(&self, id: &str) -> Result<Option<String>, PipelineError> {
        match self.run(id) {
            Ok(produced) => Ok(Some(produced)),
            Err(e) if e.is_io() => {
                error!(%id, "{}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Technique identifiers present in the corpus, sorted
    pub fn list_techniques(&self) -> Result<Vec<String>, PipelineError> {
        let dir = &self.paths.atomics_dir;
        debug!(?dir, "Pipeline::list_techniques: called");

        let mut ids = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| PipelineError::Io {
                path: dir.clone(),
                source: e.into(),
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }
            if let Some(id) = entry.file_name().to_str()
                && self.paths.technique_file(id).is_file()
            {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }
}
