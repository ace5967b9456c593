//! Irradiate - atomic-test technique refinement
//!
//! Turns atomic-test technique definitions into the minimal YAML an automation
//! host needs to run them. For each technique identifier:
//!
//! 1. load the corpus document
//! 2. apply the site override document, if one exists
//! 3. substitute `#{argument}` placeholders with argument defaults
//! 4. translate each executor into a platform-specific command
//! 5. write the refined document
//!
//! # Layout
//!
//! ```text
//! atomics/
//! └── T1057/
//!     └── T1057.yaml        # corpus technique
//! custom/
//! └── T1057.yaml            # optional site override
//! translations/
//! └── translations.yaml     # executor -> command, per platform
//! vars/
//! └── T1057.yaml            # refined output
//! ```
//!
//! # Example
//!
//! ```ignore
//! use irradiate::{Pipeline, PipelinePaths};
//!
//! let pipeline = Pipeline::new(PipelinePaths::under("files"));
//! let produced = pipeline.process_technique("T1057")?;
//! ```

pub mod arguments;
pub mod cli;
pub mod config;
pub mod customize;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod platform;
pub mod refine;
pub mod substitute;
pub mod technique;
pub mod translate;

pub use arguments::{ArgumentValues, index_arguments};
pub use config::Config;
pub use customize::{customize_optional, customize_technique};
pub use error::PipelineError;
pub use loader::{load_document, load_yaml, write_document};
pub use pipeline::{Pipeline, PipelinePaths};
pub use platform::{PlatformClass, PlatformClassifier, windows_or_linux};
pub use refine::{RefinedTechnique, RefinedTest, Refiner};
pub use substitute::{MissingArgumentPolicy, PATTERN, Substitution, Substitutor};
pub use technique::{Argument, Arguments, AtomicTest, CustomTechnique, Executor, Technique};
pub use translate::{Translation, TranslationTable};
