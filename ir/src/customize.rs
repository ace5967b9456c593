//! Technique customization
//!
//! Applies a sparse site-specific override document to a base technique.
//! Tests are matched by name. Only argument defaults, the executor command and
//! the executor cleanup command can be overridden, and only when the override
//! declares them.

use tracing::debug;

use crate::error::PipelineError;
use crate::technique::{AtomicTest, CustomTechnique, Technique};

/// Apply `custom` to `base` and return the customized technique.
///
/// When several custom tests share a base test's name they are all applied in
/// order, so the last one wins for any field they both set.
pub fn customize_technique(base: Technique, custom: &CustomTechnique) -> Result<Technique, PipelineError> {
    debug!(technique = %base.attack_technique, custom_tests = custom.atomic_tests.len(), "customize_technique: called");
    let Technique {
        attack_technique,
        display_name,
        atomic_tests,
    } = base;

    for custom_test in &custom.atomic_tests {
        if !atomic_tests.iter().any(|t| t.name == custom_test.name) {
            debug!(name = %custom_test.name, "customize_technique: no base test with this name, ignoring");
        }
    }

    let atomic_tests = atomic_tests
        .into_iter()
        .map(|test| {
            let name = test.name.clone();
            custom
                .atomic_tests
                .iter()
                .filter(|c| c.name == name)
                .try_fold(test, customize_test)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Technique {
        attack_technique,
        display_name,
        atomic_tests,
    })
}

/// Apply an override document if there is one
pub fn customize_optional(base: Technique, custom: Option<&CustomTechnique>) -> Result<Technique, PipelineError> {
    match custom {
        Some(custom) => customize_technique(base, custom),
        None => {
            debug!("customize_optional: no custom technique, returning base");
            Ok(base)
        }
    }
}

/// Overlay one custom test onto its base test
fn customize_test(mut test: AtomicTest, custom: &AtomicTest) -> Result<AtomicTest, PipelineError> {
    debug!(name = %test.name, "customize_test: called");

    if let Some(custom_arguments) = &custom.input_arguments {
        for (name, custom_argument) in custom_arguments {
            let value = custom_argument
                .default_value()
                .cloned()
                .ok_or_else(|| PipelineError::missing(format!("custom argument '{}'", name), "default"))?;

            let argument = test
                .input_arguments
                .as_mut()
                .and_then(|arguments| arguments.get_mut(name))
                .ok_or_else(|| PipelineError::UnknownArgument {
                    test: test.name.clone(),
                    argument: name.clone(),
                })?;

            debug!(%name, "customize_test: overriding argument default");
            argument.set_default(value);
        }
    }

    if let Some(custom_executor) = &custom.executor {
        let command = custom_executor.command.clone();
        let cleanup_command = custom_executor.cleanup_command.clone();

        if command.is_some() || cleanup_command.is_some() {
            let executor = test.executor.get_or_insert_with(Default::default);
            if command.is_some() {
                debug!("customize_test: overriding command");
                executor.command = command;
            }
            if cleanup_command.is_some() {
                debug!("customize_test: overriding cleanup_command");
                executor.cleanup_command = cleanup_command;
            }
        }
    }

    Ok(test)
}
