//! Typed command and process parameters from posted form data

use super::error::WorkflowApiError;
use crate::domain::{coerce, ParameterBag, ParameterMap, ProcessScheme, WorkflowCommand};

/// Reset every parameter of `command` to its default, then overlay the form
/// values whose keys exactly match a declared parameter. Other keys are
/// ignored.
pub fn fill_command_parameters(
    command: &mut WorkflowCommand,
    form: Option<&ParameterBag>,
) -> Result<(), WorkflowApiError> {
    command.set_all_parameters_to_default();

    let Some(form) = form else {
        return Ok(());
    };

    for (key, raw) in form.entries() {
        let Some(parameter) = command.parameter_mut(key) else {
            continue;
        };

        parameter.value = coerce(raw, parameter.type_tag).map_err(|source| {
            WorkflowApiError::Coercion {
                parameter: key.to_string(),
                source,
            }
        })?;
    }

    Ok(())
}

/// Initial process parameters: form values typed by the scheme's declared
/// parameters
pub fn initial_process_parameters(
    scheme: &ProcessScheme,
    form: &ParameterBag,
) -> Result<ParameterMap, WorkflowApiError> {
    let mut parameters = ParameterMap::new();

    for (key, raw) in form.entries() {
        let Some(descriptor) = scheme.parameters.iter().find(|p| p.name == key) else {
            continue;
        };

        let value = coerce(raw, descriptor.type_tag).map_err(|source| WorkflowApiError::Coercion {
            parameter: key.to_string(),
            source,
        })?;
        parameters.insert(descriptor.name.clone(), value);
    }

    Ok(parameters)
}
