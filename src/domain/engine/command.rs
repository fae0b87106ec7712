//! Commands - transitions currently available on an instance

use serde::Serialize;
use uuid::Uuid;

use crate::domain::parameter::{ParameterMap, TypeTag, TypedValue};

/// Typed argument of a command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    pub value: TypedValue,
}

impl CommandParameter {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            value: type_tag.default_value(),
        }
    }
}

/// Snapshot of an available transition, valid for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowCommand {
    pub process_id: Uuid,
    pub name: String,
    pub localized_name: String,
    /// State the command is available from
    pub state_name: String,
    /// Identities allowed to execute the command; empty means anyone
    pub valid_for_identities: Vec<String>,
    pub parameters: Vec<CommandParameter>,
}

impl WorkflowCommand {
    /// Reset every parameter to its type's default value
    pub fn set_all_parameters_to_default(&mut self) {
        for parameter in &mut self.parameters {
            parameter.value = parameter.type_tag.default_value();
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&CommandParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut CommandParameter> {
        self.parameters.iter_mut().find(|p| p.name == name)
    }

    /// Current parameter values keyed by name
    pub fn parameter_values(&self) -> ParameterMap {
        self.parameters
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect()
    }
}

/// Filter for listing available commands
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandQuery {
    pub process_id: Uuid,
    pub identities: Vec<String>,
    /// Only return the command with this name
    pub command_name: Option<String>,
    pub impersonated_identity_id: Option<String>,
}

impl CommandQuery {
    pub fn new(process_id: Uuid) -> Self {
        Self {
            process_id,
            ..Default::default()
        }
    }

    pub fn with_identity(mut self, identity_id: Option<String>) -> Self {
        self.identities = identity_id.into_iter().collect();
        self
    }

    pub fn with_impersonated_identity(mut self, identity_id: Option<String>) -> Self {
        self.impersonated_identity_id = identity_id;
        self
    }

    pub fn with_command_name(mut self, name: impl Into<String>) -> Self {
        self.command_name = Some(name.into());
        self
    }

    /// Identities used for authorization: the impersonated one when present
    pub fn effective_identities(&self) -> Vec<String> {
        match &self.impersonated_identity_id {
            Some(impersonated) => vec![impersonated.clone()],
            None => self.identities.clone(),
        }
    }
}
