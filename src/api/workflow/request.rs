//! Parsing and validation of workflow API requests

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use uuid::Uuid;

use super::error::WorkflowApiError;
use crate::domain::{Locale, ParameterBag, ParameterMap, TypedValue};

/// The six operations of the workflow API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateInstance,
    GetAvailableCommands,
    ExecuteCommand,
    GetAvailableStateToSet,
    SetState,
    IsExistProcess,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::CreateInstance,
        Operation::GetAvailableCommands,
        Operation::ExecuteCommand,
        Operation::GetAvailableStateToSet,
        Operation::SetState,
        Operation::IsExistProcess,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateInstance => "createinstance",
            Self::GetAvailableCommands => "getavailablecommands",
            Self::ExecuteCommand => "executecommand",
            Self::GetAvailableStateToSet => "getavailablestatetoset",
            Self::SetState => "setstate",
            Self::IsExistProcess => "isexistprocess",
        }
    }
}

impl FromStr for Operation {
    type Err = WorkflowApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| WorkflowApiError::UnsupportedOperation(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated query of a workflow API request
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    pub operation: Operation,
    pub process_id: Uuid,
    pub identity_id: Option<String>,
    pub impersonated_identity_id: Option<String>,
    /// `parameters` query value, absent when not supplied
    pub parameters: Option<ParameterMap>,
    pub culture: Locale,
    pub scheme_code: Option<String>,
    pub command: Option<String>,
    pub state: Option<String>,
}

impl OperationRequest {
    /// Validate `query` in a fixed order: operation, processid, parameters,
    /// culture, then the operation name itself
    pub fn parse(query: &ParameterBag, default_culture: &Locale) -> Result<Self, WorkflowApiError> {
        let operation = query
            .get_non_blank("operation")
            .ok_or(WorkflowApiError::MissingParameter("operation"))?;

        let process_id = query
            .get("processid")
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or(WorkflowApiError::InvalidProcessId)?;

        let parameters = query
            .get_non_blank("parameters")
            .map(parse_parameters)
            .transpose()?;

        let culture = match query.get_non_blank("culture") {
            Some(tag) => Locale::new(tag).map_err(WorkflowApiError::InvalidCulture)?,
            None => default_culture.clone(),
        };

        let operation: Operation = operation.trim().parse()?;
        let text = |key: &str| query.get_non_blank(key).map(str::to_string);

        Ok(Self {
            operation,
            process_id,
            identity_id: text("identityid"),
            impersonated_identity_id: text("impersonatedidentityid"),
            parameters,
            culture,
            scheme_code: text("schemacode"),
            command: text("command"),
            state: text("state"),
        })
    }
}

/// Parse the flat `parameters` map; nested values are kept as JSON
fn parse_parameters(raw: &str) -> Result<ParameterMap, WorkflowApiError> {
    match serde_json::from_str(raw).map_err(WorkflowApiError::InvalidParameters)? {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| (key, TypedValue::from_json(value)))
            .collect()),
        _ => Err(WorkflowApiError::ParametersNotObject),
    }
}
