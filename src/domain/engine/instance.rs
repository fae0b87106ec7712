//! Instance-level requests and results

use serde::Serialize;
use uuid::Uuid;

use crate::domain::parameter::ParameterMap;

/// Arguments for creating a process instance
#[derive(Debug, Clone, PartialEq)]
pub struct CreateInstanceParams {
    pub scheme_code: String,
    pub process_id: Uuid,
    pub identity_id: Option<String>,
    pub impersonated_identity_id: Option<String>,
    /// Typed values for the scheme's declared parameters
    pub initial_process_parameters: ParameterMap,
    /// Free-form parameters used when generating the scheme
    pub scheme_creation_parameters: ParameterMap,
}

impl CreateInstanceParams {
    pub fn new(scheme_code: impl Into<String>, process_id: Uuid) -> Self {
        Self {
            scheme_code: scheme_code.into(),
            process_id,
            identity_id: None,
            impersonated_identity_id: None,
            initial_process_parameters: ParameterMap::new(),
            scheme_creation_parameters: ParameterMap::new(),
        }
    }

    pub fn with_identity(mut self, identity_id: Option<String>) -> Self {
        self.identity_id = identity_id;
        self
    }

    pub fn with_impersonated_identity(mut self, identity_id: Option<String>) -> Self {
        self.impersonated_identity_id = identity_id;
        self
    }

    pub fn with_initial_parameters(mut self, parameters: ParameterMap) -> Self {
        self.initial_process_parameters = parameters;
        self
    }

    pub fn with_scheme_creation_parameters(mut self, parameters: ParameterMap) -> Self {
        self.scheme_creation_parameters = parameters;
        self
    }
}

/// Arguments for forcing an instance into a state
#[derive(Debug, Clone, PartialEq)]
pub struct SetStateParams {
    pub process_id: Uuid,
    pub identity_id: Option<String>,
    pub impersonated_identity_id: Option<String>,
    pub state: String,
    pub parameters: ParameterMap,
}

/// State an instance can be moved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowState {
    pub name: String,
    pub localized_name: String,
    pub scheme_code: String,
}
