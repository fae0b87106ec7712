//! Failures of the workflow API pipeline

use std::error::Error as _;

use thiserror::Error;

use crate::api::types::ParamsRejection;
use crate::domain::{CoercionError, DomainError, LocaleError};

/// Separates a failure from its cause in the envelope message
pub const CAUSE_DELIMITER: &str = ". Caused by: ";

#[derive(Debug, Error)]
pub enum WorkflowApiError {
    #[error("Parameter '{0}' is required")]
    MissingParameter(&'static str),

    #[error("Parameter 'processid' is required and must be a UUID")]
    InvalidProcessId,

    #[error("Parameter 'parameters' is not valid JSON")]
    InvalidParameters(#[source] serde_json::Error),

    #[error("Parameter 'parameters' must be a JSON object")]
    ParametersNotObject,

    #[error("Parameter 'culture' is invalid")]
    InvalidCulture(#[source] LocaleError),

    #[error("operation={0} is not supported")]
    UnsupportedOperation(String),

    #[error("Command {0} is not found")]
    CommandNotFound(String),

    #[error("Parameter '{parameter}' is invalid")]
    Coercion {
        parameter: String,
        #[source]
        source: CoercionError,
    },

    #[error("Request could not be read")]
    MalformedRequest(#[source] ParamsRejection),

    #[error("Failed to serialize response")]
    Serialization(#[source] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] DomainError),
}

impl WorkflowApiError {
    /// Message of the error that caused this one
    pub fn cause(&self) -> Option<String> {
        self.source().map(|cause| cause.to_string())
    }

    /// `<message>` or `<message>. Caused by: <cause>`
    pub fn envelope_message(&self) -> String {
        match self.cause() {
            Some(cause) => format!("{}{}{}", self, CAUSE_DELIMITER, cause),
            None => self.to_string(),
        }
    }
}
