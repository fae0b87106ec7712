use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Callback error: {message}")]
    Callback { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Failure reported by the workflow engine, optionally wrapping the error
    /// that caused it.
    #[error("{message}")]
    Engine {
        message: String,
        #[source]
        cause: Option<Box<DomainError>>,
    },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn callback(message: impl Into<String>) -> Self {
        Self::Callback {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
            cause: None,
        }
    }

    pub fn engine_with_cause(message: impl Into<String>, cause: DomainError) -> Self {
        Self::Engine {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Scheme 'approval' not found");
        assert_eq!(error.to_string(), "Not found: Scheme 'approval' not found");
    }

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("Provider 'db2' is not supported");
        assert_eq!(
            error.to_string(),
            "Configuration error: Provider 'db2' is not supported"
        );
    }

    #[test]
    fn test_engine_error_exposes_cause() {
        let error = DomainError::engine_with_cause(
            "Command execution failed",
            DomainError::callback("rule 'CanApprove' rejected"),
        );

        assert_eq!(error.to_string(), "Command execution failed");
        assert_eq!(
            error.source().map(|s| s.to_string()),
            Some("Callback error: rule 'CanApprove' rejected".to_string())
        );
    }

    #[test]
    fn test_engine_error_without_cause() {
        let error = DomainError::engine("boom");
        assert!(error.source().is_none());
    }
}
