//! Action and rule resolution used by the engine while executing transitions

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::scheme::ProcessScheme;
use crate::domain::parameter::ParameterMap;
use crate::domain::DomainError;

/// What an action or rule sees about the transition being evaluated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionContext {
    pub process_id: Uuid,
    pub scheme_code: String,
    pub current_state: String,
    pub target_state: String,
    pub command: Option<String>,
    pub identity_id: Option<String>,
    pub impersonated_identity_id: Option<String>,
    pub parameters: ParameterMap,
}

/// Executes named actions attached to transitions
#[async_trait]
pub trait ActionProvider: Send + Sync {
    async fn execute_action(&self, name: &str, context: &ActionContext) -> Result<(), DomainError>;
}

/// Evaluates named conditions guarding transitions
#[async_trait]
pub trait RuleProvider: Send + Sync {
    async fn check_rule(&self, name: &str, context: &ActionContext) -> Result<bool, DomainError>;
}

/// Action implemented in this process and registered at startup
#[async_trait]
pub trait CodeAction: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, context: &ActionContext) -> Result<(), DomainError>;
}

/// Rule implemented in this process and registered at startup
pub trait CodeRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, context: &ActionContext) -> bool;
}

/// Builds schemes on demand for codes the engine does not know
#[async_trait]
pub trait SchemeGenerator: Send + Sync {
    async fn generate_scheme(
        &self,
        scheme_code: &str,
        parameters: &ParameterMap,
    ) -> Result<ProcessScheme, DomainError>;
}
