//! Workflow engine contract

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use super::command::{CommandQuery, WorkflowCommand};
use super::designer::DesignerRequest;
use super::instance::{CreateInstanceParams, SetStateParams, WorkflowState};
use super::scheme::ProcessScheme;
use super::wiring::EngineWiring;
use crate::domain::locale::Locale;
use crate::domain::DomainError;

/// Workflow engine owning instance state machines and scheme storage.
///
/// One engine is shared by every request. Implementations must be safe to
/// call concurrently; callers add no locking of their own.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WorkflowEngine: Send + Sync {
    /// Create a new instance of a scheme
    async fn create_instance(&self, params: CreateInstanceParams) -> Result<(), DomainError>;

    /// Commands the given identities may execute on an instance
    async fn get_available_commands(
        &self,
        query: CommandQuery,
    ) -> Result<Vec<WorkflowCommand>, DomainError>;

    /// Execute a previously listed command
    async fn execute_command(
        &self,
        command: WorkflowCommand,
        identity_id: Option<String>,
        impersonated_identity_id: Option<String>,
    ) -> Result<(), DomainError>;

    /// States an instance may be forced into, localized to `culture`
    async fn get_available_states_to_set(
        &self,
        process_id: Uuid,
        culture: Locale,
    ) -> Result<Vec<WorkflowState>, DomainError>;

    /// Force an instance into a state
    async fn set_state(&self, params: SetStateParams) -> Result<(), DomainError>;

    async fn process_exists(&self, process_id: Uuid) -> Result<bool, DomainError>;

    async fn get_process_scheme(&self, scheme_code: &str) -> Result<ProcessScheme, DomainError>;

    /// Opaque designer call returning raw text
    async fn designer_api(&self, request: DesignerRequest) -> Result<String, DomainError>;

    /// Start background processing
    async fn start(&self) -> Result<(), DomainError>;
}

/// Builds an engine over a set of wired collaborators
#[async_trait]
pub trait EngineFactory: Send + Sync {
    /// Register the engine license; called once before [`EngineFactory::create`]
    fn register_license(&self, key: &str) -> Result<(), DomainError>;

    async fn create(&self, wiring: EngineWiring) -> Result<Arc<dyn WorkflowEngine>, DomainError>;
}
