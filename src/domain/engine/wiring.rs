//! Collaborators handed to the engine when it is constructed

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::callback::{ActionProvider, CodeAction, CodeRule, RuleProvider, SchemeGenerator};
use crate::domain::persistence::PersistenceProvider;
use crate::domain::DomainError;

/// Notification emitted after an instance changed state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessEvent {
    pub process_id: Uuid,
    pub scheme_code: String,
    pub from_state: String,
    pub to_state: String,
    pub command: Option<String>,
    pub identity_id: Option<String>,
}

/// Outbound channel for process events
#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn publish(&self, event: ProcessEvent) -> Result<(), DomainError>;
}

/// Bus that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBus;

#[async_trait]
impl MessageBus for NullBus {
    async fn publish(&self, _event: ProcessEvent) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Timer settings for the engine runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerManager {
    pub poll_interval: Duration,
}

impl Default for TimerManager {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl TimerManager {
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

/// Explicit list of in-process actions and rules
#[derive(Default, Clone)]
pub struct CodeActionRegistry {
    actions: Vec<Arc<dyn CodeAction>>,
    rules: Vec<Arc<dyn CodeRule>>,
}

impl CodeActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, action: Arc<dyn CodeAction>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_rule(mut self, rule: Arc<dyn CodeRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn action(&self, name: &str) -> Option<&Arc<dyn CodeAction>> {
        self.actions.iter().find(|a| a.name() == name)
    }

    pub fn rule(&self, name: &str) -> Option<&Arc<dyn CodeRule>> {
        self.rules.iter().find(|r| r.name() == name)
    }

    pub fn action_names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

impl fmt::Debug for CodeActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeActionRegistry")
            .field("actions", &self.action_names())
            .field("rules", &self.rule_names())
            .finish()
    }
}

/// Everything an engine is constructed with
#[derive(Clone)]
pub struct EngineWiring {
    pub runtime_id: Uuid,
    pub persistence: Arc<dyn PersistenceProvider>,
    /// Separate scheme storage, for backends that keep schemes apart
    pub scheme_persistence: Option<Arc<dyn PersistenceProvider>>,
    pub bus: Arc<dyn MessageBus>,
    pub timers: TimerManager,
    pub actions: Arc<dyn ActionProvider>,
    pub rules: Arc<dyn RuleProvider>,
    pub code_actions: CodeActionRegistry,
    /// Source of schemes for unknown codes; unknown codes fail when absent
    pub scheme_generator: Option<Arc<dyn SchemeGenerator>>,
    /// Refresh an instance's scheme before listing its commands
    pub auto_update_scheme_before_get_available_commands: bool,
}

impl fmt::Debug for EngineWiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineWiring")
            .field("runtime_id", &self.runtime_id)
            .field("persistence", &self.persistence)
            .field("scheme_persistence", &self.scheme_persistence)
            .field("timers", &self.timers)
            .field("code_actions", &self.code_actions)
            .field("generates_schemes", &self.scheme_generator.is_some())
            .field(
                "auto_update_scheme_before_get_available_commands",
                &self.auto_update_scheme_before_get_available_commands,
            )
            .finish_non_exhaustive()
    }
}
