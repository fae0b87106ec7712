//! Built-in code actions and rules

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::engine::{ActionContext, CodeAction, CodeActionRegistry, CodeRule};
use crate::domain::DomainError;

/// Logs every transition it is attached to
#[derive(Debug, Default)]
pub struct LogTransition;

#[async_trait]
impl CodeAction for LogTransition {
    fn name(&self) -> &'static str {
        "LogTransition"
    }

    async fn execute(&self, context: &ActionContext) -> Result<(), DomainError> {
        info!(
            process_id = %context.process_id,
            scheme = %context.scheme_code,
            from = %context.current_state,
            to = %context.target_state,
            command = ?context.command,
            identity = ?context.identity_id,
            "Transition executed"
        );
        Ok(())
    }
}

/// Holds when the request carries an identity
#[derive(Debug, Default)]
pub struct HasIdentity;

impl CodeRule for HasIdentity {
    fn name(&self) -> &'static str {
        "HasIdentity"
    }

    fn check(&self, context: &ActionContext) -> bool {
        context.identity_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Holds when the caller acts on behalf of another identity
#[derive(Debug, Default)]
pub struct IsImpersonated;

impl CodeRule for IsImpersonated {
    fn name(&self) -> &'static str {
        "IsImpersonated"
    }

    fn check(&self, context: &ActionContext) -> bool {
        context
            .impersonated_identity_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }
}

/// Every action and rule implemented in this process
pub fn builtin_code_actions() -> CodeActionRegistry {
    CodeActionRegistry::new()
        .with_action(Arc::new(LogTransition))
        .with_rule(Arc::new(HasIdentity))
        .with_rule(Arc::new(IsImpersonated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParameterMap;
    use uuid::Uuid;

    fn context(identity: Option<&str>, impersonated: Option<&str>) -> ActionContext {
        ActionContext {
            process_id: Uuid::new_v4(),
            scheme_code: "approval".to_string(),
            current_state: "Draft".to_string(),
            target_state: "Review".to_string(),
            command: None,
            identity_id: identity.map(String::from),
            impersonated_identity_id: impersonated.map(String::from),
            parameters: ParameterMap::new(),
        }
    }

    #[test]
    fn test_registry_contents() {
        let registry = builtin_code_actions();
        assert_eq!(registry.action_names(), vec!["LogTransition"]);
        assert_eq!(registry.rule_names(), vec!["HasIdentity", "IsImpersonated"]);
    }

    #[test]
    fn test_rules() {
        assert!(HasIdentity.check(&context(Some("alice"), None)));
        assert!(!HasIdentity.check(&context(Some(""), None)));
        assert!(!IsImpersonated.check(&context(Some("alice"), None)));
        assert!(IsImpersonated.check(&context(Some("alice"), Some("bob"))));
    }

    #[tokio::test]
    async fn test_log_transition_succeeds() {
        assert!(LogTransition.execute(&context(None, None)).await.is_ok());
    }
}
