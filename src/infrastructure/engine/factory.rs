//! Factory for the reference engine

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::in_memory::InMemoryWorkflowEngine;
use crate::domain::{
    BackendFamily, DomainError, EngineFactory, EngineWiring, ProcessScheme, WorkflowEngine,
};

/// Builds [`InMemoryWorkflowEngine`]s preloaded with a fixed set of schemes
#[derive(Debug, Default)]
pub struct InMemoryEngineFactory {
    schemes: Vec<ProcessScheme>,
    license: OnceLock<String>,
}

impl InMemoryEngineFactory {
    pub fn new(schemes: Vec<ProcessScheme>) -> Self {
        Self {
            schemes,
            license: OnceLock::new(),
        }
    }

    pub fn license(&self) -> Option<&str> {
        self.license.get().map(String::as_str)
    }
}

#[async_trait]
impl EngineFactory for InMemoryEngineFactory {
    fn register_license(&self, key: &str) -> Result<(), DomainError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::configuration("License key must not be empty"));
        }

        if self.license.set(key.to_string()).is_err() {
            debug!("License already registered");
        }
        Ok(())
    }

    async fn create(&self, wiring: EngineWiring) -> Result<Arc<dyn WorkflowEngine>, DomainError> {
        let kind = wiring.persistence.kind();
        if kind.family() != BackendFamily::InProcess {
            warn!(
                provider = %kind,
                "Reference engine keeps instances in memory; the provider is only used for readiness checks"
            );
        }

        for scheme in &self.schemes {
            scheme.validate()?;
        }

        Ok(Arc::new(InMemoryWorkflowEngine::with_schemes(
            wiring,
            self.schemes.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::domain::engine::fixtures::approval_scheme;
    use crate::domain::CreateInstanceParams;
    use crate::infrastructure::engine::in_memory::tests::{wiring, StaticCallbacks};

    #[test]
    fn test_register_license() {
        let factory = InMemoryEngineFactory::default();

        assert!(factory.register_license("  ").is_err());
        assert!(factory.license().is_none());

        factory.register_license(" KEY-1 ").unwrap();
        factory.register_license("KEY-2").unwrap();
        assert_eq!(factory.license(), Some("KEY-1"));
    }

    #[tokio::test]
    async fn test_created_engine_has_schemes() {
        let factory = InMemoryEngineFactory::new(vec![approval_scheme()]);
        let engine = factory
            .create(wiring(Arc::new(StaticCallbacks::default())))
            .await
            .unwrap();

        let id = Uuid::new_v4();
        engine
            .create_instance(CreateInstanceParams::new("approval", id))
            .await
            .unwrap();
        assert!(engine.process_exists(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_scheme_is_rejected() {
        let mut scheme = approval_scheme();
        scheme.transitions[0].command = "reject".to_string();
        let factory = InMemoryEngineFactory::new(vec![scheme]);

        let result = factory
            .create(wiring(Arc::new(StaticCallbacks::default())))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
