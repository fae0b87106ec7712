//! Process-wide engine handle

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{BackendKind, PersistenceProvider, WorkflowEngine};

/// Engine built once at startup together with the providers it runs over.
/// Cloning shares the same engine.
#[derive(Clone)]
pub struct EngineHandle {
    engine: Arc<dyn WorkflowEngine>,
    persistence: Arc<dyn PersistenceProvider>,
    scheme_persistence: Option<Arc<dyn PersistenceProvider>>,
    runtime_id: Uuid,
}

impl EngineHandle {
    pub fn new(
        engine: Arc<dyn WorkflowEngine>,
        persistence: Arc<dyn PersistenceProvider>,
        runtime_id: Uuid,
    ) -> Self {
        Self {
            engine,
            persistence,
            scheme_persistence: None,
            runtime_id,
        }
    }

    pub fn with_scheme_persistence(
        mut self,
        scheme_persistence: Option<Arc<dyn PersistenceProvider>>,
    ) -> Self {
        self.scheme_persistence = scheme_persistence;
        self
    }

    pub fn engine(&self) -> &dyn WorkflowEngine {
        self.engine.as_ref()
    }

    pub fn backend(&self) -> BackendKind {
        self.persistence.kind()
    }

    pub fn runtime_id(&self) -> Uuid {
        self.runtime_id
    }

    /// Instance storage first, then scheme storage when separate
    pub fn providers(&self) -> Vec<(&'static str, &dyn PersistenceProvider)> {
        let mut providers = vec![("persistence", self.persistence.as_ref())];

        if let Some(schemes) = &self.scheme_persistence {
            providers.push(("scheme_persistence", schemes.as_ref()));
        }

        providers
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle")
            .field("runtime_id", &self.runtime_id)
            .field("persistence", &self.persistence)
            .field("scheme_persistence", &self.scheme_persistence)
            .finish_non_exhaustive()
    }
}
