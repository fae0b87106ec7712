//! In-process backend (for testing/development)

use async_trait::async_trait;

use crate::domain::{BackendKind, DomainError, PersistenceProvider};

/// Provider for engines that keep everything in process memory.
/// Data is lost when the process terminates.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryProvider;

#[async_trait]
impl PersistenceProvider for MemoryProvider {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn target(&self) -> String {
        "in-process".to_string()
    }

    async fn ping(&self) -> Result<bool, DomainError> {
        Ok(true)
    }
}
