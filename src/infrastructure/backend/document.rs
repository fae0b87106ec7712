//! Document stores addressed by a server URL and a database name

use std::time::Duration;

use async_trait::async_trait;

use super::relational::redact_connection_string;
use crate::domain::{BackendFamily, BackendKind, DomainError, PersistenceProvider};

const PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct DocumentStoreProvider {
    kind: BackendKind,
    url: String,
    database: String,
    /// Set for stores served over HTTP (RavenDB); MongoDB speaks its own
    /// wire protocol and is left to the engine's driver
    client: Option<reqwest::Client>,
}

impl DocumentStoreProvider {
    pub fn new(kind: BackendKind, url: &str, database: &str) -> Result<Self, DomainError> {
        if kind.family() != BackendFamily::Document {
            return Err(DomainError::configuration(format!(
                "Provider '{}' is not a document store",
                kind
            )));
        }

        if url.trim().is_empty() || database.trim().is_empty() {
            return Err(DomainError::configuration(format!(
                "Provider '{}' requires both url and database",
                kind
            )));
        }

        let url = url.trim_end_matches('/').to_string();
        let client = if kind == BackendKind::RavenDb && is_http(&url) {
            Some(
                reqwest::Client::builder()
                    .timeout(PING_TIMEOUT)
                    .build()
                    .map_err(|e| {
                        DomainError::configuration(format!("Failed to build HTTP client: {}", e))
                    })?,
            )
        } else {
            None
        };

        Ok(Self {
            kind,
            url,
            database: database.to_string(),
            client,
        })
    }
}

fn is_http(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    url.starts_with("http://") || url.starts_with("https://")
}

#[async_trait]
impl PersistenceProvider for DocumentStoreProvider {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn target(&self) -> String {
        format!("{}/{}", redact_connection_string(&self.url), self.database)
    }

    async fn ping(&self) -> Result<bool, DomainError> {
        let Some(client) = &self.client else {
            return Ok(false);
        };

        client
            .get(format!("{}/build/version", self.url))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map(|_| true)
            .map_err(|e| DomainError::storage(format!("{} ping failed: {}", self.kind, e)))
    }
}
