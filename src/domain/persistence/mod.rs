//! Persistence domain - storage backends the engine can be wired to

use std::fmt::{self, Debug};
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::DomainError;

/// Supported backend tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    MsSql,
    Oracle,
    MySql,
    PostgreSql,
    RavenDb,
    MongoDb,
    /// In-process storage (for testing/development)
    Memory,
}

/// How a backend is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendFamily {
    /// Addressed by a connection string
    Relational,
    /// Addressed by a server URL plus database name
    Document,
    InProcess,
}

impl BackendKind {
    pub const ALL: [BackendKind; 7] = [
        Self::MsSql,
        Self::Oracle,
        Self::MySql,
        Self::PostgreSql,
        Self::RavenDb,
        Self::MongoDb,
        Self::Memory,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::MsSql => "mssql",
            Self::Oracle => "oracle",
            Self::MySql => "mysql",
            Self::PostgreSql => "postgresql",
            Self::RavenDb => "ravendb",
            Self::MongoDb => "mongodb",
            Self::Memory => "memory",
        }
    }

    pub fn family(&self) -> BackendFamily {
        match self {
            Self::MsSql | Self::Oracle | Self::MySql | Self::PostgreSql => {
                BackendFamily::Relational
            }
            Self::RavenDb | Self::MongoDb => BackendFamily::Document,
            Self::Memory => BackendFamily::InProcess,
        }
    }

    /// Whether schemes are stored by a provider distinct from instance data
    pub fn has_separate_scheme_storage(&self) -> bool {
        matches!(self, Self::MsSql)
    }
}

impl FromStr for BackendKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();

        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| {
                DomainError::configuration(format!("Provider = '{}' is not supported", s))
            })
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Storage provider handed to the engine at construction.
///
/// Its schema and wire format belong to the engine; this layer only builds
/// it, reports where it points, and pings it for readiness.
#[async_trait]
pub trait PersistenceProvider: Send + Sync + Debug {
    fn kind(&self) -> BackendKind;

    /// Where the provider points, with credentials removed
    fn target(&self) -> String;

    /// Check connectivity. `Ok(false)` means the provider cannot be pinged
    /// from this process and reachability is left to the engine.
    async fn ping(&self) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!("mssql".parse::<BackendKind>().unwrap(), BackendKind::MsSql);
        assert_eq!("PostgreSQL".parse::<BackendKind>().unwrap(), BackendKind::PostgreSql);
        assert_eq!(" mongodb ".parse::<BackendKind>().unwrap(), BackendKind::MongoDb);
        assert_eq!("memory".parse::<BackendKind>().unwrap(), BackendKind::Memory);
    }

    #[test]
    fn test_unknown_backend_is_configuration_error() {
        let err = "db2".parse::<BackendKind>().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert_eq!(
            err.to_string(),
            "Configuration error: Provider = 'db2' is not supported"
        );
    }

    #[test]
    fn test_families() {
        assert_eq!(BackendKind::Oracle.family(), BackendFamily::Relational);
        assert_eq!(BackendKind::RavenDb.family(), BackendFamily::Document);
        assert_eq!(BackendKind::Memory.family(), BackendFamily::InProcess);
        assert!(BackendKind::MsSql.has_separate_scheme_storage());
        assert!(!BackendKind::PostgreSql.has_separate_scheme_storage());
    }

    #[test]
    fn test_tags_round_trip() {
        for kind in BackendKind::ALL {
            assert_eq!(kind.tag().parse::<BackendKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.tag());
        }
    }
}
