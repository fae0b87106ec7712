//! Loads process schemes from JSON files

use std::path::Path;

use tracing::{debug, info};

use crate::domain::{DomainError, ProcessScheme};

pub struct SchemeLoader;

impl SchemeLoader {
    /// Load every `*.json` scheme in `dir`. A missing directory yields no schemes.
    pub async fn load_from_dir(dir: &Path) -> Result<Vec<ProcessScheme>, DomainError> {
        if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
            debug!(dir = %dir.display(), "Scheme directory does not exist");
            return Ok(Vec::new());
        }

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| DomainError::configuration(format!("Failed to read '{}': {}", dir.display(), e)))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::configuration(format!("Failed to read '{}': {}", dir.display(), e)))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut schemes: Vec<ProcessScheme> = Vec::with_capacity(paths.len());
        for path in paths {
            let scheme = Self::load_from_file(&path).await?;

            if schemes.iter().any(|s| s.code == scheme.code) {
                return Err(DomainError::configuration(format!(
                    "Scheme '{}' is defined more than once ({})",
                    scheme.code,
                    path.display()
                )));
            }
            schemes.push(scheme);
        }

        info!(dir = %dir.display(), count = schemes.len(), "Schemes loaded");
        Ok(schemes)
    }

    pub async fn load_from_file(path: &Path) -> Result<ProcessScheme, DomainError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::configuration(format!("Failed to read '{}': {}", path.display(), e)))?;

        Self::load_from_str(&content)
            .map_err(|e| DomainError::configuration(format!("{}: {}", path.display(), e)))
    }

    pub fn load_from_str(json: &str) -> Result<ProcessScheme, DomainError> {
        let scheme: ProcessScheme = serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("Invalid scheme JSON: {}", e)))?;
        scheme.validate()?;
        Ok(scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::engine::fixtures::approval_scheme;

    #[tokio::test]
    async fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::to_string(&approval_scheme()).unwrap();
        std::fs::write(dir.path().join("approval.json"), json).unwrap();
        std::fs::write(dir.path().join("README.md"), "not a scheme").unwrap();

        let schemes = SchemeLoader::load_from_dir(dir.path()).await.unwrap();

        assert_eq!(schemes, vec![approval_scheme()]);
    }

    #[tokio::test]
    async fn test_missing_dir_is_empty() {
        let schemes = SchemeLoader::load_from_dir(Path::new("/nonexistent/schemes"))
            .await
            .unwrap();
        assert!(schemes.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_codes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::to_string(&approval_scheme()).unwrap();
        std::fs::write(dir.path().join("a.json"), &json).unwrap();
        std::fs::write(dir.path().join("b.json"), &json).unwrap();

        let err = SchemeLoader::load_from_dir(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("defined more than once"));
    }

    #[test]
    fn test_minimal_scheme_defaults() {
        let scheme = SchemeLoader::load_from_str(
            r#"{"code": "simple", "states": [{"name": "Open", "is_initial": true}]}"#,
        )
        .unwrap();

        assert!(scheme.commands.is_empty());
        assert!(scheme.states[0].allow_set);
    }

    #[test]
    fn test_malformed_json() {
        let err = SchemeLoader::load_from_str("{").unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
