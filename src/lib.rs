//! Workflow Server
//!
//! HTTP control surface for a pluggable workflow engine:
//! - `/workflowapi` multiplexes six process operations behind one endpoint
//! - `/designerapi` passes designer calls through to the engine
//! - Instance storage is selected from configuration

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::path::Path;

use tracing::{info, warn};

use api::state::AppState;
use domain::{Locale, WorkflowEngine};
use infrastructure::backend::{BackendSelector, EngineHandle, EngineOptions};
use infrastructure::callback::builtin_code_actions;
use infrastructure::engine::{InMemoryEngineFactory, SchemeLoader};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Build the engine over the configured backend and start it
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let engine = build_engine(config).await?;

    if config.engine.start_runtime {
        engine.engine().start().await?;
    } else {
        info!("Engine runtime start disabled");
    }

    Ok(AppState::new(engine, default_culture(config)))
}

/// Build the engine without starting it
pub async fn build_engine(config: &AppConfig) -> anyhow::Result<EngineHandle> {
    let schemes = match &config.engine.scheme_dir {
        Some(dir) => SchemeLoader::load_from_dir(Path::new(dir)).await?,
        None => Vec::new(),
    };
    info!(count = schemes.len(), "Schemes loaded");

    let options = EngineOptions::from_config(&config.engine, builtin_code_actions())?;
    let factory = InMemoryEngineFactory::new(schemes);
    let handle = BackendSelector::build(&config.backend, options, &factory).await?;

    info!(
        backend = %handle.backend(),
        runtime_id = %handle.runtime_id(),
        "Workflow engine ready"
    );

    Ok(handle)
}

/// Configured culture, then the process locale, then en-US
fn default_culture(config: &AppConfig) -> Locale {
    if let Some(tag) = config.engine.default_culture.as_deref() {
        match Locale::new(tag) {
            Ok(locale) => return locale,
            Err(e) => warn!(error = %e, "Ignoring configured default culture"),
        }
    }

    Locale::from_environment().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_state_uses_in_memory_backend() {
        let state = create_app_state().await.unwrap();
        assert_eq!(state.engine.backend().to_string(), "memory");
    }

    #[tokio::test]
    async fn test_unknown_backend_fails_startup() {
        let mut config = AppConfig::default();
        config.backend.provider = "db2".to_string();

        let err = create_app_state_with_config(&config).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Provider = 'db2' is not supported"
        );
    }

    #[test]
    fn test_configured_culture_wins() {
        let mut config = AppConfig::default();
        config.engine.default_culture = Some("de_DE".to_string());
        assert_eq!(default_culture(&config).as_str(), "de-DE");
    }
}
