//! Backend selection and engine construction

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use super::document::DocumentStoreProvider;
use super::handle::EngineHandle;
use super::memory::MemoryProvider;
use super::relational::RelationalProvider;
use crate::config::{BackendConfig, EngineConfig};
use crate::domain::engine::{CodeActionRegistry, NullBus, SchemeGenerator, TimerManager};
use crate::domain::{
    BackendFamily, BackendKind, DomainError, EngineFactory, EngineWiring, PersistenceProvider,
};
use crate::infrastructure::callback::{CallbackConfig, CallbackProvider};

/// Engine settings that do not depend on the backend
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub runtime_id: Uuid,
    pub license_key: Option<String>,
    pub timers: TimerManager,
    pub callbacks: Arc<CallbackProvider>,
    /// Unknown scheme codes are generated through the callback API
    pub generate_schemes: bool,
    pub code_actions: CodeActionRegistry,
}

impl EngineOptions {
    pub fn from_config(
        config: &EngineConfig,
        code_actions: CodeActionRegistry,
    ) -> Result<Self, DomainError> {
        let callbacks = CallbackProvider::new(&CallbackConfig {
            url: config.callback_api_url.clone(),
            timeout: Duration::from_secs(config.callback_timeout_secs),
        })?
        .with_code_actions(code_actions.clone());

        Ok(Self {
            runtime_id: config.runtime_id.unwrap_or_else(Uuid::new_v4),
            license_key: config
                .license_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            timers: TimerManager::with_poll_interval(Duration::from_secs(
                config.timer_interval_secs.max(1),
            )),
            callbacks: Arc::new(callbacks),
            generate_schemes: config.callback_gen_scheme,
            code_actions,
        })
    }
}

/// Instance storage and, for backends that keep schemes apart, scheme storage
pub type Providers = (
    Arc<dyn PersistenceProvider>,
    Option<Arc<dyn PersistenceProvider>>,
);

pub struct BackendSelector;

impl BackendSelector {
    /// Build the provider(s) for `kind`
    pub fn create_providers(
        kind: BackendKind,
        config: &BackendConfig,
    ) -> Result<Providers, DomainError> {
        match kind.family() {
            BackendFamily::Relational => {
                let persistence = RelationalProvider::connect(
                    kind,
                    &config.connection_string,
                    config.max_connections,
                )?;

                let schemes = if kind.has_separate_scheme_storage() {
                    let connection_string = config
                        .scheme_connection_string
                        .as_deref()
                        .filter(|s| !s.trim().is_empty())
                        .unwrap_or(&config.connection_string);

                    let provider: Arc<dyn PersistenceProvider> = Arc::new(
                        RelationalProvider::connect(kind, connection_string, config.max_connections)?,
                    );
                    Some(provider)
                } else {
                    None
                };

                Ok((Arc::new(persistence), schemes))
            }
            BackendFamily::Document => Ok((
                Arc::new(DocumentStoreProvider::new(kind, &config.url, &config.database)?),
                None,
            )),
            BackendFamily::InProcess => Ok((Arc::new(MemoryProvider), None)),
        }
    }

    /// Select the backend named by the configuration and build the engine over it
    pub async fn build(
        config: &BackendConfig,
        options: EngineOptions,
        factory: &dyn EngineFactory,
    ) -> Result<EngineHandle, DomainError> {
        let kind: BackendKind = config.provider.parse()?;
        let (persistence, scheme_persistence) = Self::create_providers(kind, config)?;

        info!(
            provider = %kind,
            target = %persistence.target(),
            runtime_id = %options.runtime_id,
            "Persistence provider created"
        );

        if let Some(key) = &options.license_key {
            factory.register_license(key)?;
            info!("Engine license registered");
        } else {
            warn!("No engine license key configured");
        }

        let scheme_generator: Option<Arc<dyn SchemeGenerator>> = if options.generate_schemes {
            if !options.callbacks.is_enabled() {
                warn!("Scheme generation enabled without a callback API url");
            }
            let generator: Arc<dyn SchemeGenerator> = options.callbacks.clone();
            Some(generator)
        } else {
            None
        };

        let wiring = EngineWiring {
            runtime_id: options.runtime_id,
            persistence: persistence.clone(),
            scheme_persistence: scheme_persistence.clone(),
            bus: Arc::new(NullBus),
            timers: options.timers,
            actions: options.callbacks.clone(),
            rules: options.callbacks,
            code_actions: options.code_actions,
            scheme_generator,
            auto_update_scheme_before_get_available_commands: true,
        };

        let engine = factory.create(wiring).await?;

        Ok(EngineHandle::new(engine, persistence, options.runtime_id)
            .with_scheme_persistence(scheme_persistence))
    }
}
