use serde::Deserialize;
use uuid::Uuid;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub backend: BackendConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Persistence backend selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend tag, e.g. `postgresql` or `mongodb`
    pub provider: String,
    /// Connection string for relational backends
    pub connection_string: String,
    /// Server URL for document stores
    pub url: String,
    /// Database name for document stores
    pub database: String,
    /// Scheme storage connection string for backends that keep schemes
    /// apart; defaults to `connection_string`
    pub scheme_connection_string: Option<String>,
    pub max_connections: u32,
}

/// Engine runtime settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Identifier of this engine runtime; generated when absent
    pub runtime_id: Option<Uuid>,
    pub license_key: Option<String>,
    /// Endpoint resolving actions and rules not implemented in process
    pub callback_api_url: Option<String>,
    pub callback_timeout_secs: u64,
    /// Ask the callback API for schemes whose code is not registered
    pub callback_gen_scheme: bool,
    pub timer_interval_secs: u64,
    /// Start the engine's background processing after wiring
    pub start_runtime: bool,
    /// Directory of JSON scheme files loaded at startup
    pub scheme_dir: Option<String>,
    /// Culture used when a request does not name one
    pub default_culture: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: "memory".to_string(),
            connection_string: String::new(),
            url: String::new(),
            database: String::new(),
            scheme_connection_string: None,
            max_connections: 10,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            runtime_id: None,
            license_key: None,
            callback_api_url: None,
            callback_timeout_secs: 30,
            callback_gen_scheme: false,
            timer_interval_secs: 1,
            start_runtime: true,
            scheme_dir: None,
            default_culture: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
