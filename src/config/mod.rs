//! Configuration loading

mod app_config;

pub use app_config::{
    AppConfig, BackendConfig, EngineConfig, LogFormat, LoggingConfig, ServerConfig,
};
