//! CLI module for the workflow server
//!
//! - `serve`: run the HTTP server
//! - `check-config`: build the backend and engine, then exit

pub mod check;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Workflow Server - HTTP control surface for a pluggable workflow engine
#[derive(Parser)]
#[command(name = "workflow-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the server (default)
    Serve,

    /// Validate configuration by building the engine without serving
    CheckConfig,
}

/// Load `.env` and layered configuration, then install logging
fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);
    Ok(config)
}
