//! Check-config command - builds the backend and engine without serving

use tracing::info;

/// Exit non-zero when the backend or engine cannot be built
pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config()?;

    let engine = crate::build_engine(&config).await?;

    for (name, provider) in engine.providers() {
        info!(
            provider = name,
            kind = %provider.kind(),
            target = %provider.target(),
            "Provider configured"
        );
    }

    info!("Configuration is valid");
    Ok(())
}
