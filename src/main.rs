use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wicket::config::Settings;
use wicket::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(config_path.as_deref())?;
    let dispatcher = server::standalone_dispatcher(&settings)?;
    tracing::info!(config = ?dispatcher.config(), "Configuration loaded");

    tokio::select! {
        res = server::listener::run(&settings.listen_addr, Arc::new(dispatcher)) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
