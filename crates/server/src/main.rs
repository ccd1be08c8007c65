//! mpauth session server binary.

use mpauth_server::{AppState, ServerConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load()?;
    let addr = config.listen_addr()?;

    tracing::info!(
        sku = %config.auth.sku(),
        "Starting mpauth server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let state = AppState::from_config(&config)?;
    mpauth_server::run_server(addr, state).await?;

    Ok(())
}
