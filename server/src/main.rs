use site_ledger::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    info!("Starting site ledger on {}", config.bind_address());
    if config.bootstrap_admin().is_none() {
        info!("No bootstrap admin configured (LEDGER_ADMIN_USERNAME / LEDGER_ADMIN_PASSWORD)");
    }

    site_ledger::run(config).await
}
