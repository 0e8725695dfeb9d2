//! Site ledger: worker attendance, advances and weekly payroll for a
//! construction site office, served as a JSON API.

pub mod backend;

use anyhow::Result;
use log::info;
use tokio::net::TcpListener;

pub use backend::config::Config;
pub use backend::{create_router, initialize_backend, AppState};

/// Build the backend from `config` and serve it until the process exits
pub async fn run(config: Config) -> Result<()> {
    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, &config.cors_origin)?;

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Site ledger listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
