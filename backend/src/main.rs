use std::net::SocketAddr;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pet_care_backend::config::AppConfig;
use pet_care_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if dotenvy::dotenv().is_err() {
        info!("No .env file found, using the process environment");
    }

    let config = AppConfig::from_env().inspect_err(|e| error!("Invalid configuration: {}", e))?;

    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
