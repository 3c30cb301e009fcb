use std::sync::Arc;

use comanda_mock::{AppState, SEED_EMAIL, SEED_PASSWORD};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("comanda_mock=info,tower_http=info")),
        )
        .with_target(false)
        .init();

    let addr = std::env::var("COMANDA_MOCK_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let server = comanda_mock::serve(&addr, Arc::new(AppState::seeded())).await?;

    tracing::info!(
        url = %server.base_url(),
        email = SEED_EMAIL,
        password = SEED_PASSWORD,
        "Mock backend ready"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    Ok(())
}
