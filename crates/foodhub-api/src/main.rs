//! Process entry point. Wires tracing, configuration, the catalog
//! database, and the optional EAN-DB lookup client, then serves the
//! Axum app on the configured port (default 8080).

use foodhub_api::state::{AppConfig, AppState};
use foodhub_eandb::{EanDbClient, EanDbConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;

    // EAN-DB credentials are optional; without them barcode intake
    // answers 503 while the rest of the catalog keeps working.
    let lookup = match (std::env::var("EAN_DB_API_URL"), std::env::var("EAN_DB_JWT")) {
        (Ok(base_url), Ok(token)) => match EanDbClient::new(EanDbConfig::new(base_url, token)) {
            Ok(client) => {
                tracing::info!("EAN-DB lookup client configured");
                Some(client)
            }
            Err(e) => {
                tracing::error!("failed to build the EAN-DB client: {e}");
                return Err(e.into());
            }
        },
        _ => {
            tracing::warn!(
                "EAN-DB lookup client not configured: set EAN_DB_API_URL and EAN_DB_JWT. \
                 Barcode intake will return 503."
            );
            None
        }
    };

    let pool = foodhub_api::db::init_pool().await.map_err(|e| {
        tracing::error!("database initialization failed: {e}");
        e
    })?;

    let state = AppState::with_config(config, pool, lookup);
    let app = foodhub_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("FoodHub API listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
