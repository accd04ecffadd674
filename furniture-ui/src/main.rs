use furniture_ui::{serve, Error, FurnitureServiceClientBuilder, UiConfig, DEFAULT_UI_PORT};
use hyper::server::conn::AddrIncoming;
use std::{net::SocketAddr, sync::Arc};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = UiConfig::from_env();
    tracing::info!(base_url = %config.furniture_service_base, "Using furniture service");

    let client = Arc::new(
        FurnitureServiceClientBuilder::new()
            .with_base_url(config.furniture_service_base)
            .build(),
    );

    let runtime = Runtime::new()?;
    runtime.block_on(async move {
        let incoming = AddrIncoming::bind(&SocketAddr::from(([127, 0, 0, 1], DEFAULT_UI_PORT)))?;

        serve(incoming, client, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Couldn't listen for shutdown signal: {}", e);
            }
        })
        .await
    })
}
