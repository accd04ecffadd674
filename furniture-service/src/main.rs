use furniture_service::{serve, Error, FurnitureService, DEFAULT_PORT};
use hyper::server::conn::AddrIncoming;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let incoming = AddrIncoming::bind(&SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)))?;

    serve(incoming, FurnitureService::new(), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Couldn't listen for shutdown signal: {}", e);
        }
    })
    .await
}
