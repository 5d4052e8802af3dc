//! PinPoint Chat Proxy Server

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pinpoint_client::OpenAiTransport;
use pinpoint_server::{http, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load config
    let config = Config::from_env()?;
    let addr: SocketAddr = config.bind_addr.parse()?;

    if config.provider.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set - chat requests will fail until it is provided");
    }

    let transport = OpenAiTransport::new(config.provider.clone())?;
    info!(model = %transport.model(), base_url = %config.provider.base_url, "Provider configured");

    let state = AppState::new(Arc::new(transport));
    let router = http::create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!(error = %e, "HTTP server error");
    }

    Ok(())
}
