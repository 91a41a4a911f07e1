//! signal-relay binary entry point.
//!
//! Usage:
//! ```bash
//! signal-relay --config relay.toml
//! ```
//!
//! With no config file present, built-in defaults apply (listen on
//! 0.0.0.0:8080).

use airbridge_signal_relay::config::Config;
use airbridge_signal_relay::error::Result;
use airbridge_signal_relay::http;
use airbridge_signal_relay::server::SignalRelay;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = get_config_path();
    let config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        tracing::info!(path = %config_path.display(), "no config file, using defaults");
        Config::default()
    };

    http::health::init_start_time();

    let bind_address = config.server.bind_address.clone();
    let relay = Arc::new(SignalRelay::new(config));
    let app = http::build_router(relay);

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!("AirBridge signaling relay listening on {}", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}

fn get_config_path() -> PathBuf {
    std::env::args()
        .skip_while(|arg| arg != "--config")
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("relay.toml"))
}
