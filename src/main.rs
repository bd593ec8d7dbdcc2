use std::net::SocketAddr;

use onlyprompts::{config::Config, run_app};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("invalid configuration: {:#}", error);
            std::process::exit(1);
        }
    };

    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(3001);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("server started on {}", addr);
    if let Err(error) = run_app(addr, config).await {
        tracing::error!("server error: {:#}", error);
        std::process::exit(1);
    }
}
