use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use chirpy::config::ServerConfig;
use chirpy::handlers::{routes, AppState};
use chirpy::storage::MemoryStorage;

#[tokio::main]
async fn main() {
    // Initialize env
    let env_loaded = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match env_loaded {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, platform={:?}, webhook_key={}",
        config.host,
        config.port,
        config.platform,
        if config.polka_key.is_some() { "set" } else { "unset" }
    );

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(config, Arc::new(MemoryStorage::new()));

    info!("Starting Chirpy server on {}", addr);
    warp::serve(routes(state)).run(addr).await;
}
