mod config;
mod error;
mod handlers;
mod jid;
mod server;
mod session;
mod types;

use std::sync::Arc;

use clap::Parser;
use log::info;

use config::Config;
use handlers::AppState;
use server::Server;
use session::{BridgeSession, Session};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();

    let config = Config::parse();

    info!("Bridge URL: {}", config.bridge_url);
    let session = Arc::new(BridgeSession::new(
        &config.bridge_url,
        config.bridge_timeout(),
    )?);

    if session.is_connected().await {
        info!("Bridge reachable");
    } else {
        log::warn!("Bridge not reachable yet, sends will fail until it is up");
    }

    let state = AppState {
        session: session.clone(),
        api_key: config.api_key(),
    };
    if state.api_key.is_some() {
        info!("API key auth enabled");
    }

    let result = Server::new(config.bind_addr(), state)
        .run(shutdown_signal())
        .await;

    session.disconnect().await;
    result
}
