//! Stock Stream Server Binary
//!
//! Starts the HTTP server that streams simulated stock prices.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin stock-stream-server
//! ```
//!
//! # Environment Variables
//!
//! - `STOCK_STREAM_PORT`: HTTP listen port (default: 8080)
//! - `STOCK_STREAM_TICK_MS`: milliseconds between frames (default: 1000)
//! - `STOCK_STREAM_MAX_TICKS`: frames per stream (default: 10)
//! - `RUST_LOG`: log level (default: info)

use stock_stream_server::infrastructure::telemetry;
use stock_stream_server::{ServerConfig, StreamServer};
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    telemetry::init();

    tracing::info!("Starting stock stream server");

    let config = ServerConfig::from_env()?;
    tracing::info!(
        port = config.port,
        tick_interval = ?config.session.tick_interval,
        max_ticks = config.session.max_ticks,
        "Configuration loaded"
    );

    let shutdown_token = CancellationToken::new();
    let server = StreamServer::new(config.port, config.session, shutdown_token.clone());

    tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!(error = %e, "Stream server error");
        }
    });

    await_shutdown(shutdown_token).await;

    tracing::info!("Stock stream server stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
