// darija-translate - Gemini-backed Darija translation service
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use darija_translate::cli::Args;
use darija_translate::config::AppConfig;
use darija_translate::gemini::GeminiClient;
use darija_translate::server::create_router;
use darija_translate::utils::logging;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load .env, then configuration
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting darija-translate v{}", env!("CARGO_PKG_VERSION"));
    if dotenv_loaded {
        info!(".env loaded successfully");
    }
    if config.mode.is_development() {
        warn!("Development mode: error responses include internal details");
    }

    // Phase 3: Build the Gemini client shared by all requests
    let gemini_client = GeminiClient::new(&config.gemini)?;
    if gemini_client.has_api_key() {
        info!("Gemini API key present");
    } else {
        warn!("GEMINI_API_KEY is missing: translations will fail until it is set");
    }

    // Phase 4: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let model = config.gemini.model.clone();
    let app = create_router(config, gemini_client)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on {}", addr);
    info!("API: http://{}/api/translate", addr);
    info!("Health: http://{}/api/health", addr);
    info!("Model: {}", model);

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
