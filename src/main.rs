//! Accident Risk Prediction API - Main Entry Point
//!
//! # Usage
//!
//! ```bash
//! risk-server --model-path models/accident_model.json
//! risk-server --config risk.toml --load-policy cached
//! RISK_PORT=9000 risk-server
//! ```

use clap::Parser;
use risk_scoring::{build_router, AppState, ConfigOverrides, LoadPolicy, RiskScorer, ServiceConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "risk-server")]
#[command(version)]
#[command(about = "Accident Risk Prediction API", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(long, short, env = "RISK_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServiceConfig::resolve(cli.config.as_deref(), cli.overrides)?;

    tracing::info!("Accident Risk Prediction API v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Model {} (load policy: {})",
        config.model_path.display(),
        config.load_policy
    );

    let scorer = Arc::new(RiskScorer::from_path(&config.model_path, config.load_policy));
    if config.load_policy == LoadPolicy::Cached {
        if let Err(e) = scorer.reload() {
            tracing::warn!("Model not loaded at startup: {}", e);
        }
    }

    let app = build_router(AppState::new(scorer));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Risk API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
