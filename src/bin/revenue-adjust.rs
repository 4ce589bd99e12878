//! Revenue adjuster CLI
//!
//! Raises revenue by 20% on every row whose discount is between 20 and
//! 30 percent, copying everything else unchanged.
//!
//! ```bash
//! revenue-adjust ecommerce_data.csv modified_output.csv
//! ```

use clap::Parser;
use risk_scoring::revenue::adjust_file;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "revenue-adjust")]
#[command(version)]
#[command(about = "Raise revenue for rows with a 20-30% discount", long_about = None)]
struct Cli {
    /// Input CSV
    #[arg(default_value = "ecommerce_data.csv")]
    input: PathBuf,

    /// Output CSV
    #[arg(default_value = "modified_output.csv")]
    output: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match adjust_file(&cli.input, &cli.output) {
        Ok(summary) => {
            tracing::info!(
                "Wrote {}: {} rows, {} adjusted",
                cli.output.display(),
                summary.rows,
                summary.adjusted
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to adjust {}: {}", cli.input.display(), e);
            ExitCode::FAILURE
        }
    }
}
