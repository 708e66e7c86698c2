use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod services;
mod utils;

use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobs_day=info,reqwest=warn")),
        )
        .with_target(true)
        .init();

    info!("📈 Starting jobs-day v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    match services::report_service::run(&config).await {
        Ok(chart) => {
            info!("Plotted {} observations", chart.points.len());
            println!("Chart written to {}", chart.path.display());
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
