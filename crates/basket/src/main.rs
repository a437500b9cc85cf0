//! Basket runner entry point.

use std::process::ExitCode;

use basket::{AppError, Config, config::LogFormat};
use domain::BasketService;
use event_log::InMemoryLogStore;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(config: &Config) {
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config);

    // 2. Create the log store and service
    let service = BasketService::new(InMemoryLogStore::new());

    // 3. Run the script
    match basket::run(&config, &service).await {
        Ok(_) => {
            tracing::info!("script finished");
            ExitCode::SUCCESS
        }
        Err(e @ AppError::Script { .. }) => {
            tracing::error!(error = %e, "invalid script");
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}
