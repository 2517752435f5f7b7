//! Waypoint server — real-time player location relay.
//!
//! Entry point that loads configuration, connects to the database, and
//! runs the HTTP/WebSocket server.

use tracing_subscriber::{EnvFilter, fmt};

use waypoint_core::config::AppConfig;
use waypoint_core::result::AppResult;

#[tokio::main]
async fn main() {
    let env = std::env::var("WAYPOINT_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    tracing::info!(env = %env, version = env!("CARGO_PKG_VERSION"), "Starting Waypoint");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing with the configured level and output format.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> AppResult<()> {
    let db = waypoint_database::connection::DatabasePool::connect(&config.database).await?;

    waypoint_database::migration::run_migrations(db.pool()).await?;

    waypoint_api::run_server(config, db.pool().clone()).await?;

    db.close().await;

    tracing::info!("Waypoint shut down");
    Ok(())
}
