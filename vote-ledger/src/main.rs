//! Vote Ledger Main Entry Point
//!
//! Prepares the vote ledger's PostgreSQL schema: connects, applies the embedded
//! migrations, verifies the tables and exits.

use dotenv::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vote_ledger::{Dependencies, StartupError};
use vote_ledger_repository::VoteRepository;

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vote_ledger=info,vote_ledger_repository=info"));

    let json = env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| StartupError::Tracing(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| StartupError::Tracing(e.to_string()))?;
    }

    info!(
        service_name = "vote-ledger",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting Vote Ledger");

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    if let Err(e) = deps.repository.run_migrations().await {
        error!(error = %e, "Failed to run migrations");
        return Err(e.into());
    }

    match deps.repository.check_tables_created().await {
        Ok(true) => {
            info!(
                max_attempts = deps.ledger.config().max_attempts,
                "Vote tables ready"
            );
            Ok(())
        }
        Ok(false) => {
            error!("Vote tables missing after migrations");
            Err(StartupError::config("vote tables were not created"))
        }
        Err(e) => {
            error!(error = %e, "Failed to check vote tables");
            Err(e.into())
        }
    }
}
