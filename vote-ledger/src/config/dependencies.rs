//! Dependency initialization and wiring for the vote ledger binary.
use std::env;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;
use vote_ledger_repository::PostgresVoteRepository;

use crate::config::VoteLedgerConfig;
use crate::errors::StartupError;
use crate::ledger::VoteLedger;

/// Default size of the PostgreSQL connection pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Load database settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
    ///
    /// # Returns
    ///
    /// * `Ok(DatabaseConfig)` - Parsed settings
    /// * `Err(StartupError::Config)` - If `DATABASE_URL` is missing or the pool size is invalid
    pub fn from_env() -> Result<Self, StartupError> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| StartupError::config("DATABASE_URL must be set"))?;

        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Err(_) => DEFAULT_MAX_CONNECTIONS,
            Ok(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    StartupError::config(format!("Invalid DATABASE_MAX_CONNECTIONS: {raw}"))
                })?,
        };

        Ok(Self {
            url,
            max_connections,
        })
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The PostgreSQL repository, also used for schema management.
    pub repository: Arc<PostgresVoteRepository>,
    /// The ledger wired to the repository.
    pub ledger: VoteLedger,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(StartupError)` - If configuration is invalid or the database is unreachable
    pub async fn new() -> Result<Self, StartupError> {
        let database = DatabaseConfig::from_env()?;
        let ledger_config = VoteLedgerConfig::from_env();

        info!(
            max_connections = database.max_connections,
            max_attempts = ledger_config.max_attempts,
            "Initializing dependencies"
        );

        let pool = PgPoolOptions::new()
            .max_connections(database.max_connections)
            .connect(&database.url)
            .await?;

        let repository = Arc::new(PostgresVoteRepository::new(pool).await?);
        let ledger = VoteLedger::with_config(repository.clone(), ledger_config);

        Ok(Self { repository, ledger })
    }
}
