//! Error types for the vote repository.
//! Defines specific errors that can occur during storage operations on votes and targets.
use thiserror::Error;
use vote_ledger_shared::InvalidInput;
use vote_ledger_shared::types::{TargetId, TargetType, UserId};

/// SQLSTATE raised by PostgreSQL when a serializable transaction cannot commit.
const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE raised by PostgreSQL when a transaction is chosen as a deadlock victim.
const DEADLOCK_DETECTED: &str = "40P01";

/// Represents errors that can occur within the vote repository.
///
/// This enum consolidates storage failures and the domain outcomes a commit
/// can report: a stale precondition, a vote record filed under the other
/// target type, and a missing target aggregate.
#[derive(Debug, Error)]
pub enum VoteRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Stale vote for user {user_id} on target {target_id}")]
    Conflict { user_id: UserId, target_id: TargetId },

    #[error("Target not found: {target_type} {target_id}")]
    TargetNotFound {
        target_type: TargetType,
        target_id: TargetId,
    },

    #[error("Vote on {target_id} is recorded under {stored}, not {requested}")]
    TargetTypeMismatch {
        target_id: TargetId,
        stored: TargetType,
        requested: TargetType,
    },

    #[error("Invalid direction: {0}")]
    InvalidDirection(i16),

    #[error("Invalid target type: {0}")]
    InvalidTargetType(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] InvalidInput),
}

impl VoteRepositoryError {
    /// Returns true when the write lost a race and may succeed against a fresh read.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Conflict { .. } => true,
            Self::DatabaseError(sqlx::Error::Database(db)) => matches!(
                db.code().as_deref(),
                Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
            ),
            _ => false,
        }
    }

    /// Returns true when the backend could not be reached or the connection failed.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(
                sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::WorkerCrashed
            )
        )
    }
}
