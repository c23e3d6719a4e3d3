//! Error types for the Vote Ledger.
//! Defines the error taxonomy surfaced to vote callers and the errors that can
//! occur while starting the ledger binary.
use vote_ledger_repository::VoteRepositoryError;
use vote_ledger_shared::InvalidInput;
use vote_ledger_shared::types::{TargetId, TargetType};

/// Errors surfaced by `VoteLedger` operations.
///
/// Callers are expected to collapse these into a retryable / non-retryable
/// signal with `is_retryable` and show their own message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoteError {
    /// No caller identity was supplied. Nothing was read or written.
    #[error("Authentication required to vote")]
    Unauthenticated,

    /// Malformed identifiers, direction or target type. Nothing was read or written.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The target aggregate does not exist. Nothing was written.
    #[error("Target not found: {target_type} {target_id}")]
    TargetNotFound {
        target_type: TargetType,
        target_id: TargetId,
    },

    /// The vote transaction kept losing races and was aborted.
    #[error("Vote aborted after {attempts} conflicting attempt(s)")]
    Conflict { attempts: u32 },

    /// The storage backend could not be reached.
    #[error("Vote storage unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl VoteError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an unknown error.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Returns true when retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Unavailable(_))
    }
}

impl From<InvalidInput> for VoteError {
    fn from(err: InvalidInput) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<VoteRepositoryError> for VoteError {
    fn from(err: VoteRepositoryError) -> Self {
        if err.is_conflict() {
            return Self::Conflict { attempts: 1 };
        }
        if err.is_unavailable() {
            return Self::Unavailable(err.to_string());
        }
        match err {
            VoteRepositoryError::TargetNotFound {
                target_type,
                target_id,
            } => Self::TargetNotFound {
                target_type,
                target_id,
            },
            mismatch @ VoteRepositoryError::TargetTypeMismatch { .. } => {
                Self::invalid_argument(mismatch.to_string())
            }
            other => Self::unknown(other.to_string()),
        }
    }
}

/// Errors that can occur while wiring up and starting the ledger binary.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Repository error: {0}")]
    Repository(#[from] VoteRepositoryError),
    #[error("Tracing initialization error: {0}")]
    Tracing(String),
}

impl StartupError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
