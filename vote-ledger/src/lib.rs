//! Vote Ledger Library
//!
//! This library provides the vote ledger service: submitting and reading votes
//! on questions and answers, keeping each target's aggregate counter equal to the
//! signed sum of its votes. It also provides configuration management, error
//! handling, an optimistic client-side mirror and commit notifications.

pub mod config;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod optimistic;
pub mod request;

pub use config::{Dependencies, VoteLedgerConfig};
pub use errors::{StartupError, VoteError};
pub use events::VoteEvent;
pub use ledger::{TargetAudit, VoteLedger, VoteOutcome};
pub use optimistic::{OptimisticVotes, PendingVote, VoteSnapshot};
pub use request::VoteRequest;
