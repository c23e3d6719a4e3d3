//! Error types for the vote ledger repository.
//! Consolidates and re-exports error types related to vote storage operations.
mod votes;

pub use votes::VoteRepositoryError;
