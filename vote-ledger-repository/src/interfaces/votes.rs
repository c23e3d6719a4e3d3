//! This module defines the `VoteRepository` trait, which provides an interface
//! for interacting with the underlying data store for vote records and target counters.
//! It abstracts the database operations for persistence and retrieval.
use crate::errors::VoteRepositoryError;
use vote_ledger_shared::types::{TargetAggregate, TargetId, TargetType, UserId, VoteChange, VoteRecord};

/// A trait that defines the interface for interacting with the vote data repository.
///
/// Implementors provide point and batch lookups of vote records, target aggregate
/// management, and the atomic commit of a vote change together with its counter delta.
#[async_trait::async_trait]
pub trait VoteRepository: Send + Sync {
    /// Retrieves the vote record for a `(user, target)` pair.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The voting user
    /// * `target_id` - The question or answer voted on
    ///
    /// # Returns
    ///
    /// * `Ok(Some(VoteRecord))` - The user's current vote
    /// * `Ok(None)` - The user has no vote on the target
    /// * `Err(VoteRepositoryError)` - Storage failure
    async fn get_user_vote(
        &self,
        user_id: &UserId,
        target_id: &TargetId,
    ) -> Result<Option<VoteRecord>, VoteRepositoryError>;

    /// Retrieves a user's vote records for several targets at once.
    ///
    /// Targets the user has not voted on are simply absent from the result.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The voting user
    /// * `target_ids` - Targets to look up (an empty slice returns an empty vector)
    ///
    /// # Returns
    ///
    /// A `Result` containing the matching vote records or a `VoteRepositoryError`.
    async fn get_user_votes(
        &self,
        user_id: &UserId,
        target_ids: &[TargetId],
    ) -> Result<Vec<VoteRecord>, VoteRepositoryError>;

    /// Retrieves every vote record referencing any of the given targets.
    ///
    /// # Arguments
    ///
    /// * `target_ids` - Targets to look up (an empty slice returns an empty vector)
    ///
    /// # Returns
    ///
    /// A `Result` containing the matching vote records or a `VoteRepositoryError`.
    async fn get_votes_for_targets(
        &self,
        target_ids: &[TargetId],
    ) -> Result<Vec<VoteRecord>, VoteRepositoryError>;

    /// Retrieves the aggregate owning a target's vote counter.
    async fn get_target(
        &self,
        target_type: TargetType,
        target_id: &TargetId,
    ) -> Result<Option<TargetAggregate>, VoteRepositoryError>;

    /// Creates a target aggregate with a zero counter.
    ///
    /// Creating a target that already exists leaves it untouched and returns it.
    async fn create_target(
        &self,
        target_type: TargetType,
        target_id: &TargetId,
    ) -> Result<TargetAggregate, VoteRepositoryError>;

    /// Atomically applies a vote change and its counter delta.
    ///
    /// The change is applied only if the stored direction for the pair still equals
    /// `change.expected`. The record write (insert, update or delete) and the
    /// increment of the target's `vote_count` by `change.delta` commit together or
    /// not at all.
    ///
    /// # Arguments
    ///
    /// * `change` - The change computed from a previous read of the pair
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - The target's new `vote_count`
    /// * `Err(VoteRepositoryError::Conflict)` - The stored direction changed since the read
    /// * `Err(VoteRepositoryError::TargetNotFound)` - The target aggregate does not exist
    /// * `Err(VoteRepositoryError)` - Any other storage failure, with nothing written
    async fn commit_vote(&self, change: &VoteChange) -> Result<i64, VoteRepositoryError>;

    /// Checks that the tables backing the repository exist.
    async fn check_tables_created(&self) -> Result<bool, VoteRepositoryError>;
}
