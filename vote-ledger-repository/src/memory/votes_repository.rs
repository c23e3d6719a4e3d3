//! In-memory implementation of the vote repository.
//!
//! All state lives behind a single `RwLock`. `commit_vote` holds the write lock
//! for the whole check-and-apply, so commits are atomic and serializable.
use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use vote_ledger_shared::types::{
    TargetAggregate, TargetId, TargetType, UserId, VoteChange, VoteRecord,
};

use crate::{VoteRepository, VoteRepositoryError};

#[derive(Default)]
struct MemoryState {
    votes: HashMap<(UserId, TargetId), VoteRecord>,
    targets: HashMap<(TargetType, TargetId), TargetAggregate>,
}

/// Memory-backed vote repository.
///
/// Used by tests and by callers embedding the ledger without a database.
#[derive(Default)]
pub struct MemoryVoteRepository {
    state: RwLock<MemoryState>,
}

impl MemoryVoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every stored vote record, ordered by user then target.
    pub async fn vote_records(&self) -> Vec<VoteRecord> {
        let state = self.state.read().await;
        let mut records: Vec<VoteRecord> = state.votes.values().cloned().collect();
        records.sort_by(|a, b| {
            (&a.user_id, &a.target_id).cmp(&(&b.user_id, &b.target_id))
        });
        records
    }
}

#[async_trait]
impl VoteRepository for MemoryVoteRepository {
    async fn get_user_vote(
        &self,
        user_id: &UserId,
        target_id: &TargetId,
    ) -> Result<Option<VoteRecord>, VoteRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .votes
            .get(&(user_id.clone(), target_id.clone()))
            .cloned())
    }

    async fn get_user_votes(
        &self,
        user_id: &UserId,
        target_ids: &[TargetId],
    ) -> Result<Vec<VoteRecord>, VoteRepositoryError> {
        let state = self.state.read().await;
        Ok(target_ids
            .iter()
            .filter_map(|target_id| state.votes.get(&(user_id.clone(), target_id.clone())))
            .cloned()
            .collect())
    }

    async fn get_votes_for_targets(
        &self,
        target_ids: &[TargetId],
    ) -> Result<Vec<VoteRecord>, VoteRepositoryError> {
        if target_ids.is_empty() {
            return Ok(Vec::new());
        }
        let state = self.state.read().await;
        Ok(state
            .votes
            .values()
            .filter(|record| target_ids.contains(&record.target_id))
            .cloned()
            .collect())
    }

    async fn get_target(
        &self,
        target_type: TargetType,
        target_id: &TargetId,
    ) -> Result<Option<TargetAggregate>, VoteRepositoryError> {
        let state = self.state.read().await;
        Ok(state.targets.get(&(target_type, target_id.clone())).cloned())
    }

    async fn create_target(
        &self,
        target_type: TargetType,
        target_id: &TargetId,
    ) -> Result<TargetAggregate, VoteRepositoryError> {
        let mut state = self.state.write().await;
        let now = OffsetDateTime::now_utc();
        let target = state
            .targets
            .entry((target_type, target_id.clone()))
            .or_insert_with(|| TargetAggregate {
                target_type,
                target_id: target_id.clone(),
                vote_count: 0,
                created_at: now,
                updated_at: now,
            });
        Ok(target.clone())
    }

    async fn commit_vote(&self, change: &VoteChange) -> Result<i64, VoteRepositoryError> {
        let mut state = self.state.write().await;
        let MemoryState { votes, targets } = &mut *state;

        let key = (change.user_id.clone(), change.target_id.clone());
        let existing = votes.get(&key);
        if let Some(record) = existing.filter(|record| record.target_type != change.target_type) {
            return Err(VoteRepositoryError::TargetTypeMismatch {
                target_id: change.target_id.clone(),
                stored: record.target_type,
                requested: change.target_type,
            });
        }
        let stored = existing.map(|record| record.direction);
        if stored != change.expected {
            return Err(VoteRepositoryError::Conflict {
                user_id: change.user_id.clone(),
                target_id: change.target_id.clone(),
            });
        }

        // Checked before any write so a missing target leaves no trace.
        let target = targets
            .get_mut(&(change.target_type, change.target_id.clone()))
            .ok_or_else(|| VoteRepositoryError::TargetNotFound {
                target_type: change.target_type,
                target_id: change.target_id.clone(),
            })?;

        let now = OffsetDateTime::now_utc();
        match change.next {
            Some(direction) => {
                votes
                    .entry(key)
                    .and_modify(|record| {
                        record.direction = direction;
                        record.updated_at = now;
                    })
                    .or_insert_with(|| VoteRecord {
                        user_id: change.user_id.clone(),
                        target_id: change.target_id.clone(),
                        target_type: change.target_type,
                        direction,
                        created_at: now,
                        updated_at: now,
                    });
            }
            None => {
                votes.remove(&key);
            }
        }

        target.vote_count += change.delta;
        target.updated_at = now;
        Ok(target.vote_count)
    }

    async fn check_tables_created(&self) -> Result<bool, VoteRepositoryError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vote_ledger_shared::types::{Direction, VoteTransition};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn target(id: &str) -> TargetId {
        TargetId::new(id).unwrap()
    }

    fn change(
        user_id: &str,
        target_id: &str,
        previous: Option<Direction>,
        clicked: Direction,
    ) -> VoteChange {
        VoteChange::new(
            user(user_id),
            target(target_id),
            TargetType::Question,
            VoteTransition::compute(previous, clicked),
        )
    }

    #[tokio::test]
    async fn test_create_target_is_idempotent() {
        let repository = MemoryVoteRepository::new();
        let created = repository
            .create_target(TargetType::Question, &target("q1"))
            .await
            .unwrap();
        assert_eq!(created.vote_count, 0);

        repository
            .commit_vote(&change("u1", "q1", None, Direction::Up))
            .await
            .unwrap();

        let again = repository
            .create_target(TargetType::Question, &target("q1"))
            .await
            .unwrap();
        assert_eq!(again.vote_count, 1);
    }

    #[tokio::test]
    async fn test_commit_inserts_updates_and_deletes() {
        let repository = MemoryVoteRepository::new();
        repository
            .create_target(TargetType::Question, &target("q1"))
            .await
            .unwrap();

        let count = repository
            .commit_vote(&change("u1", "q1", None, Direction::Up))
            .await
            .unwrap();
        assert_eq!(count, 1);

        let count = repository
            .commit_vote(&change("u1", "q1", Some(Direction::Up), Direction::Down))
            .await
            .unwrap();
        assert_eq!(count, -1);
        let record = repository
            .get_user_vote(&user("u1"), &target("q1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.direction, Direction::Down);

        let count = repository
            .commit_vote(&change("u1", "q1", Some(Direction::Down), Direction::Down))
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(repository
            .get_user_vote(&user("u1"), &target("q1"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_stale_precondition_conflicts_without_writing() {
        let repository = MemoryVoteRepository::new();
        repository
            .create_target(TargetType::Question, &target("q1"))
            .await
            .unwrap();
        repository
            .commit_vote(&change("u1", "q1", None, Direction::Up))
            .await
            .unwrap();

        // Computed from a read that predates the first commit.
        let err = repository
            .commit_vote(&change("u1", "q1", None, Direction::Down))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let target = repository
            .get_target(TargetType::Question, &target("q1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(target.vote_count, 1);
        assert_eq!(repository.vote_records().await.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_target_writes_nothing() {
        let repository = MemoryVoteRepository::new();
        let err = repository
            .commit_vote(&change("u1", "ghost", None, Direction::Up))
            .await
            .unwrap_err();
        assert!(matches!(err, VoteRepositoryError::TargetNotFound { .. }));
        assert!(repository.vote_records().await.is_empty());
    }

    #[tokio::test]
    async fn test_counter_is_scoped_by_target_type() {
        let repository = MemoryVoteRepository::new();
        repository
            .create_target(TargetType::Answer, &target("x"))
            .await
            .unwrap();

        let err = repository
            .commit_vote(&change("u1", "x", None, Direction::Up))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VoteRepositoryError::TargetNotFound {
                target_type: TargetType::Question,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_vote_under_other_target_type_is_rejected() {
        let repository = MemoryVoteRepository::new();
        repository
            .create_target(TargetType::Question, &target("x"))
            .await
            .unwrap();
        repository
            .create_target(TargetType::Answer, &target("x"))
            .await
            .unwrap();
        repository
            .commit_vote(&change("u1", "x", None, Direction::Up))
            .await
            .unwrap();

        // Same pair, precondition matches, but filed under the answer.
        let toggle = VoteChange::new(
            user("u1"),
            target("x"),
            TargetType::Answer,
            VoteTransition::compute(Some(Direction::Up), Direction::Up),
        );
        let err = repository.commit_vote(&toggle).await.unwrap_err();
        assert!(matches!(
            err,
            VoteRepositoryError::TargetTypeMismatch {
                stored: TargetType::Question,
                requested: TargetType::Answer,
                ..
            }
        ));
        assert!(!err.is_conflict());

        let question = repository
            .get_target(TargetType::Question, &target("x"))
            .await
            .unwrap()
            .unwrap();
        let answer = repository
            .get_target(TargetType::Answer, &target("x"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!((question.vote_count, answer.vote_count), (1, 0));
        assert_eq!(repository.vote_records().await.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_lookups() {
        let repository = MemoryVoteRepository::new();
        for id in ["q1", "q2", "q3"] {
            repository
                .create_target(TargetType::Question, &target(id))
                .await
                .unwrap();
        }
        repository
            .commit_vote(&change("u1", "q1", None, Direction::Up))
            .await
            .unwrap();
        repository
            .commit_vote(&change("u1", "q3", None, Direction::Down))
            .await
            .unwrap();
        repository
            .commit_vote(&change("u2", "q1", None, Direction::Down))
            .await
            .unwrap();

        let mine = repository
            .get_user_votes(&user("u1"), &[target("q1"), target("q2"), target("q3")])
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);

        let on_q1 = repository
            .get_votes_for_targets(&[target("q1")])
            .await
            .unwrap();
        assert_eq!(on_q1.len(), 2);

        assert!(repository
            .get_votes_for_targets(&[])
            .await
            .unwrap()
            .is_empty());
    }
}
