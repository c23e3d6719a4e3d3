//! Vote ledger service implementation.
//!
//! This module provides the service that records votes on questions and answers.
//! A vote is a read-modify-write over two records (the user's vote and the
//! target's counter) that the repository commits atomically, guarded by the
//! direction observed in the read. Losing a race on the same `(user, target)`
//! pair re-runs the whole sequence with a fresh read.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_retry::RetryIf;
use tokio_retry::strategy::jitter;
use tracing::{debug, info, instrument, warn};
use vote_ledger_repository::VoteRepository;
use vote_ledger_shared::types::{
    Direction, TargetAggregate, TargetId, TargetType, UserId, VoteChange, VoteRecord, VoteTally,
    VoteTransition,
};

use crate::config::VoteLedgerConfig;
use crate::errors::VoteError;
use crate::events::VoteEvent;
use crate::request::VoteRequest;

/// The result of a committed vote.
///
/// Carries both the new state and the state the operation started from, so a
/// caller that applied the click optimistically can reconcile or roll back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub user_id: UserId,
    pub target_id: TargetId,
    pub target_type: TargetType,
    /// Direction stored before the commit.
    pub previous: Option<Direction>,
    /// Direction stored after the commit; `None` once toggled off.
    pub next: Option<Direction>,
    /// Change applied to the target's counter.
    pub delta: i64,
    /// Counter after the commit.
    pub vote_count: i64,
    /// Counter immediately before the commit.
    pub previous_vote_count: i64,
    /// Read-modify-write attempts it took, starting at 1.
    pub attempts: u32,
}

impl VoteOutcome {
    /// The committed transition, from `previous` to `next`.
    pub fn transition(&self) -> VoteTransition {
        VoteTransition {
            previous: self.previous,
            next: self.next,
        }
    }
}

/// Result of comparing a target's stored counter with its vote records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAudit {
    pub target_type: TargetType,
    pub target_id: TargetId,
    pub vote_count: i64,
    pub tally: VoteTally,
    /// True when the counter equals the signed sum of the target's votes.
    pub consistent: bool,
}

/// The main service for voting on questions and answers.
///
/// This is the high-level API that request or UI handlers use. It validates
/// input, enforces authentication, computes transitions and delegates atomic
/// persistence to a `VoteRepository`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use vote_ledger::{VoteLedger, VoteRequest};
/// use vote_ledger_repository::MemoryVoteRepository;
/// use vote_ledger_shared::types::{TargetId, TargetType, UserId};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let ledger = VoteLedger::new(Arc::new(MemoryVoteRepository::new()));
/// let answer = TargetId::new("answer-1")?;
/// ledger.register_target(TargetType::Answer, &answer).await?;
///
/// let caller = UserId::new("user-1")?;
/// let outcome = ledger
///     .submit_vote(Some(&caller), VoteRequest::parse("answer-1", "answer", 1)?)
///     .await?;
/// assert_eq!(outcome.vote_count, 1);
/// # Ok(())
/// # }
/// ```
pub struct VoteLedger {
    repository: Arc<dyn VoteRepository>,
    config: VoteLedgerConfig,
    events: broadcast::Sender<VoteEvent>,
}

impl VoteLedger {
    /// Create a new VoteLedger with default configuration.
    ///
    /// # Arguments
    ///
    /// * `repository` - The storage backend (e.g., `PostgresVoteRepository`)
    pub fn new(repository: Arc<dyn VoteRepository>) -> Self {
        Self::with_config(repository, VoteLedgerConfig::default())
    }

    /// Create a new VoteLedger with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `repository` - The storage backend
    /// * `config` - Retry budget, backoff and event channel settings
    pub fn with_config(repository: Arc<dyn VoteRepository>, config: VoteLedgerConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            repository,
            config,
            events,
        }
    }

    pub fn config(&self) -> &VoteLedgerConfig {
        &self.config
    }

    /// Subscribe to committed vote transitions.
    ///
    /// Only events committed after the call are received. A subscriber that falls
    /// more than `event_capacity` events behind observes `RecvError::Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<VoteEvent> {
        self.events.subscribe()
    }

    /// Apply a click on a vote control.
    ///
    /// Toggles, switches or creates the caller's vote on the target and moves the
    /// target's counter by the matching delta, both in one atomic commit.
    ///
    /// # Arguments
    ///
    /// * `caller` - Identity from the identity provider; `None` if not signed in
    /// * `request` - Target, target type and clicked direction
    ///
    /// # Returns
    ///
    /// * `Ok(VoteOutcome)` - The committed transition and new counter
    /// * `Err(VoteError::Unauthenticated)` - No caller; storage was not touched
    /// * `Err(VoteError::TargetNotFound)` - The target aggregate does not exist
    /// * `Err(VoteError::Conflict)` - Every attempt lost a race on the same pair
    /// * `Err(VoteError::Unavailable)` - The storage backend could not be reached
    #[instrument(
        skip_all,
        fields(
            target_id = %request.target_id,
            target_type = %request.target_type,
            direction = request.direction.value()
        )
    )]
    pub async fn submit_vote(
        &self,
        caller: Option<&UserId>,
        request: VoteRequest,
    ) -> Result<VoteOutcome, VoteError> {
        let Some(user_id) = caller else {
            debug!("Rejecting vote without caller identity");
            return Err(VoteError::Unauthenticated);
        };

        let strategy = self.config.retry_delays().map(jitter);

        let attempts = AtomicU32::new(0);
        let ledger = self;
        let request = &request;
        let counter = &attempts;
        let result = RetryIf::spawn(
            strategy,
            move || {
                let attempt = counter.fetch_add(1, Ordering::Relaxed) + 1;
                ledger.attempt_vote(user_id, request, attempt)
            },
            |err: &VoteError| matches!(err, VoteError::Conflict { .. }),
        )
        .await;

        match result {
            Ok(outcome) => {
                info!(
                    user_id = %outcome.user_id,
                    kind = ?outcome.transition().kind(),
                    delta = outcome.delta,
                    vote_count = outcome.vote_count,
                    attempts = outcome.attempts,
                    "Vote committed"
                );
                let _ = self.events.send(VoteEvent::from(&outcome));
                Ok(outcome)
            }
            Err(VoteError::Conflict { .. }) => {
                let attempts = attempts.load(Ordering::Relaxed);
                warn!(user_id = %user_id, attempts, "Vote aborted after repeated conflicts");
                Err(VoteError::Conflict { attempts })
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Vote failed");
                Err(e)
            }
        }
    }

    /// Validate untyped input and apply it as a vote.
    ///
    /// Authentication is checked first, then the fields; either failure returns
    /// before any storage access.
    ///
    /// # Arguments
    ///
    /// * `caller` - Raw caller id from the identity provider, if any
    /// * `target_id` - Identifier of the question or answer
    /// * `target_type` - `"question"` or `"answer"`
    /// * `direction` - `1` or `-1`
    pub async fn submit_raw_vote(
        &self,
        caller: Option<&str>,
        target_id: &str,
        target_type: &str,
        direction: i64,
    ) -> Result<VoteOutcome, VoteError> {
        let Some(caller) = caller else {
            return Err(VoteError::Unauthenticated);
        };
        let user_id = UserId::new(caller)?;
        let request = VoteRequest::parse(target_id, target_type, direction)?;
        self.submit_vote(Some(&user_id), request).await
    }

    /// One read-modify-write pass.
    async fn attempt_vote(
        &self,
        user_id: &UserId,
        request: &VoteRequest,
        attempt: u32,
    ) -> Result<VoteOutcome, VoteError> {
        let existing = self
            .repository
            .get_user_vote(user_id, &request.target_id)
            .await?;
        if let Some(record) = existing
            .as_ref()
            .filter(|record| record.target_type != request.target_type)
        {
            return Err(VoteError::invalid_argument(format!(
                "Vote on {} is recorded under {}, not {}",
                request.target_id, record.target_type, request.target_type
            )));
        }
        let transition =
            VoteTransition::compute(existing.map(|record| record.direction), request.direction);

        let change = VoteChange::new(
            user_id.clone(),
            request.target_id.clone(),
            request.target_type,
            transition,
        );

        let vote_count = self.repository.commit_vote(&change).await.map_err(|e| {
            if e.is_conflict() {
                debug!(attempt, error = %e, "Vote lost a race, retrying with a fresh read");
            }
            VoteError::from(e)
        })?;

        Ok(VoteOutcome {
            user_id: change.user_id,
            target_id: change.target_id,
            target_type: change.target_type,
            previous: change.expected,
            next: change.next,
            delta: change.delta,
            vote_count,
            previous_vote_count: vote_count - change.delta,
            attempts: attempt,
        })
    }

    /// Read the caller's current direction on a target.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Direction))` - The stored vote
    /// * `Ok(None)` - No vote
    /// * `Err(VoteError)` - Storage failure
    pub async fn get_user_vote(
        &self,
        user_id: &UserId,
        target_id: &TargetId,
    ) -> Result<Option<Direction>, VoteError> {
        let record = self.repository.get_user_vote(user_id, target_id).await?;
        Ok(record.map(|record| record.direction))
    }

    /// Read a user's directions on several targets, for rendering a list.
    ///
    /// Targets without a vote are absent from the map.
    pub async fn get_user_votes(
        &self,
        user_id: &UserId,
        target_ids: &[TargetId],
    ) -> Result<HashMap<TargetId, Direction>, VoteError> {
        if target_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let records = self.repository.get_user_votes(user_id, target_ids).await?;
        Ok(records
            .into_iter()
            .map(|record| (record.target_id, record.direction))
            .collect())
    }

    /// Read every vote on each of the given targets, grouped by target.
    ///
    /// Targets without votes are absent from the map.
    pub async fn votes_for_targets(
        &self,
        target_ids: &[TargetId],
    ) -> Result<HashMap<TargetId, Vec<VoteRecord>>, VoteError> {
        if target_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let records = self.repository.get_votes_for_targets(target_ids).await?;
        let mut grouped: HashMap<TargetId, Vec<VoteRecord>> = HashMap::new();
        for record in records {
            grouped
                .entry(record.target_id.clone())
                .or_default()
                .push(record);
        }
        Ok(grouped)
    }

    /// Create the aggregate for a new question or answer with a zero counter.
    ///
    /// Registering an existing target returns it unchanged.
    #[instrument(skip(self), fields(target_id = %target_id))]
    pub async fn register_target(
        &self,
        target_type: TargetType,
        target_id: &TargetId,
    ) -> Result<TargetAggregate, VoteError> {
        let target = self.repository.create_target(target_type, target_id).await?;
        debug!(vote_count = target.vote_count, "Target registered");
        Ok(target)
    }

    /// Read a target aggregate.
    ///
    /// # Returns
    ///
    /// * `Ok(TargetAggregate)` - The aggregate and its counter
    /// * `Err(VoteError::TargetNotFound)` - No such target
    pub async fn get_target(
        &self,
        target_type: TargetType,
        target_id: &TargetId,
    ) -> Result<TargetAggregate, VoteError> {
        self.repository
            .get_target(target_type, target_id)
            .await?
            .ok_or_else(|| VoteError::TargetNotFound {
                target_type,
                target_id: target_id.clone(),
            })
    }

    /// Compare a target's stored counter with the tally of its vote records.
    ///
    /// Read-only: drift is reported and logged, never repaired here. The two reads
    /// are not a snapshot, so a vote committed in between can show as transient drift.
    #[instrument(skip(self), fields(target_id = %target_id))]
    pub async fn audit_target(
        &self,
        target_type: TargetType,
        target_id: &TargetId,
    ) -> Result<TargetAudit, VoteError> {
        let target = self.get_target(target_type, target_id).await?;
        let records = self
            .repository
            .get_votes_for_targets(std::slice::from_ref(target_id))
            .await?;
        let tally = VoteTally::from_records(
            records
                .iter()
                .filter(|record| record.target_type == target_type),
        );

        let audit = TargetAudit {
            target_type,
            target_id: target_id.clone(),
            vote_count: target.vote_count,
            consistent: target.vote_count == tally.score(),
            tally,
        };
        if !audit.consistent {
            warn!(
                vote_count = audit.vote_count,
                score = audit.tally.score(),
                "Vote counter drifted from vote records"
            );
        }
        Ok(audit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use vote_ledger_repository::{MemoryVoteRepository, VoteRepositoryError};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn target(id: &str) -> TargetId {
        TargetId::new(id).unwrap()
    }

    fn up(target_id: &str) -> VoteRequest {
        VoteRequest::new(target(target_id), TargetType::Question, Direction::Up)
    }

    fn down(target_id: &str) -> VoteRequest {
        VoteRequest::new(target(target_id), TargetType::Question, Direction::Down)
    }

    fn fast_config(max_attempts: u32) -> VoteLedgerConfig {
        VoteLedgerConfig {
            max_attempts,
            retry_base_delay: Duration::from_millis(1),
            retry_max_delay: Duration::from_millis(2),
            ..VoteLedgerConfig::default()
        }
    }

    async fn ledger_with_question(id: &str) -> (VoteLedger, Arc<MemoryVoteRepository>) {
        let repository = Arc::new(MemoryVoteRepository::new());
        let ledger = VoteLedger::with_config(repository.clone(), fast_config(5));
        ledger
            .register_target(TargetType::Question, &target(id))
            .await
            .unwrap();
        (ledger, repository)
    }

    /// Mock repository whose commits always fail with a fixed error.
    struct FailingRepository {
        inner: MemoryVoteRepository,
        error: fn() -> VoteRepositoryError,
        commits: AtomicUsize,
    }

    impl FailingRepository {
        fn new(error: fn() -> VoteRepositoryError) -> Self {
            Self {
                inner: MemoryVoteRepository::new(),
                error,
                commits: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VoteRepository for FailingRepository {
        async fn get_user_vote(
            &self,
            user_id: &UserId,
            target_id: &TargetId,
        ) -> Result<Option<VoteRecord>, VoteRepositoryError> {
            self.inner.get_user_vote(user_id, target_id).await
        }

        async fn get_user_votes(
            &self,
            user_id: &UserId,
            target_ids: &[TargetId],
        ) -> Result<Vec<VoteRecord>, VoteRepositoryError> {
            self.inner.get_user_votes(user_id, target_ids).await
        }

        async fn get_votes_for_targets(
            &self,
            target_ids: &[TargetId],
        ) -> Result<Vec<VoteRecord>, VoteRepositoryError> {
            self.inner.get_votes_for_targets(target_ids).await
        }

        async fn get_target(
            &self,
            target_type: TargetType,
            target_id: &TargetId,
        ) -> Result<Option<TargetAggregate>, VoteRepositoryError> {
            self.inner.get_target(target_type, target_id).await
        }

        async fn create_target(
            &self,
            target_type: TargetType,
            target_id: &TargetId,
        ) -> Result<TargetAggregate, VoteRepositoryError> {
            self.inner.create_target(target_type, target_id).await
        }

        async fn commit_vote(&self, _change: &VoteChange) -> Result<i64, VoteRepositoryError> {
            self.commits.fetch_add(1, Ordering::SeqCst);
            Err((self.error)())
        }

        async fn check_tables_created(&self) -> Result<bool, VoteRepositoryError> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_first_vote() {
        let (ledger, _) = ledger_with_question("q1").await;
        let outcome = ledger.submit_vote(Some(&user("u1")), up("q1")).await.unwrap();

        assert_eq!(outcome.previous, None);
        assert_eq!(outcome.next, Some(Direction::Up));
        assert_eq!(outcome.delta, 1);
        assert_eq!(outcome.vote_count, 1);
        assert_eq!(outcome.previous_vote_count, 0);
        assert_eq!(outcome.attempts, 1);
    }

    #[tokio::test]
    async fn test_toggle_is_idempotent() {
        let (ledger, repository) = ledger_with_question("q1").await;
        let first = ledger.submit_vote(Some(&user("u1")), up("q1")).await.unwrap();
        let second = ledger.submit_vote(Some(&user("u1")), up("q1")).await.unwrap();

        assert_eq!([first.delta, second.delta], [1, -1]);
        assert_eq!(second.next, None);
        assert_eq!(second.vote_count, 0);
        assert_eq!(
            ledger.get_user_vote(&user("u1"), &target("q1")).await.unwrap(),
            None
        );
        assert!(repository.vote_records().await.is_empty());
    }

    #[tokio::test]
    async fn test_direction_switch() {
        let (ledger, _) = ledger_with_question("q1").await;
        ledger.submit_vote(Some(&user("u1")), up("q1")).await.unwrap();
        let outcome = ledger.submit_vote(Some(&user("u1")), down("q1")).await.unwrap();

        assert_eq!(outcome.previous, Some(Direction::Up));
        assert_eq!(outcome.next, Some(Direction::Down));
        assert_eq!(outcome.delta, -2);
        assert_eq!(outcome.vote_count, -1);
    }

    #[tokio::test]
    async fn test_unauthenticated_performs_no_writes() {
        let (ledger, repository) = ledger_with_question("q1").await;
        let mut events = ledger.subscribe();

        let err = ledger.submit_vote(None, up("q1")).await.unwrap_err();
        assert_eq!(err, VoteError::Unauthenticated);

        assert!(repository.vote_records().await.is_empty());
        let stored = ledger.get_target(TargetType::Question, &target("q1")).await.unwrap();
        assert_eq!(stored.vote_count, 0);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_raw_vote_validation_touches_no_storage() {
        let repository = Arc::new(FailingRepository::new(|| {
            VoteRepositoryError::DatabaseError(sqlx::Error::PoolTimedOut)
        }));
        let ledger = VoteLedger::with_config(repository.clone(), fast_config(3));

        assert_eq!(
            ledger.submit_raw_vote(None, "q1", "question", 1).await.unwrap_err(),
            VoteError::Unauthenticated
        );
        for (caller, target_id, target_type, direction) in [
            ("", "q1", "question", 1),
            ("u1", "", "question", 1),
            ("u1", "q1", "tag", 1),
            ("u1", "q1", "question", 0),
            ("u1", "q1", "question", -2),
        ] {
            let err = ledger
                .submit_raw_vote(Some(caller), target_id, target_type, direction)
                .await
                .unwrap_err();
            assert!(matches!(err, VoteError::InvalidArgument(_)), "{err:?}");
        }
        assert_eq!(repository.commits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_target_leaves_no_vote() {
        let repository = Arc::new(MemoryVoteRepository::new());
        let ledger = VoteLedger::new(repository.clone());

        let err = ledger
            .submit_vote(Some(&user("u1")), up("ghost"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            VoteError::TargetNotFound {
                target_type: TargetType::Question,
                target_id: target("ghost"),
            }
        );
        assert!(repository.vote_records().await.is_empty());
    }

    #[tokio::test]
    async fn test_shared_id_across_target_types_keeps_counters_exact() {
        let (ledger, repository) = ledger_with_question("x").await;
        ledger
            .register_target(TargetType::Answer, &target("x"))
            .await
            .unwrap();
        ledger.submit_vote(Some(&user("u1")), up("x")).await.unwrap();

        let on_answer = VoteRequest::new(target("x"), TargetType::Answer, Direction::Up);
        let err = ledger
            .submit_vote(Some(&user("u1")), on_answer)
            .await
            .unwrap_err();
        assert!(matches!(err, VoteError::InvalidArgument(_)), "{err:?}");

        let records = repository.vote_records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target_type, TargetType::Question);
        for target_type in [TargetType::Question, TargetType::Answer] {
            let audit = ledger.audit_target(target_type, &target("x")).await.unwrap();
            assert!(audit.consistent, "{audit:?}");
        }
        let question = ledger.get_target(TargetType::Question, &target("x")).await.unwrap();
        assert_eq!(question.vote_count, 1);
    }

    #[tokio::test]
    async fn test_unavailable_is_not_retried() {
        let repository = Arc::new(FailingRepository::new(|| {
            VoteRepositoryError::DatabaseError(sqlx::Error::PoolTimedOut)
        }));
        repository
            .create_target(TargetType::Question, &target("q1"))
            .await
            .unwrap();
        let ledger = VoteLedger::with_config(repository.clone(), fast_config(5));

        let err = ledger.submit_vote(Some(&user("u1")), up("q1")).await.unwrap_err();
        assert!(matches!(err, VoteError::Unavailable(_)));
        assert_eq!(repository.commits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_conflict_retries_are_bounded() {
        let repository = Arc::new(FailingRepository::new(|| VoteRepositoryError::Conflict {
            user_id: UserId::new("u1").unwrap(),
            target_id: TargetId::new("q1").unwrap(),
        }));
        let ledger = VoteLedger::with_config(repository.clone(), fast_config(4));

        let err = ledger.submit_vote(Some(&user("u1")), up("q1")).await.unwrap_err();
        assert_eq!(err, VoteError::Conflict { attempts: 4 });
        assert!(err.is_retryable());
        assert_eq!(repository.commits.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_events_follow_commits() {
        let (ledger, _) = ledger_with_question("q1").await;
        let mut events = ledger.subscribe();

        ledger.submit_vote(Some(&user("u1")), up("q1")).await.unwrap();
        ledger.submit_vote(Some(&user("u2")), down("q1")).await.unwrap();

        let first = events.recv().await.unwrap();
        assert_eq!(first.user_id, user("u1"));
        assert_eq!(first.vote_count, 1);
        let second = events.recv().await.unwrap();
        assert_eq!(second.delta, -1);
        assert_eq!(second.vote_count, 0);
    }

    #[tokio::test]
    async fn test_batch_reads() {
        let (ledger, _) = ledger_with_question("q1").await;
        ledger
            .register_target(TargetType::Question, &target("q2"))
            .await
            .unwrap();
        ledger.submit_vote(Some(&user("u1")), up("q1")).await.unwrap();
        ledger.submit_vote(Some(&user("u2")), down("q1")).await.unwrap();
        ledger.submit_vote(Some(&user("u1")), down("q2")).await.unwrap();

        let mine = ledger
            .get_user_votes(&user("u1"), &[target("q1"), target("q2"), target("q3")])
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[&target("q2")], Direction::Down);

        let grouped = ledger
            .votes_for_targets(&[target("q1"), target("q2")])
            .await
            .unwrap();
        assert_eq!(grouped[&target("q1")].len(), 2);
        assert_eq!(grouped[&target("q2")].len(), 1);

        assert!(ledger.get_user_votes(&user("u1"), &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_audit_reports_consistency() {
        let (ledger, _) = ledger_with_question("q1").await;
        for id in ["u1", "u2", "u3"] {
            ledger.submit_vote(Some(&user(id)), up("q1")).await.unwrap();
        }
        ledger.submit_vote(Some(&user("u3")), down("q1")).await.unwrap();

        let audit = ledger
            .audit_target(TargetType::Question, &target("q1"))
            .await
            .unwrap();
        assert_eq!(audit.vote_count, 1);
        assert_eq!(audit.tally, VoteTally { upvotes: 2, downvotes: 1 });
        assert!(audit.consistent);

        let err = ledger
            .audit_target(TargetType::Answer, &target("q1"))
            .await
            .unwrap_err();
        assert!(matches!(err, VoteError::TargetNotFound { .. }));
    }
}
