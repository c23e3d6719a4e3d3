//! Notifications of committed vote transitions.
//!
//! Events are published on a `tokio::sync::broadcast` channel after each
//! successful commit. Delivering them to remote observers is left to the caller.
use serde::{Deserialize, Serialize};
use vote_ledger_shared::types::{Direction, TargetId, TargetType, UserId};

use crate::ledger::VoteOutcome;

/// A committed vote transition and the resulting counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEvent {
    pub user_id: UserId,
    pub target_id: TargetId,
    pub target_type: TargetType,
    pub previous: Option<Direction>,
    pub next: Option<Direction>,
    pub delta: i64,
    pub vote_count: i64,
}

impl From<&VoteOutcome> for VoteEvent {
    fn from(outcome: &VoteOutcome) -> Self {
        Self {
            user_id: outcome.user_id.clone(),
            target_id: outcome.target_id.clone(),
            target_type: outcome.target_type,
            previous: outcome.previous,
            next: outcome.next,
            delta: outcome.delta,
            vote_count: outcome.vote_count,
        }
    }
}
