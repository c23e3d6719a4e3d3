//! Optimistic mirror of vote state for clients.
//!
//! A client shows the effect of a click before the ledger confirms it. Each click
//! produces a `PendingVote` that remembers what to roll back to, and is settled
//! with the ledger's result once it arrives. Results are ordered by click
//! sequence, so a result that arrives late never overrides a newer one.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vote_ledger_shared::types::{Direction, TargetId, UserId, VoteTransition};

use crate::errors::VoteError;
use crate::ledger::VoteOutcome;

/// The caller's direction on a target and the target's counter, as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSnapshot {
    pub direction: Option<Direction>,
    pub vote_count: i64,
}

impl VoteSnapshot {
    /// State after the committed transition.
    pub fn after(outcome: &VoteOutcome) -> Self {
        Self {
            direction: outcome.next,
            vote_count: outcome.vote_count,
        }
    }
}

/// A click applied locally and not yet settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVote {
    pub user_id: UserId,
    pub target_id: TargetId,
    pub sequence: u64,
    /// Displayed state before the click.
    pub rollback: VoteSnapshot,
    /// Displayed state after the click.
    pub optimistic: VoteSnapshot,
}

#[derive(Debug, Clone)]
struct Entry {
    displayed: VoteSnapshot,
    /// Newest state confirmed by the ledger (or seeded).
    confirmed: VoteSnapshot,
    /// Sequence of the click or seed that produced `confirmed`.
    confirmed_sequence: u64,
    /// Sequence of the most recent click or seed.
    latest: u64,
    /// Whether the most recent click has been settled.
    latest_settled: bool,
}

/// Client-side cache of displayed vote state, keyed by `(user, target)`.
#[derive(Debug, Default)]
pub struct OptimisticVotes {
    entries: HashMap<(UserId, TargetId), Entry>,
    next_sequence: u64,
}

impl OptimisticVotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the known state for a pair, typically from a fresh read.
    ///
    /// Any click still pending on the pair becomes stale.
    pub fn seed(&mut self, user_id: UserId, target_id: TargetId, snapshot: VoteSnapshot) {
        let sequence = self.bump();
        self.entries.insert(
            (user_id, target_id),
            Entry {
                displayed: snapshot,
                confirmed: snapshot,
                confirmed_sequence: sequence,
                latest: sequence,
                latest_settled: true,
            },
        );
    }

    /// The state currently displayed for a pair.
    pub fn get(&self, user_id: &UserId, target_id: &TargetId) -> Option<VoteSnapshot> {
        self.entries
            .get(&(user_id.clone(), target_id.clone()))
            .map(|entry| entry.displayed)
    }

    /// Apply a click locally, using the same transition rule as the ledger.
    ///
    /// Returns `None` if the pair was never seeded.
    pub fn begin(
        &mut self,
        user_id: &UserId,
        target_id: &TargetId,
        clicked: Direction,
    ) -> Option<PendingVote> {
        let sequence = self.bump();
        let entry = self
            .entries
            .get_mut(&(user_id.clone(), target_id.clone()))?;

        let rollback = entry.displayed;
        let transition = VoteTransition::compute(rollback.direction, clicked);
        let optimistic = VoteSnapshot {
            direction: transition.next,
            vote_count: rollback.vote_count + transition.delta(),
        };
        entry.displayed = optimistic;
        entry.latest = sequence;
        entry.latest_settled = false;

        Some(PendingVote {
            user_id: user_id.clone(),
            target_id: target_id.clone(),
            sequence,
            rollback,
            optimistic,
        })
    }

    /// Reconcile a pending click with the ledger's result.
    ///
    /// A success becomes the confirmed state unless a newer click has already
    /// been confirmed. An error on the most recent click returns the display to
    /// the confirmed state; an error on an older click is ignored. While the most
    /// recent click is in flight its optimistic state stays on display; once it
    /// has settled, a late success from an older click is displayed.
    ///
    /// # Returns
    ///
    /// `true` if the displayed state was updated.
    pub fn settle(&mut self, pending: &PendingVote, result: &Result<VoteOutcome, VoteError>) -> bool {
        let Some(entry) = self
            .entries
            .get_mut(&(pending.user_id.clone(), pending.target_id.clone()))
        else {
            return false;
        };
        let current = entry.latest == pending.sequence;
        if current {
            entry.latest_settled = true;
        }

        match result {
            Ok(outcome) => {
                if pending.sequence <= entry.confirmed_sequence {
                    debug!(
                        sequence = pending.sequence,
                        confirmed = entry.confirmed_sequence,
                        "Ignoring outdated vote result"
                    );
                    return false;
                }
                entry.confirmed = VoteSnapshot::after(outcome);
                entry.confirmed_sequence = pending.sequence;
                if !entry.latest_settled {
                    return false;
                }
            }
            Err(err) => {
                if !current {
                    debug!(sequence = pending.sequence, latest = entry.latest, "Ignoring stale vote error");
                    return false;
                }
                debug!(
                    user_id = %pending.user_id,
                    target_id = %pending.target_id,
                    error = %err,
                    "Rolling back optimistic vote"
                );
            }
        }
        entry.displayed = entry.confirmed;
        true
    }

    fn bump(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }
}
