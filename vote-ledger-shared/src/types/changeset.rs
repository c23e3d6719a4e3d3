use serde::{Deserialize, Serialize};

use crate::types::{Direction, TargetId, TargetType, UserId, VoteTransition};

/// The writes produced by one vote operation, committed atomically by a repository.
///
/// `expected` is the direction the transition was computed from. A repository
/// must refuse the change if the stored direction no longer matches it, which
/// is what serializes concurrent clicks on the same pair. The stored record
/// must also be filed under `target_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteChange {
    pub user_id: UserId,
    pub target_id: TargetId,
    pub target_type: TargetType,
    pub expected: Option<Direction>,
    pub next: Option<Direction>,
    pub delta: i64,
}

impl VoteChange {
    pub fn new(
        user_id: UserId,
        target_id: TargetId,
        target_type: TargetType,
        transition: VoteTransition,
    ) -> Self {
        Self {
            user_id,
            target_id,
            target_type,
            expected: transition.previous,
            next: transition.next,
            delta: transition.delta(),
        }
    }
}
