use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{Direction, TargetId, TargetType, UserId};

/// Represents a user's current vote on a target.
///
/// At most one record exists per `(user_id, target_id)` pair. Only `direction`
/// (and `updated_at` with it) changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteRecord {
    pub user_id: UserId,
    pub target_id: TargetId,
    pub target_type: TargetType,
    pub direction: Direction,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
