use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{TargetId, TargetType};

/// The question or answer that owns a vote counter.
///
/// The aggregate is created independently of voting with `vote_count = 0`;
/// afterwards its counter is only changed by committed vote transitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetAggregate {
    pub target_type: TargetType,
    pub target_id: TargetId,
    pub vote_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
