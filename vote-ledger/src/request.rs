//! Vote requests as received from UI or request handlers.
use serde::{Deserialize, Serialize};
use vote_ledger_shared::types::{Direction, TargetId, TargetType};

use crate::errors::VoteError;

/// A click on a vote control: which target, which collection, which direction.
///
/// The caller identity is passed separately, since it comes from the identity
/// provider rather than from the request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub target_id: TargetId,
    pub target_type: TargetType,
    pub direction: Direction,
}

impl VoteRequest {
    pub fn new(target_id: TargetId, target_type: TargetType, direction: Direction) -> Self {
        Self {
            target_id,
            target_type,
            direction,
        }
    }

    /// Validates untyped input into a request.
    ///
    /// # Arguments
    ///
    /// * `target_id` - Identifier of the question or answer
    /// * `target_type` - `"question"` or `"answer"`
    /// * `direction` - `1` for an upvote, `-1` for a downvote
    ///
    /// # Returns
    ///
    /// * `Ok(VoteRequest)` - The validated request
    /// * `Err(VoteError::InvalidArgument)` - If any field is malformed
    pub fn parse(target_id: &str, target_type: &str, direction: i64) -> Result<Self, VoteError> {
        Ok(Self {
            target_id: TargetId::new(target_id)?,
            target_type: target_type.parse()?,
            direction: Direction::try_from(direction)?,
        })
    }
}
