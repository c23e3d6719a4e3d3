use serde::{Deserialize, Serialize};

use crate::types::{Direction, VoteRecord};

/// Represents the upvotes and downvotes recomputed from a target's vote records.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteTally {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteTally {
    /// Builds a tally from the vote records referencing a single target.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a VoteRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut tally, record| {
                match record.direction {
                    Direction::Up => tally.upvotes += 1,
                    Direction::Down => tally.downvotes += 1,
                }
                tally
            })
    }

    /// Net score, which the stored `vote_count` must equal.
    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TargetId, TargetType, UserId};
    use time::OffsetDateTime;

    fn record(user: &str, direction: Direction) -> VoteRecord {
        VoteRecord {
            user_id: UserId::new(user).unwrap(),
            target_id: TargetId::new("a1").unwrap(),
            target_type: TargetType::Answer,
            direction,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_tally_counts_directions() {
        let records = vec![
            record("u1", Direction::Up),
            record("u2", Direction::Up),
            record("u3", Direction::Down),
        ];
        let tally = VoteTally::from_records(&records);
        assert_eq!(tally, VoteTally { upvotes: 2, downvotes: 1 });
        assert_eq!(tally.score(), 1);
    }

    #[test]
    fn test_empty_tally() {
        assert_eq!(VoteTally::from_records(&Vec::<VoteRecord>::new()).score(), 0);
    }
}
