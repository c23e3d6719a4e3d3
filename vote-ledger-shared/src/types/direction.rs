use serde::{Deserialize, Serialize};

use crate::errors::InvalidInput;

/// Represents the direction of a user's vote.
///
/// The absence of a vote is modelled as `Option::<Direction>::None` rather than
/// a third variant, so a stored record can never hold a "removed" direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    /// Indicates an upvote, worth +1.
    Up,
    /// Indicates a downvote, worth -1.
    Down,
}

impl Direction {
    /// Returns the signed unit value of the direction.
    pub fn value(self) -> i64 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }

    /// Returns the signed value of an optional direction, `0` meaning no vote.
    pub fn signed(direction: Option<Direction>) -> i64 {
        direction.map_or(0, Direction::value)
    }
}

impl TryFrom<i64> for Direction {
    type Error = InvalidInput;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Up),
            -1 => Ok(Direction::Down),
            other => Err(InvalidInput::Direction(other)),
        }
    }
}

impl TryFrom<i8> for Direction {
    type Error = InvalidInput;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Direction::try_from(i64::from(value))
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// Classifies a transition by the record write it requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// No record existed; one is inserted.
    Created,
    /// The record's direction is flipped in place.
    Switched,
    /// The record is deleted (the user repeated their direction).
    Removed,
}

/// The state change produced by one click on a vote control.
///
/// `previous` is the stored direction read at the start of the operation and
/// `next` is the direction that must be stored once it commits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTransition {
    pub previous: Option<Direction>,
    pub next: Option<Direction>,
}

impl VoteTransition {
    /// Computes the transition for a click on `clicked` given the stored direction.
    ///
    /// Repeating the stored direction toggles the vote off; any other click
    /// creates or switches the vote to `clicked`.
    pub fn compute(previous: Option<Direction>, clicked: Direction) -> Self {
        let next = match previous {
            Some(current) if current == clicked => None,
            _ => Some(clicked),
        };
        Self { previous, next }
    }

    /// Returns the change to apply to the target's vote counter.
    pub fn delta(&self) -> i64 {
        Direction::signed(self.next) - Direction::signed(self.previous)
    }

    pub fn kind(&self) -> TransitionKind {
        match (self.previous, self.next) {
            (None, _) => TransitionKind::Created,
            (Some(_), None) => TransitionKind::Removed,
            (Some(_), Some(_)) => TransitionKind::Switched,
        }
    }
}
