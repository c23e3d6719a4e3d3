mod changeset;
mod direction;
mod ids;
mod target;
mod user_vote;
mod votes_count;

pub use changeset::VoteChange;
pub use direction::{Direction, TransitionKind, VoteTransition};
pub use ids::{MAX_ID_LEN, TargetId, TargetType, UserId};
pub use target::TargetAggregate;
pub use user_vote::VoteRecord;
pub use votes_count::VoteTally;
