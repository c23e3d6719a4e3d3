//! This module defines and re-exports the interfaces for the vote repository.
//! It serves as a central point for accessing traits related to data interaction.
mod votes;

pub use votes::VoteRepository;
