//! In-process implementation of the vote repository.
mod votes_repository;

pub use votes_repository::MemoryVoteRepository;
