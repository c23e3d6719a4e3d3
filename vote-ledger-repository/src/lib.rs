//! # Vote Ledger Repository
//! This crate provides the storage interface for the vote ledger and its
//! implementations. It includes definitions for errors, the repository trait,
//! a PostgreSQL backend and an in-process memory backend.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::VoteRepositoryError;
pub use interfaces::VoteRepository;
pub use memory::MemoryVoteRepository;
pub use postgres::PostgresVoteRepository;
