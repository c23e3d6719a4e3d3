//! PostgreSQL implementation of the vote repository and its schema migrations.
mod votes_repository;

pub use votes_repository::PostgresVoteRepository;
