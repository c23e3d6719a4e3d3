//! # Vote Ledger Shared
//! This crate defines shared data structures and types used across the vote ledger crates.
//! It includes identifiers, vote directions and transitions, vote records, target
//! aggregates, tallies and the change set committed by a vote operation.
pub mod errors;
pub mod types;

pub use errors::InvalidInput;
