//! Error types for the vote ledger shared types.
//! Consolidates and re-exports validation errors raised while building domain values.
mod invalid_input;

pub use invalid_input::InvalidInput;
