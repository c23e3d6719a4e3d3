//! Validation errors for identifiers, directions and target types.
use thiserror::Error;

/// Represents malformed input rejected while constructing a domain value.
///
/// These errors are raised before any storage is touched, so they are always
/// terminal for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} exceeds {max} bytes")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} contains control characters")]
    ControlCharacter { field: &'static str },

    #[error("Invalid direction: {0}, expected 1 or -1")]
    Direction(i64),

    #[error("Invalid target type: {0}")]
    TargetType(String),
}
