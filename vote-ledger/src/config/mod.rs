//! Configuration module for the Vote Ledger.
//! Defines and manages ledger settings and the dependencies of the binary.
mod dependencies;
mod ledger;

pub use dependencies::{DatabaseConfig, Dependencies};
pub use ledger::VoteLedgerConfig;
