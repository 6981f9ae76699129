//! Shared building blocks for the message store crates: logging setup,
//! startup environment checks and small response types.

pub mod types;
pub mod utils;
pub mod env;
