//! Subcommand implementations.

pub mod canonicalize;
pub mod hash;
pub mod verify;
