//! CLI surface: argument types and command implementations.

pub mod commands;
mod types;

pub use types::{Cli, Commands};
