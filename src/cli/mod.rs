//! CLI command handlers

pub mod commands;

pub use commands::{load_orders, run, StdinPrompt};
