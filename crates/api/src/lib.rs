//! # Employee Console
//!
//! Operator console for the AI Employee agent.
//!
//! This crate contains:
//! - Operator commands (parsing and dispatch)
//! - Application context (dependency injection)
//! - Plain-text rendering of snapshots
//! - Logging and health helpers
//!
//! ## Architecture
//! - Depends on `console-common`, `console-domain`, `console-core` and
//!   `console-infra`
//! - Wires the remote backend into the workflow service
//! - `main.rs` runs the line-oriented session loop

pub mod commands;
pub mod context;
pub mod render;
pub mod utils;

pub use commands::{execute, parse, run_line, Command, Outcome};
pub use context::*;
