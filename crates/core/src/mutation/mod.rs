//! Mutation-refresh orchestration
//!
//! A mutation runs at most once per target at a time; when it succeeds the
//! associated pollers are refreshed so the next snapshot reflects it.

pub mod busy;
pub mod orchestrator;

pub use busy::{BusyGuard, BusySet, MutationTarget};
pub use orchestrator::MutationOrchestrator;
