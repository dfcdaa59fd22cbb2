//! # Employee Console Core
//!
//! Pure client-side logic - no HTTP or terminal code.
//!
//! This crate contains:
//! - The `AgentBackend` port the infrastructure layer implements
//! - The polling synchronization engine (`Poller`)
//! - The mutation-refresh orchestrator and its busy markers
//! - The workflow service that validates and dispatches lifecycle transitions
//! - The handbook draft editor
//!
//! ## Architecture Principles
//! - Only depends on `console-domain` and `console-common`
//! - All remote access goes through the `AgentBackend` trait
//! - Every snapshot is replaced whole; nothing is patched in place

pub mod backend;
pub mod handbook;
pub mod lifecycle;
pub mod mutation;
pub mod sync;

pub use backend::ports::AgentBackend;
pub use handbook::{HandbookEditor, HandbookState};
pub use lifecycle::WorkflowService;
pub use mutation::{BusyGuard, BusySet, MutationOrchestrator, MutationTarget};
pub use sync::{into_fetcher, Fetcher, Poller, PollerConfig, Refresh, Snapshot};
