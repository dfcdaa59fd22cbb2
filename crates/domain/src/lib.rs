//! # Employee Console Domain
//!
//! Business domain types for the AI Employee operator console.
//!
//! This crate contains:
//! - Wire types shared with the agent backend (work items, approvals, ...)
//! - The console error type and Result alias
//! - Configuration structures
//! - Lifecycle vocabulary (transitions and acknowledgements)
//!
//! ## Architecture
//! - No dependencies on other console crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod lifecycle;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use lifecycle::{Ack, Transition, TransitionKind};
pub use types::*;
