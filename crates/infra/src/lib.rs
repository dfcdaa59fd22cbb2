//! # Employee Console Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The HTTP client and the agent REST client
//! - `RemoteAgentBackend`, the `AgentBackend` implementation
//! - Configuration loading from files and environment variables
//!
//! ## Architecture
//! - Implements traits defined in `console-core`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{ApiClient, RemoteAgentBackend};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
