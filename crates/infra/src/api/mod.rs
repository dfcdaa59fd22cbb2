//! Remote access to the agent backend
//!
//! `ApiClient` speaks JSON over HTTP; `RemoteAgentBackend` maps each
//! `AgentBackend` operation onto one endpoint.

pub mod backend;
pub mod client;

pub use backend::RemoteAgentBackend;
pub use client::ApiClient;
