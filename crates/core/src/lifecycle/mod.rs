//! Work-item lifecycle
//!
//! Membership in the latest fetched collection is the state of an entity;
//! the service here checks requested transitions against those snapshots
//! and dispatches them through the mutation orchestrators.

pub mod service;

pub use service::WorkflowService;
