//! Remote access boundary

pub mod ports;

pub use ports::AgentBackend;
