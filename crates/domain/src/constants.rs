//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! console.

// Backend connection
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

// Poll intervals
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_VAULT_POLL_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_HEALTH_POLL_INTERVAL_MS: u64 = 10_000;

// Email simulation bounds accepted by the operator console
pub const MIN_SIMULATE_BATCH: u32 = 1;
pub const MAX_SIMULATE_BATCH: u32 = 20;
pub const DEFAULT_SIMULATE_BATCH: u32 = 5;

// Vault initialization defaults
pub const DEFAULT_VAULT_OWNER: &str = "AI Employee";
pub const DEFAULT_VAULT_BUSINESS: &str = "My Business";

// Custom email fields left blank by the operator
pub const DEFAULT_SIMULATED_SENDER: &str = "demo@example.com";
pub const DEFAULT_SIMULATED_SUBJECT: &str = "Test Email";
pub const DEFAULT_SIMULATED_BODY: &str = "This is a test email for demonstration.";
