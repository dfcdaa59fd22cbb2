//! Testing utilities and helpers
//!
//! - **[`async_utils`]**: eventual assertions and timeouts for async tests
//!
//! Clocks live in [`crate::time`]; `MockClock` is re-exported here for
//! convenience.

pub mod async_utils;

// Note: Macros exported with #[macro_export] are available at crate root
pub use async_utils::timeout_ok;
pub use crate::time::{Clock, MockClock};
