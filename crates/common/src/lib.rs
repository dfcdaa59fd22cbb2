//! Runtime utilities shared across the employee console crates.
//!
//! # Feature Tiers
//!
//! - `runtime`: injectable clocks and duration formatting
//! - `test-utils`: async assertions for tests (implies `runtime`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(all(feature = "runtime", any(feature = "test-utils", test)))]
pub mod testing;

#[cfg(feature = "runtime")]
pub use time::{format_age, format_duration, Clock, MockClock, SystemClock};
