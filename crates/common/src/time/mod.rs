//! Time utilities and abstractions
//!
//! - **[`clock`]**: Real and mock time, injected wherever a timestamp is taken
//! - **[`format`]**: Human-readable durations and snapshot ages
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use console_common::time::{format_duration, Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.advance(Duration::from_secs(65));
//! assert_eq!(format_duration(clock.now() - start), "1m 5s");
//! ```

pub mod clock;
pub mod format;

pub use clock::{Clock, MockClock, SystemClock};
pub use format::{format_age, format_duration};
