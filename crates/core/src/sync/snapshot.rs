//! Point-in-time view of a polled resource

use std::sync::Arc;

use chrono::{DateTime, Utc};
use console_domain::ConsoleError;

/// Latest known state of one polled resource
///
/// A snapshot is replaced as a whole on every completed fetch. The value is
/// shared behind an `Arc` so observers can hold on to it cheaply.
#[derive(Debug)]
pub struct Snapshot<T> {
    /// Latest successfully fetched value.
    pub value: Option<Arc<T>>,
    /// True only until the first fetch of the current activation completes.
    pub loading: bool,
    /// Error of the most recent fetch; cleared by the next success.
    pub error: Option<ConsoleError>,
    /// When `value` was fetched.
    pub updated_at: Option<DateTime<Utc>>,
    /// Completed fetches (successful or not) in this activation.
    pub fetches: u64,
    /// Activation this snapshot belongs to.
    pub generation: u64,
}

impl<T> Snapshot<T> {
    /// Snapshot of a poller that has never been started.
    pub fn idle() -> Self {
        Self { value: None, loading: false, error: None, updated_at: None, fetches: 0, generation: 0 }
    }

    /// Fresh snapshot for a new activation.
    pub(crate) fn starting(generation: u64) -> Self {
        Self { loading: true, generation, ..Self::idle() }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_deref()
    }

    /// True when an error is shown next to previously fetched data.
    pub fn is_stale(&self) -> bool {
        self.error.is_some() && self.value.is_some()
    }
}

// Manual impl: cloning only bumps the `Arc`, so `T` need not be `Clone`.
impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            loading: self.loading,
            error: self.error.clone(),
            updated_at: self.updated_at,
            fetches: self.fetches,
            generation: self.generation,
        }
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::idle()
    }
}
