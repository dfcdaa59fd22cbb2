//! Polling synchronization engine
//!
//! A [`Poller`] keeps one [`Snapshot`] of a remote resource live while it is
//! active: an immediate fetch on start, then one fetch per interval, with at
//! most one fetch in flight. Manual refreshes share the same in-flight guard.

pub mod poller;
pub mod snapshot;

use async_trait::async_trait;
use console_domain::ConsoleResult;
pub use poller::{into_fetcher, Fetcher, Poller, PollerConfig};
pub use snapshot::Snapshot;

/// Something that can be asked to re-fetch on demand.
///
/// Mutation orchestrators hold their refresh targets through this trait so a
/// single orchestrator can refresh engines of different resource types.
#[async_trait]
pub trait Refresh: Send + Sync {
    /// Name of the refreshed resource, for logs.
    fn resource(&self) -> &str;

    /// Wait for the next completed fetch.
    ///
    /// A failed fetch is not an error here; it is recorded on the snapshot.
    /// `Err(Cancelled)` means the engine is not active.
    async fn refresh_snapshot(&self) -> ConsoleResult<()>;
}
