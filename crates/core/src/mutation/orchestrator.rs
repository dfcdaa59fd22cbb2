//! Mutation-refresh orchestrator
//!
//! Wraps a state-changing backend call so that it runs at most once per
//! target at a time and, when it succeeds, refreshes every poller whose
//! snapshot the mutation affects. Nothing is applied optimistically: the
//! refreshed snapshot is the only way the client learns the new state.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use console_domain::ConsoleResult;
use futures::future::join_all;
use tracing::{debug, info, warn, Instrument};

use super::busy::{BusySet, MutationTarget};
use crate::sync::Refresh;

/// Runs named mutations for one group of targets
pub struct MutationOrchestrator {
    name: String,
    busy: BusySet,
    refresh_targets: Vec<Arc<dyn Refresh>>,
}

impl MutationOrchestrator {
    pub fn new(name: impl Into<String>, refresh_targets: Vec<Arc<dyn Refresh>>) -> Self {
        Self { name: name.into(), busy: BusySet::new(), refresh_targets }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Busy markers, for disabling triggers while a mutation is in flight.
    pub fn busy(&self) -> &BusySet {
        &self.busy
    }

    /// Run `call` once for `target`.
    ///
    /// Fails with `Busy` before invoking `call` if the target is already
    /// locked. The marker is released when the call settles, including when
    /// the returned future is dropped. Only on success are the refresh
    /// targets refreshed, and this future resolves after they complete.
    pub async fn run<R, F, Fut>(&self, action: &str, target: MutationTarget, call: F) -> ConsoleResult<R>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ConsoleResult<R>>,
    {
        let span = tracing::info_span!(
            "mutation",
            orchestrator = %self.name,
            action,
            target = %target
        );

        async move {
            let guard = match self.busy.try_acquire(target) {
                Ok(guard) => guard,
                Err(error) => {
                    warn!("Mutation refused, target busy");
                    return Err(error);
                }
            };

            let started = Instant::now();
            let result = call().await;
            drop(guard);

            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            match &result {
                Ok(_) => {
                    info!(elapsed_ms, "Mutation succeeded");
                    self.refresh_all().await;
                }
                Err(error) => {
                    warn!(elapsed_ms, error = %error, label = error.label(), "Mutation failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn refresh_all(&self) {
        let outcomes =
            join_all(self.refresh_targets.iter().map(|target| target.refresh_snapshot())).await;

        for (target, outcome) in self.refresh_targets.iter().zip(outcomes) {
            if let Err(error) = outcome {
                debug!(resource = target.resource(), error = %error, "Post-mutation refresh skipped");
            }
        }
    }
}
