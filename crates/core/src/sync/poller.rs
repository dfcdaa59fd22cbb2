//! Interval poller for a single remote resource
//!
//! Lifecycle follows the scheduler pattern used across the workspace:
//! `start()` spawns a background loop guarded by a `CancellationToken`,
//! `stop()` cancels it and awaits the task, `Drop` cancels.
//!
//! Every activation is a generation. The in-flight flag and the completion
//! counter belong to one generation, so a fetch issued before a stop is
//! never applied to, or shared with, a later activation.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use console_common::SystemClock;
//! use console_core::sync::{into_fetcher, Poller, PollerConfig};
//!
//! # async fn example() -> console_domain::ConsoleResult<()> {
//! let poller = Poller::new(
//!     PollerConfig::new("answer", Duration::from_secs(5)),
//!     into_fetcher(|| async { Ok(42_u32) }),
//!     Arc::new(SystemClock),
//! );
//!
//! poller.start()?;
//! let snapshot = poller.refresh().await?;
//! assert_eq!(snapshot.value(), Some(&42));
//! poller.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use console_common::time::Clock;
use console_domain::{ConsoleError, ConsoleResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::snapshot::Snapshot;
use super::Refresh;

/// Zero-argument fetch function producing one payload per call.
pub type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, ConsoleResult<T>> + Send + Sync>;

/// Wrap an async closure as a [`Fetcher`].
pub fn into_fetcher<T, F, Fut>(fetch: F) -> Fetcher<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ConsoleResult<T>> + Send + 'static,
{
    Arc::new(move || fetch().boxed())
}

/// Configuration for a poller
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Resource name used in logs.
    pub name: String,
    /// Period between fetch starts.
    pub interval: Duration,
    /// How long `stop()` waits for the background task.
    pub stop_timeout: Duration,
}

impl PollerConfig {
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        Self { name: name.into(), interval, stop_timeout: Duration::from_secs(5) }
    }
}

struct Activation<T> {
    generation: u64,
    active: bool,
    in_flight: bool,
    fetcher: Fetcher<T>,
    cancel: CancellationToken,
}

struct Shared<T> {
    name: String,
    clock: Arc<dyn Clock>,
    snapshot: watch::Sender<Snapshot<T>>,
    state: Mutex<Activation<T>>,
}

impl<T: Send + Sync + 'static> Shared<T> {
    /// Issue a fetch for `generation` unless one is already outstanding.
    fn launch(shared: &Arc<Self>, generation: u64) -> bool {
        let (fetcher, cancel) = {
            let mut state = shared.state.lock();
            if !state.active || state.generation != generation {
                return false;
            }
            if state.in_flight {
                debug!(resource = %shared.name, generation, "Fetch already in flight, skipping");
                return false;
            }
            state.in_flight = true;
            (Arc::clone(&state.fetcher), state.cancel.clone())
        };

        // A panicking fetch still completes the generation's in-flight fetch.
        let fetch = AssertUnwindSafe(fetcher()).catch_unwind().map(|outcome| {
            outcome.unwrap_or_else(|_| Err(ConsoleError::internal("fetch panicked")))
        });
        let task_shared = Arc::clone(shared);
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(
                        resource = %task_shared.name,
                        generation,
                        "Fetch abandoned after teardown"
                    );
                }
                result = fetch => task_shared.complete(generation, result),
            }
        });
        true
    }

    fn complete(&self, generation: u64, result: ConsoleResult<T>) {
        let mut state = self.state.lock();
        if !state.active || state.generation != generation {
            debug!(resource = %self.name, generation, "Discarding result from inactive generation");
            return;
        }
        state.in_flight = false;

        match result {
            Ok(value) => {
                let now = self.clock.utc_now();
                let value = Arc::new(value);
                self.snapshot.send_modify(|snapshot| {
                    snapshot.value = Some(value);
                    snapshot.error = None;
                    snapshot.updated_at = Some(now);
                    snapshot.loading = false;
                    snapshot.fetches += 1;
                });
            }
            Err(error) => {
                warn!(
                    resource = %self.name,
                    error = %error,
                    label = error.label(),
                    "Fetch failed, keeping previous value"
                );
                self.snapshot.send_modify(|snapshot| {
                    snapshot.error = Some(error);
                    snapshot.loading = false;
                    snapshot.fetches += 1;
                });
            }
        }
    }
}

/// Keeps a [`Snapshot`] of one resource live while active
pub struct Poller<T> {
    config: PollerConfig,
    shared: Arc<Shared<T>>,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + Sync + 'static> Poller<T> {
    pub fn new(config: PollerConfig, fetcher: Fetcher<T>, clock: Arc<dyn Clock>) -> Self {
        let (snapshot, _) = watch::channel(Snapshot::idle());
        let shared = Arc::new(Shared {
            name: config.name.clone(),
            clock,
            snapshot,
            state: Mutex::new(Activation {
                generation: 0,
                active: false,
                in_flight: false,
                fetcher,
                cancel: CancellationToken::new(),
            }),
        });
        Self { config, shared, task_handle: Mutex::new(None) }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Activate: fetch immediately, then once per interval.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` if already active, `InvalidInput` for a zero
    /// interval.
    pub fn start(&self) -> ConsoleResult<()> {
        if self.config.interval.is_zero() {
            return Err(ConsoleError::invalid_input(format!(
                "poller '{}' needs a non-zero interval",
                self.config.name
            )));
        }

        let (generation, cancel) = {
            let mut state = self.shared.state.lock();
            if state.active {
                return Err(ConsoleError::invalid_transition(format!(
                    "poller '{}' is already running",
                    self.config.name
                )));
            }
            state.generation += 1;
            state.active = true;
            state.in_flight = false;
            state.cancel = CancellationToken::new();
            self.shared.snapshot.send_replace(Snapshot::starting(state.generation));
            (state.generation, state.cancel.clone())
        };

        let shared = Arc::clone(&self.shared);
        let interval = self.config.interval;
        let handle = tokio::spawn(async move {
            Self::poll_loop(shared, generation, interval, cancel).await;
        });
        *self.task_handle.lock() = Some(handle);

        info!(
            resource = %self.config.name,
            generation,
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "Poller started"
        );
        Ok(())
    }

    /// Deactivate and wait for the background loop to exit.
    ///
    /// Results of fetches still outstanding are never applied. The last
    /// snapshot stays readable.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` if not running, `Internal` if the loop does not
    /// exit within `stop_timeout`.
    #[instrument(skip(self), fields(resource = %self.config.name))]
    pub async fn stop(&self) -> ConsoleResult<()> {
        {
            let mut state = self.shared.state.lock();
            if !state.active {
                return Err(ConsoleError::invalid_transition(format!(
                    "poller '{}' is not running",
                    self.config.name
                )));
            }
            state.active = false;
            state.in_flight = false;
            state.cancel.cancel();
        }

        let handle = self.task_handle.lock().take();
        if let Some(handle) = handle {
            match tokio::time::timeout(self.config.stop_timeout, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(join_error)) => {
                    return Err(ConsoleError::internal(format!(
                        "poller '{}' task failed: {join_error}",
                        self.config.name
                    )));
                }
                Err(_) => {
                    return Err(ConsoleError::internal(format!(
                        "poller '{}' did not stop within {:?}",
                        self.config.name, self.config.stop_timeout
                    )));
                }
            }
        }

        info!("Poller stopped");
        Ok(())
    }

    /// Swap the fetch function and start a new generation.
    ///
    /// Fetches issued by the previous fetch function are discarded.
    pub async fn restart_with(&self, fetcher: Fetcher<T>) -> ConsoleResult<()> {
        if self.is_active() {
            self.stop().await?;
        }
        self.shared.state.lock().fetcher = fetcher;
        self.start()
    }

    pub fn is_active(&self) -> bool {
        self.shared.state.lock().active
    }

    /// Point-in-time copy of the current snapshot.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.shared.snapshot.borrow().clone()
    }

    /// Receiver notified on every snapshot replacement.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.shared.snapshot.subscribe()
    }

    /// Fetch now, or join the fetch already in flight, and return the
    /// snapshot as of its completion.
    ///
    /// # Errors
    ///
    /// `Cancelled` if the poller is inactive or is stopped before the
    /// completion arrives. Fetch failures are not errors here; they are on
    /// the returned snapshot.
    #[instrument(skip(self), fields(resource = %self.config.name))]
    pub async fn refresh(&self) -> ConsoleResult<Snapshot<T>> {
        let (generation, target, cancel) = {
            let state = self.shared.state.lock();
            if !state.active {
                return Err(ConsoleError::Cancelled);
            }
            let completed = self.shared.snapshot.borrow().fetches;
            (state.generation, completed + 1, state.cancel.clone())
        };

        let mut receiver = self.shared.snapshot.subscribe();
        Shared::launch(&self.shared, generation);

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ConsoleError::Cancelled),
            waited = receiver.wait_for(|s| s.generation != generation || s.fetches >= target) => {
                waited
                    .ok()
                    .and_then(|snapshot| (snapshot.generation == generation).then(|| snapshot.clone()))
                    .ok_or(ConsoleError::Cancelled)
            }
        }
    }

    async fn poll_loop(
        shared: Arc<Shared<T>>,
        generation: u64,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(resource = %shared.name, generation, "Poll loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    Shared::launch(&shared, generation);
                }
            }
        }
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        state.active = false;
        state.cancel.cancel();
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Refresh for Poller<T> {
    fn resource(&self) -> &str {
        self.name()
    }

    async fn refresh_snapshot(&self) -> ConsoleResult<()> {
        self.refresh().await.map(|_| ())
    }
}
