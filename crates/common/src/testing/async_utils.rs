//! Async testing utilities
//!
//! Timing is measured with `tokio::time`, so these helpers behave under a
//! paused test clock as well as in real time.

use std::future::Future;
use std::time::Duration;

/// Assert that an async condition becomes true before `$timeout` elapses.
///
/// The condition is re-evaluated every 10ms. Poller tests use it to wait for
/// the first background fetch to land:
///
/// ```no_run
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::test]
/// async fn first_fetch_lands() {
///     let fetches = Arc::new(AtomicUsize::new(0));
///     let counter = Arc::clone(&fetches);
///
///     tokio::spawn(async move {
///         tokio::time::sleep(Duration::from_millis(20)).await;
///         counter.fetch_add(1, Ordering::SeqCst);
///     });
///
///     console_common::assert_eventually_async!(Duration::from_secs(1), async {
///         fetches.load(Ordering::SeqCst) >= 1
///     });
/// }
/// ```
#[macro_export]
macro_rules! assert_eventually_async {
    ($timeout:expr, $fut:expr) => {{
        let timeout_duration = $timeout;
        let result = tokio::time::timeout(timeout_duration, async {
            loop {
                if $fut.await {
                    break;
                }
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        })
        .await;

        assert!(result.is_ok(), "Condition did not become true within {:?}", timeout_duration);
    }};
}

/// Run `fut` under a deadline.
///
/// # Errors
///
/// `Elapsed` when `duration` passes first.
pub async fn timeout_ok<F, T>(duration: Duration, fut: F) -> Result<T, tokio::time::error::Elapsed>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, fut).await
}
