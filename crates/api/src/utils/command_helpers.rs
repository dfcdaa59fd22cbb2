//! Command execution helpers
//!
//! Every console command goes through [`execute_logged`] so timing and
//! outcome logging look the same everywhere.

use std::future::Future;
use std::time::Instant;

use console_domain::ConsoleResult;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command with automatic timing and logging
///
/// # Example
///
/// ```rust,ignore
/// pub async fn process(ctx: &AppContext, filename: String) -> ConsoleResult<String> {
///     execute_logged("queues::process", || async {
///         ctx.workflow.request_transition(Transition::ProcessItem { filename }).await
///     })
///     .await
///     .map(|ack| ack.summary())
/// }
/// ```
pub async fn execute_logged<F, Fut, T>(command_name: &str, command_fn: F) -> ConsoleResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ConsoleResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let elapsed = start.elapsed();
    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, elapsed, error_type);

    result
}
