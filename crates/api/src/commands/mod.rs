//! Operator commands
//!
//! Views read the latest snapshots and never block on the network, except
//! `handbook`, which reloads a clean draft. Transitions go through the
//! workflow service and return its acknowledgement summary.

pub mod handbook;
pub mod parser;
pub mod queues;
pub mod simulate;
pub mod status;
pub mod vault;

use console_domain::{ConsoleError, ConsoleResult};
use tracing::debug;

pub use parser::{parse, Command};

use crate::render::HELP;
use crate::AppContext;

/// What the session loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text and read the next line.
    Continue(String),
    Quit,
}

/// Run one parsed command against `ctx`.
///
/// # Errors
///
/// Whatever the underlying transition or handbook load returned.
pub async fn execute(ctx: &AppContext, command: Command) -> ConsoleResult<Outcome> {
    debug!(command = command.name(), "Dispatching command");

    let text = match command {
        Command::Status => status::status(ctx),
        Command::Items => queues::items(ctx),
        Command::Approvals => queues::approvals(ctx),
        Command::Dashboard => status::dashboard(ctx),
        Command::Vault => vault::show(ctx),
        Command::Handbook => handbook::show(ctx).await?,
        Command::Process { filename } => queues::process(ctx, filename).await?,
        Command::ProcessAll => queues::process_all(ctx).await?,
        Command::Approve { id } => queues::approve(ctx, id).await?,
        Command::Reject { id } => queues::reject(ctx, id).await?,
        Command::Init { owner, business } => vault::init(ctx, owner, business).await?,
        Command::Refresh => status::refresh_dashboard(ctx).await?,
        Command::Simulate { count } => simulate::batch(ctx, count).await?,
        Command::Email(request) => simulate::email(ctx, request).await?,
        Command::Edit { content } => handbook::edit(ctx, content),
        Command::Save => handbook::save(ctx).await?,
        Command::Validate => handbook::validate(ctx).await?,
        Command::Help => HELP.to_string(),
        Command::Quit => return Ok(Outcome::Quit),
    };

    Ok(Outcome::Continue(text))
}

/// Parse and run one input line, folding any failure into printable text.
///
/// Blank lines produce an empty `Continue`.
pub async fn run_line(ctx: &AppContext, line: &str) -> Outcome {
    let result = match parse(line) {
        Ok(Some(command)) => execute(ctx, command).await,
        Ok(None) => Ok(Outcome::Continue(String::new())),
        Err(err) => Err(err),
    };

    result.unwrap_or_else(|err| Outcome::Continue(describe_error(&err)))
}

/// Operator-facing text for a failed command
pub fn describe_error(error: &ConsoleError) -> String {
    let hint = match error {
        ConsoleError::Busy { .. } => " (wait for it to finish)",
        ConsoleError::StaleTarget { .. } => " (it may already have been handled; check the list again)",
        _ if error.is_retryable() => " (try again shortly)",
        _ => "",
    };
    format!("error: {}{hint}", error.detail())
}
