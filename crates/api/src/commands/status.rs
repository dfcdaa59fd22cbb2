//! Session status and dashboard commands

use console_domain::{ConsoleResult, Transition};

use super::queues::transition;
use crate::render::{render_dashboard, render_health};
use crate::AppContext;

/// Health of the backend and of every poller, plus mutations in flight
pub fn status(ctx: &AppContext) -> String {
    let mut out = render_health(&ctx.health_check());

    let workflow = &ctx.workflow;
    let in_flight: Vec<String> = [
        ("process", workflow.item_busy()),
        ("decision", workflow.decision_busy()),
        ("simulation", workflow.simulation_busy()),
        ("vault", workflow.vault_busy()),
    ]
    .into_iter()
    .filter(|(_, busy)| !busy.is_idle())
    .map(|(name, busy)| match busy.busy_items().as_slice() {
        [] => format!("{name} (all)"),
        ids => format!("{name} ({})", ids.join(", ")),
    })
    .collect();

    if !in_flight.is_empty() {
        out.push_str("\nIn flight: ");
        out.push_str(&in_flight.join("; "));
    }
    if ctx.workflow.handbook().is_dirty() {
        out.push_str("\nHandbook has unsaved changes.");
    }
    out
}

pub fn dashboard(ctx: &AppContext) -> String {
    render_dashboard(&ctx.workflow.dashboard().snapshot(), ctx.clock.as_ref())
}

/// Ask the agent to regenerate its dashboard, then re-poll it
pub async fn refresh_dashboard(ctx: &AppContext) -> ConsoleResult<String> {
    transition(ctx, "status::refresh_dashboard", Transition::RefreshDashboard).await
}
