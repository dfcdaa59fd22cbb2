//! Needs-action and approval queue commands

use console_domain::{ConsoleResult, Transition};

use crate::render::{render_approvals, render_items};
use crate::utils::command_helpers::execute_logged;
use crate::AppContext;

/// Show the latest needs-action snapshot
pub fn items(ctx: &AppContext) -> String {
    let workflow = &ctx.workflow;
    render_items(&workflow.needs_action().snapshot(), workflow.item_busy(), ctx.clock.as_ref())
}

/// Show the latest approvals snapshot
pub fn approvals(ctx: &AppContext) -> String {
    let workflow = &ctx.workflow;
    render_approvals(&workflow.approvals().snapshot(), workflow.decision_busy(), ctx.clock.as_ref())
}

/// Process one work item by filename
pub async fn process(ctx: &AppContext, filename: String) -> ConsoleResult<String> {
    transition(ctx, "queues::process", Transition::ProcessItem { filename }).await
}

/// Process every work item in the latest snapshot
pub async fn process_all(ctx: &AppContext) -> ConsoleResult<String> {
    transition(ctx, "queues::process_all", Transition::ProcessAll).await
}

pub async fn approve(ctx: &AppContext, id: String) -> ConsoleResult<String> {
    transition(ctx, "queues::approve", Transition::Approve { id }).await
}

pub async fn reject(ctx: &AppContext, id: String) -> ConsoleResult<String> {
    transition(ctx, "queues::reject", Transition::Reject { id }).await
}

/// Request `transition` and summarize its acknowledgement.
pub(crate) async fn transition(
    ctx: &AppContext,
    command_name: &str,
    transition: Transition,
) -> ConsoleResult<String> {
    execute_logged(command_name, || ctx.workflow.request_transition(transition))
        .await
        .map(|ack| ack.summary())
}
