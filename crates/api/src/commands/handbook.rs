//! Handbook editor commands

use console_domain::{ConsoleResult, Transition};
use tracing::warn;

use super::queues::transition;
use crate::render::render_handbook;
use crate::utils::command_helpers::execute_logged;
use crate::AppContext;

/// Show the handbook, reloading it first unless the draft has unsaved edits
pub async fn show(ctx: &AppContext) -> ConsoleResult<String> {
    let editor = ctx.workflow.handbook();

    if !editor.is_dirty() && !editor.is_saving() {
        if let Err(err) = execute_logged("handbook::load", || editor.load()).await {
            if editor.state().server.is_none() {
                return Err(err);
            }
            warn!(error = %err, "Handbook reload failed, showing last copy");
        }
    }

    Ok(render_handbook(&editor.state(), editor.is_saving(), editor.is_validating()))
}

/// Replace the local draft; nothing is sent until `save`.
pub fn edit(ctx: &AppContext, content: String) -> String {
    let bytes = content.len();
    ctx.workflow.handbook().edit(content);
    format!("draft updated ({bytes} bytes, unsaved)")
}

pub async fn save(ctx: &AppContext) -> ConsoleResult<String> {
    transition(ctx, "handbook::save", Transition::SaveHandbook).await
}

pub async fn validate(ctx: &AppContext) -> ConsoleResult<String> {
    transition(ctx, "handbook::validate", Transition::ValidateHandbook).await
}
