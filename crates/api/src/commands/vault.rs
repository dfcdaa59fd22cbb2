//! Vault commands

use console_domain::{ConsoleResult, Transition};

use super::queues::transition;
use crate::render::render_vault;
use crate::AppContext;

pub fn show(ctx: &AppContext) -> String {
    let workflow = &ctx.workflow;
    render_vault(&workflow.vault().snapshot(), workflow.vault_busy(), ctx.clock.as_ref())
}

/// Create the vault for `owner` and `business`
///
/// Refused once the latest vault snapshot reports it initialized.
pub async fn init(ctx: &AppContext, owner: String, business: String) -> ConsoleResult<String> {
    transition(ctx, "vault::init", Transition::InitVault { owner, business }).await
}
