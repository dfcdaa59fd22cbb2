//! Email simulation commands

use console_domain::{ConsoleResult, SimulateEmailRequest, Transition};

use super::queues::transition;
use crate::AppContext;

pub async fn batch(ctx: &AppContext, count: u32) -> ConsoleResult<String> {
    transition(ctx, "simulate::batch", Transition::SimulateBatch { count }).await
}

pub async fn email(ctx: &AppContext, request: SimulateEmailRequest) -> ConsoleResult<String> {
    transition(ctx, "simulate::email", Transition::SimulateEmail(request)).await
}
