//! Port interface for the agent backend
//!
//! One method per server operation. Implementations perform no retries and
//! no caching, and report every failure as a `ConsoleError` (`Network`,
//! `Remote` or `Decode`).

use async_trait::async_trait;
use console_domain::{
    Approval, ConsoleResult, DashboardMetrics, HandbookData, HealthStatus, MessageResponse,
    ProcessItemResponse, ProcessResult, SimulateBatchResponse, SimulateEmailRequest,
    SimulateEmailResponse, VaultStatus, WorkItem,
};

/// Typed access to the agent's REST surface
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn health(&self) -> ConsoleResult<HealthStatus>;

    async fn vault_status(&self) -> ConsoleResult<VaultStatus>;

    async fn init_vault(&self, owner: &str, business: &str) -> ConsoleResult<MessageResponse>;

    /// Work items waiting for the agent.
    async fn needs_action(&self) -> ConsoleResult<Vec<WorkItem>>;

    async fn process_item(&self, filename: &str) -> ConsoleResult<ProcessItemResponse>;

    async fn process_all(&self) -> ConsoleResult<ProcessResult>;

    /// Proposed actions waiting for an operator decision.
    async fn approvals(&self) -> ConsoleResult<Vec<Approval>>;

    async fn approve(&self, id: &str) -> ConsoleResult<MessageResponse>;

    async fn reject(&self, id: &str) -> ConsoleResult<MessageResponse>;

    async fn dashboard(&self) -> ConsoleResult<DashboardMetrics>;

    /// Ask the agent to regenerate its dashboard file.
    async fn refresh_dashboard(&self) -> ConsoleResult<MessageResponse>;

    async fn handbook(&self) -> ConsoleResult<HandbookData>;

    async fn update_handbook(&self, content: &str) -> ConsoleResult<MessageResponse>;

    async fn validate_handbook(&self) -> ConsoleResult<HandbookData>;

    async fn simulate_email(
        &self,
        request: &SimulateEmailRequest,
    ) -> ConsoleResult<SimulateEmailResponse>;

    async fn simulate_batch(&self, count: u32) -> ConsoleResult<SimulateBatchResponse>;
}
