//! `AgentBackend` implementation over the agent's REST API

use async_trait::async_trait;
use console_core::AgentBackend;
use console_domain::{
    ApiConfig, Approval, ConsoleResult, DashboardMetrics, HandbookData, HealthStatus,
    MessageResponse, ProcessItemResponse, ProcessResult, SimulateBatchResponse,
    SimulateEmailRequest, SimulateEmailResponse, VaultStatus, WorkItem,
};
use serde::Serialize;
use tracing::instrument;

use super::client::ApiClient;

#[derive(Serialize)]
struct InitVaultBody<'a> {
    owner: &'a str,
    business: &'a str,
}

#[derive(Serialize)]
struct ProcessItemBody<'a> {
    filename: &'a str,
}

#[derive(Serialize)]
struct HandbookBody<'a> {
    content: &'a str,
}

#[derive(Serialize)]
struct SimulateBatchBody {
    count: u32,
}

/// Remote implementation of [`AgentBackend`]
#[derive(Clone, Debug)]
pub struct RemoteAgentBackend {
    client: ApiClient,
}

impl RemoteAgentBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Build a backend straight from the `[api]` configuration section.
    pub fn from_config(config: &ApiConfig) -> ConsoleResult<Self> {
        Ok(Self::new(ApiClient::new(config)?))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

fn approval_path(id: &str, decision: &str) -> String {
    format!("/api/approvals/{}/{decision}", urlencoding::encode(id))
}

#[async_trait]
impl AgentBackend for RemoteAgentBackend {
    #[instrument(skip(self))]
    async fn health(&self) -> ConsoleResult<HealthStatus> {
        self.client.get("/api/health").await
    }

    #[instrument(skip(self))]
    async fn vault_status(&self) -> ConsoleResult<VaultStatus> {
        self.client.get("/api/vault/status").await
    }

    #[instrument(skip(self))]
    async fn init_vault(&self, owner: &str, business: &str) -> ConsoleResult<MessageResponse> {
        self.client.post("/api/vault/init", &InitVaultBody { owner, business }).await
    }

    #[instrument(skip(self))]
    async fn needs_action(&self) -> ConsoleResult<Vec<WorkItem>> {
        self.client.get("/api/needs-action").await
    }

    #[instrument(skip(self))]
    async fn process_item(&self, filename: &str) -> ConsoleResult<ProcessItemResponse> {
        self.client.post("/api/needs-action/process", &ProcessItemBody { filename }).await
    }

    #[instrument(skip(self))]
    async fn process_all(&self) -> ConsoleResult<ProcessResult> {
        self.client.post_empty("/api/needs-action/process-all").await
    }

    #[instrument(skip(self))]
    async fn approvals(&self) -> ConsoleResult<Vec<Approval>> {
        self.client.get("/api/approvals").await
    }

    #[instrument(skip(self))]
    async fn approve(&self, id: &str) -> ConsoleResult<MessageResponse> {
        self.client.post_empty(&approval_path(id, "approve")).await
    }

    #[instrument(skip(self))]
    async fn reject(&self, id: &str) -> ConsoleResult<MessageResponse> {
        self.client.post_empty(&approval_path(id, "reject")).await
    }

    #[instrument(skip(self))]
    async fn dashboard(&self) -> ConsoleResult<DashboardMetrics> {
        self.client.get("/api/dashboard").await
    }

    #[instrument(skip(self))]
    async fn refresh_dashboard(&self) -> ConsoleResult<MessageResponse> {
        self.client.post_empty("/api/dashboard/refresh").await
    }

    #[instrument(skip(self))]
    async fn handbook(&self) -> ConsoleResult<HandbookData> {
        self.client.get("/api/handbook").await
    }

    #[instrument(skip(self, content), fields(len = content.len()))]
    async fn update_handbook(&self, content: &str) -> ConsoleResult<MessageResponse> {
        self.client.put("/api/handbook", &HandbookBody { content }).await
    }

    #[instrument(skip(self))]
    async fn validate_handbook(&self) -> ConsoleResult<HandbookData> {
        self.client.post_empty("/api/handbook/validate").await
    }

    #[instrument(skip(self, request), fields(sender = %request.sender))]
    async fn simulate_email(
        &self,
        request: &SimulateEmailRequest,
    ) -> ConsoleResult<SimulateEmailResponse> {
        self.client.post("/api/simulate/email", request).await
    }

    #[instrument(skip(self))]
    async fn simulate_batch(&self, count: u32) -> ConsoleResult<SimulateBatchResponse> {
        self.client.post("/api/simulate/batch", &SimulateBatchBody { count }).await
    }
}
