//! Shared test helpers for `console-core` integration tests.
//!
//! `FakeBackend` keeps the agent's state in memory and mutates it the way the
//! real backend does, so tests can assert on what the next poll observes.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use console_core::AgentBackend;
use console_domain::{
    Approval, ConsoleError, ConsoleResult, DashboardMetrics, HandbookData, HealthStatus,
    MessageResponse, PollingConfig, ProcessItemResponse, ProcessResult, SectionValidation,
    SimulateBatchResponse, SimulateEmailRequest, SimulateEmailResponse, VaultStatus, WorkItem,
};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

pub const SECTIONS: [&str; 2] = ["## 1. Identity", "## 2. Communication Rules"];

/// Polling intervals long enough that no tick fires during a test.
pub fn quiet_polling() -> PollingConfig {
    PollingConfig { interval_ms: 3_600_000, vault_interval_ms: 3_600_000, health_interval_ms: 3_600_000 }
}

pub fn work_item(filename: &str) -> WorkItem {
    WorkItem {
        id: filename.trim_end_matches(".md").to_string(),
        filename: filename.to_string(),
        item_type: "email".to_string(),
        sender: "client@example.com".to_string(),
        subject: format!("About {filename}"),
        priority: "normal".to_string(),
        received: "2026-01-05T09:00:00".to_string(),
        status: "pending".to_string(),
        snippet: String::new(),
    }
}

pub fn approval(id: &str) -> Approval {
    Approval {
        id: id.to_string(),
        filename: format!("{id}.md"),
        action: "send_email".to_string(),
        source_file: format!("EMAIL_{id}.md"),
        created: "2026-01-05T09:00:00".to_string(),
        expires: "2026-01-06T09:00:00".to_string(),
        status: "pending".to_string(),
        priority: "high".to_string(),
        subject: "Invoice reply".to_string(),
        reason: "Outbound email needs sign-off".to_string(),
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub needs_action: Vec<WorkItem>,
    pub approvals: Vec<Approval>,
    pub initialized: bool,
    pub handbook: String,
    pub simulated: u32,
}

pub struct FakeBackend {
    pub state: Mutex<FakeState>,
    calls: Mutex<HashMap<&'static str, usize>>,
    mutation_gate: Mutex<Option<Arc<Semaphore>>>,
    handbook_gate: Mutex<Option<Arc<Semaphore>>>,
    failures: Mutex<HashMap<&'static str, ConsoleError>>,
}

impl FakeBackend {
    pub fn new(state: FakeState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
            calls: Mutex::new(HashMap::new()),
            mutation_gate: Mutex::new(None),
            handbook_gate: Mutex::new(None),
            failures: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_items(filenames: &[&str]) -> Arc<Self> {
        Self::new(FakeState {
            needs_action: filenames.iter().map(|f| work_item(f)).collect(),
            initialized: true,
            ..FakeState::default()
        })
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls.lock().get(operation).copied().unwrap_or(0)
    }

    /// Block every mutating operation until permits are added to the
    /// returned semaphore.
    pub fn gate_mutations(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.mutation_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    /// Block `GET /api/handbook` until permits are added to the returned
    /// semaphore. The call is counted before it blocks.
    pub fn gate_handbook(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.handbook_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    /// Make `operation` fail once with `error`.
    pub fn fail_once(&self, operation: &'static str, error: ConsoleError) {
        self.failures.lock().insert(operation, error);
    }

    fn record(&self, operation: &'static str) -> ConsoleResult<()> {
        *self.calls.lock().entry(operation).or_insert(0) += 1;
        match self.failures.lock().remove(operation) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn mutate(&self, operation: &'static str) -> ConsoleResult<()> {
        self.record(operation)?;
        let gate = self.mutation_gate.lock().clone();
        pass(gate).await;
        Ok(())
    }

    fn handbook_data(content: &str) -> HandbookData {
        let validation: Vec<SectionValidation> = SECTIONS
            .iter()
            .map(|section| SectionValidation {
                section: (*section).to_string(),
                description: "required".to_string(),
                present: content.contains(section),
            })
            .collect();
        let is_complete = validation.iter().all(|s| s.present);
        HandbookData { content: content.to_string(), validation, is_complete }
    }
}

async fn pass(gate: Option<Arc<Semaphore>>) {
    if let Some(gate) = gate {
        if let Ok(permit) = gate.acquire().await {
            permit.forget();
        }
    }
}

fn message(text: impl Into<String>) -> MessageResponse {
    MessageResponse { message: text.into() }
}

#[async_trait]
impl AgentBackend for FakeBackend {
    async fn health(&self) -> ConsoleResult<HealthStatus> {
        self.record("health")?;
        Ok(HealthStatus { status: "ok".to_string() })
    }

    async fn vault_status(&self) -> ConsoleResult<VaultStatus> {
        self.record("vault_status")?;
        Ok(VaultStatus {
            initialized: self.state.lock().initialized,
            folders: Vec::new(),
            core_files: Vec::new(),
        })
    }

    async fn init_vault(&self, owner: &str, business: &str) -> ConsoleResult<MessageResponse> {
        self.mutate("init_vault").await?;
        self.state.lock().initialized = true;
        Ok(message(format!("Vault initialized for {owner} ({business})")))
    }

    async fn needs_action(&self) -> ConsoleResult<Vec<WorkItem>> {
        self.record("needs_action")?;
        Ok(self.state.lock().needs_action.clone())
    }

    async fn process_item(&self, filename: &str) -> ConsoleResult<ProcessItemResponse> {
        self.mutate("process_item").await?;
        let mut state = self.state.lock();
        let before = state.needs_action.len();
        state.needs_action.retain(|item| item.filename != filename);
        if state.needs_action.len() == before {
            return Err(ConsoleError::remote(404, format!(r#"{{"detail":"File not found: {filename}"}}"#)));
        }
        Ok(ProcessItemResponse { action: "archived".to_string() })
    }

    async fn process_all(&self) -> ConsoleResult<ProcessResult> {
        self.mutate("process_all").await?;
        let mut state = self.state.lock();
        let processed = u32::try_from(state.needs_action.len()).unwrap_or(u32::MAX);
        let actions = state.needs_action.drain(..).map(|item| format!("{}: archived", item.filename)).collect();
        Ok(ProcessResult { processed, actions })
    }

    async fn approvals(&self) -> ConsoleResult<Vec<Approval>> {
        self.record("approvals")?;
        Ok(self.state.lock().approvals.clone())
    }

    async fn approve(&self, id: &str) -> ConsoleResult<MessageResponse> {
        self.mutate("approve").await?;
        self.state.lock().approvals.retain(|a| a.id != id);
        Ok(message(format!("Approved {id}")))
    }

    async fn reject(&self, id: &str) -> ConsoleResult<MessageResponse> {
        self.mutate("reject").await?;
        self.state.lock().approvals.retain(|a| a.id != id);
        Ok(message(format!("Rejected {id}")))
    }

    async fn dashboard(&self) -> ConsoleResult<DashboardMetrics> {
        self.record("dashboard")?;
        let state = self.state.lock();
        Ok(DashboardMetrics {
            needs_action: u32::try_from(state.needs_action.len()).unwrap_or(u32::MAX),
            pending_approval: u32::try_from(state.approvals.len()).unwrap_or(u32::MAX),
            done_today: 0,
            active_plans: 0,
            mtd_revenue: "$0".to_string(),
            monthly_target: "$10,000".to_string(),
            alerts: Vec::new(),
            recent_activity: Vec::new(),
            agent_health: "Online".to_string(),
        })
    }

    async fn refresh_dashboard(&self) -> ConsoleResult<MessageResponse> {
        self.mutate("refresh_dashboard").await?;
        Ok(message("Dashboard refreshed"))
    }

    async fn handbook(&self) -> ConsoleResult<HandbookData> {
        self.record("handbook")?;
        let gate = self.handbook_gate.lock().clone();
        pass(gate).await;
        Ok(Self::handbook_data(&self.state.lock().handbook))
    }

    async fn update_handbook(&self, content: &str) -> ConsoleResult<MessageResponse> {
        self.mutate("update_handbook").await?;
        self.state.lock().handbook = content.to_string();
        Ok(message("Handbook updated"))
    }

    async fn validate_handbook(&self) -> ConsoleResult<HandbookData> {
        self.record("validate_handbook")?;
        Ok(Self::handbook_data(&self.state.lock().handbook))
    }

    async fn simulate_email(
        &self,
        request: &SimulateEmailRequest,
    ) -> ConsoleResult<SimulateEmailResponse> {
        self.mutate("simulate_email").await?;
        let mut state = self.state.lock();
        state.simulated += 1;
        let filename = format!("EMAIL_sim_{}.md", state.simulated);
        let mut item = work_item(&filename);
        item.sender = request.sender.clone();
        item.subject = request.subject.clone();
        state.needs_action.push(item);
        Ok(SimulateEmailResponse { message: "Email simulated".to_string(), filename })
    }

    async fn simulate_batch(&self, count: u32) -> ConsoleResult<SimulateBatchResponse> {
        self.mutate("simulate_batch").await?;
        let mut state = self.state.lock();
        let mut files = Vec::new();
        for _ in 0..count {
            state.simulated += 1;
            let filename = format!("EMAIL_sim_{}.md", state.simulated);
            state.needs_action.push(work_item(&filename));
            files.push(filename);
        }
        Ok(SimulateBatchResponse { message: format!("Simulated {count} emails"), count, files })
    }
}

/// Short wait used with `assert_eventually_async!`.
pub const EVENTUALLY: Duration = Duration::from_secs(2);
