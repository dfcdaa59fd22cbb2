//! Application context - dependency injection container

use std::sync::Arc;

use console_common::time::{Clock, SystemClock};
use console_core::{into_fetcher, AgentBackend, Poller, PollerConfig, Snapshot, WorkflowService};
use console_domain::{Config, ConsoleResult, HealthStatus};
use console_infra::RemoteAgentBackend;
use tracing::{info, instrument, warn};

use crate::utils::health::{ComponentHealth, HealthReport};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub backend: Arc<dyn AgentBackend>,
    pub workflow: Arc<WorkflowService>,
    /// Polls `GET /api/health`, independent of the workflow pollers.
    pub health: Arc<Poller<HealthStatus>>,
    pub clock: Arc<dyn Clock>,
}

impl AppContext {
    /// Create a context talking to the backend named in `config.api`.
    ///
    /// Nothing is started; call [`AppContext::start`].
    pub fn new(config: Config) -> ConsoleResult<Self> {
        let backend: Arc<dyn AgentBackend> =
            Arc::new(RemoteAgentBackend::from_config(&config.api)?);
        Ok(Self::with_backend(config, backend, Arc::new(SystemClock)))
    }

    /// Create a context around an existing backend
    ///
    /// Tests use this to inject a backend pointed at a mock server and a
    /// controllable clock.
    pub fn with_backend(
        config: Config,
        backend: Arc<dyn AgentBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let workflow =
            Arc::new(WorkflowService::new(Arc::clone(&backend), &config.polling, Arc::clone(&clock)));

        let health_backend = Arc::clone(&backend);
        let health = Arc::new(Poller::new(
            PollerConfig::new("health", config.polling.health_interval()),
            into_fetcher(move || {
                let backend = Arc::clone(&health_backend);
                async move { backend.health().await }
            }),
            Arc::clone(&clock),
        ));

        Self { config, backend, workflow, health, clock }
    }

    /// Activate every poller and load the handbook draft.
    ///
    /// A failed handbook load is logged, not returned: the handbook does not
    /// exist until the vault has been initialized.
    #[instrument(skip(self), fields(base_url = %self.config.api.base_url))]
    pub async fn start(&self) -> ConsoleResult<()> {
        self.workflow.start()?;
        self.health.start()?;

        match self.workflow.handbook().load().await {
            Ok(state) => info!(bytes = state.draft.len(), "Handbook loaded"),
            Err(err) => warn!(error = %err, "Handbook not loaded at startup"),
        }

        info!("Console context started");
        Ok(())
    }

    /// Stop every poller, waiting for each to wind down.
    ///
    /// Safe to call more than once.
    pub async fn shutdown(&self) -> ConsoleResult<()> {
        info!("shutdown called on AppContext");

        let workflow = self.workflow.stop().await;
        let health = if self.health.is_active() { self.health.stop().await } else { Ok(()) };

        workflow.and(health)
    }

    /// Summarize the latest snapshot of every polled resource.
    pub fn health_check(&self) -> HealthReport {
        let health = self.health.snapshot();
        let backend = match health.value() {
            Some(status) if health.error.is_none() && status.status != "ok" => {
                ComponentHealth::unhealthy("backend", format!("agent reports '{}'", status.status))
            }
            _ => snapshot_health("backend", &health),
        };

        let mut report = HealthReport::new(self.clock.utc_now())
            .add_component(backend)
            .add_component(snapshot_health("needs_action", &self.workflow.needs_action().snapshot()))
            .add_component(snapshot_health("approvals", &self.workflow.approvals().snapshot()))
            .add_component(snapshot_health("dashboard", &self.workflow.dashboard().snapshot()))
            .add_component(snapshot_health("vault", &self.workflow.vault().snapshot()));

        report.calculate_score();
        report
    }
}

fn snapshot_health<T>(name: &str, snapshot: &Snapshot<T>) -> ComponentHealth {
    match (&snapshot.error, &snapshot.value) {
        (Some(error), _) => ComponentHealth::unhealthy(name, error.detail()),
        (None, None) if snapshot.loading => ComponentHealth::unhealthy(name, "loading"),
        (None, None) => ComponentHealth::unhealthy(name, "not polled"),
        (None, Some(_)) => ComponentHealth::healthy(name),
    }
}
