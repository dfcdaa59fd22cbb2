//! Workflow service - single entry point for operator transitions

use std::sync::Arc;
use std::time::Duration;

use console_common::time::Clock;
use console_domain::constants::{MAX_SIMULATE_BATCH, MIN_SIMULATE_BATCH};
use console_domain::{
    Ack, Approval, ConsoleError, ConsoleResult, DashboardMetrics, PollingConfig,
    SimulateEmailRequest, Transition, VaultStatus, WorkItem,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, info, instrument};

use crate::backend::AgentBackend;
use crate::handbook::HandbookEditor;
use crate::mutation::{BusySet, MutationOrchestrator, MutationTarget};
use crate::sync::{Fetcher, Poller, PollerConfig, Refresh};

/// Pollers, orchestrators and the handbook editor for one backend
pub struct WorkflowService {
    backend: Arc<dyn AgentBackend>,
    needs_action: Arc<Poller<Vec<WorkItem>>>,
    approvals: Arc<Poller<Vec<Approval>>>,
    dashboard: Arc<Poller<DashboardMetrics>>,
    vault: Arc<Poller<VaultStatus>>,
    items: MutationOrchestrator,
    decisions: MutationOrchestrator,
    simulator: MutationOrchestrator,
    vault_ops: MutationOrchestrator,
    dashboard_ops: MutationOrchestrator,
    handbook: HandbookEditor,
}

fn backend_poller<T, F>(
    backend: &Arc<dyn AgentBackend>,
    name: &str,
    interval: Duration,
    clock: &Arc<dyn Clock>,
    fetch: F,
) -> Arc<Poller<T>>
where
    T: Send + Sync + 'static,
    F: Fn(Arc<dyn AgentBackend>) -> BoxFuture<'static, ConsoleResult<T>> + Send + Sync + 'static,
{
    let backend = Arc::clone(backend);
    let fetcher: Fetcher<T> = Arc::new(move || fetch(Arc::clone(&backend)));
    Arc::new(Poller::new(PollerConfig::new(name, interval), fetcher, Arc::clone(clock)))
}

impl WorkflowService {
    pub fn new(
        backend: Arc<dyn AgentBackend>,
        polling: &PollingConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let needs_action =
            backend_poller(&backend, "needs_action", polling.interval(), &clock, |b| {
                async move { b.needs_action().await }.boxed()
            });
        let approvals = backend_poller(&backend, "approvals", polling.interval(), &clock, |b| {
            async move { b.approvals().await }.boxed()
        });
        let dashboard = backend_poller(&backend, "dashboard", polling.interval(), &clock, |b| {
            async move { b.dashboard().await }.boxed()
        });
        let vault = backend_poller(&backend, "vault", polling.vault_interval(), &clock, |b| {
            async move { b.vault_status().await }.boxed()
        });

        let needs_action_ref: Arc<dyn Refresh> = needs_action.clone();
        let approvals_ref: Arc<dyn Refresh> = approvals.clone();
        let dashboard_ref: Arc<dyn Refresh> = dashboard.clone();
        let vault_ref: Arc<dyn Refresh> = vault.clone();

        Self {
            items: MutationOrchestrator::new(
                "needs_action",
                vec![Arc::clone(&needs_action_ref), Arc::clone(&dashboard_ref)],
            ),
            decisions: MutationOrchestrator::new(
                "approvals",
                vec![
                    Arc::clone(&approvals_ref),
                    Arc::clone(&needs_action_ref),
                    Arc::clone(&dashboard_ref),
                ],
            ),
            simulator: MutationOrchestrator::new(
                "simulator",
                vec![Arc::clone(&needs_action_ref), Arc::clone(&dashboard_ref)],
            ),
            vault_ops: MutationOrchestrator::new(
                "vault",
                vec![Arc::clone(&vault_ref), Arc::clone(&dashboard_ref)],
            ),
            dashboard_ops: MutationOrchestrator::new("dashboard", vec![dashboard_ref]),
            handbook: HandbookEditor::new(Arc::clone(&backend)),
            backend,
            needs_action,
            approvals,
            dashboard,
            vault,
        }
    }

    /// Activate every poller.
    pub fn start(&self) -> ConsoleResult<()> {
        self.needs_action.start()?;
        self.approvals.start()?;
        self.dashboard.start()?;
        self.vault.start()?;
        info!("Workflow pollers started");
        Ok(())
    }

    /// Deactivate every active poller; the first failure is returned after
    /// all of them have been asked to stop.
    pub async fn stop(&self) -> ConsoleResult<()> {
        let results = [
            stop_if_active(&self.needs_action).await,
            stop_if_active(&self.approvals).await,
            stop_if_active(&self.dashboard).await,
            stop_if_active(&self.vault).await,
        ];
        info!("Workflow pollers stopped");
        results.into_iter().collect()
    }

    pub fn needs_action(&self) -> &Arc<Poller<Vec<WorkItem>>> {
        &self.needs_action
    }

    pub fn approvals(&self) -> &Arc<Poller<Vec<Approval>>> {
        &self.approvals
    }

    pub fn dashboard(&self) -> &Arc<Poller<DashboardMetrics>> {
        &self.dashboard
    }

    pub fn vault(&self) -> &Arc<Poller<VaultStatus>> {
        &self.vault
    }

    pub fn handbook(&self) -> &HandbookEditor {
        &self.handbook
    }

    /// Busy markers for process / process-all.
    pub fn item_busy(&self) -> &BusySet {
        self.items.busy()
    }

    /// Busy markers for approve / reject.
    pub fn decision_busy(&self) -> &BusySet {
        self.decisions.busy()
    }

    pub fn simulation_busy(&self) -> &BusySet {
        self.simulator.busy()
    }

    pub fn vault_busy(&self) -> &BusySet {
        self.vault_ops.busy()
    }

    /// Validate `transition` against the latest snapshots and run it.
    ///
    /// Stale targets, illegal states and bad arguments fail before any
    /// network call.
    #[instrument(skip(self, transition), fields(kind = %transition.kind()))]
    pub async fn request_transition(&self, transition: Transition) -> ConsoleResult<Ack> {
        let action = transition.kind().to_string();
        let backend = Arc::clone(&self.backend);

        match transition {
            Transition::ProcessItem { filename } => {
                self.ensure_work_item(&filename)?;
                let target = MutationTarget::item(filename.as_str());
                let response = self
                    .items
                    .run(&action, target, move || async move { backend.process_item(&filename).await })
                    .await?;
                Ok(Ack::Processed { action: response.action })
            }
            Transition::ProcessAll => {
                let has_items =
                    self.needs_action.snapshot().value().is_some_and(|items| !items.is_empty());
                if !has_items {
                    return Err(ConsoleError::invalid_transition("no work items to process"));
                }
                self.items
                    .run(&action, MutationTarget::Collection, move || async move {
                        backend.process_all().await
                    })
                    .await
                    .map(Ack::ProcessedAll)
            }
            Transition::Approve { id } => {
                self.ensure_approval(&id)?;
                let target = MutationTarget::item(id.as_str());
                self.decisions
                    .run(&action, target, move || async move { backend.approve(&id).await })
                    .await
                    .map(|response| Ack::Message(response.message))
            }
            Transition::Reject { id } => {
                self.ensure_approval(&id)?;
                let target = MutationTarget::item(id.as_str());
                self.decisions
                    .run(&action, target, move || async move { backend.reject(&id).await })
                    .await
                    .map(|response| Ack::Message(response.message))
            }
            Transition::InitVault { owner, business } => {
                self.ensure_vault_uninitialized()?;
                let owner = require_text("owner", owner)?;
                let business = require_text("business", business)?;
                self.vault_ops
                    .run(&action, MutationTarget::Collection, move || async move {
                        backend.init_vault(&owner, &business).await
                    })
                    .await
                    .map(|response| Ack::Message(response.message))
            }
            Transition::RefreshDashboard => self
                .dashboard_ops
                .run(&action, MutationTarget::Collection, move || async move {
                    backend.refresh_dashboard().await
                })
                .await
                .map(|response| Ack::Message(response.message)),
            Transition::SimulateEmail(request) => {
                let request = validate_email(request)?;
                self.simulator
                    .run(&action, MutationTarget::Collection, move || async move {
                        backend.simulate_email(&request).await
                    })
                    .await
                    .map(Ack::Simulated)
            }
            Transition::SimulateBatch { count } => {
                if !(MIN_SIMULATE_BATCH..=MAX_SIMULATE_BATCH).contains(&count) {
                    return Err(ConsoleError::invalid_input(format!(
                        "batch size must be between {MIN_SIMULATE_BATCH} and {MAX_SIMULATE_BATCH}, got {count}"
                    )));
                }
                self.simulator
                    .run(&action, MutationTarget::Collection, move || async move {
                        backend.simulate_batch(count).await
                    })
                    .await
                    .map(Ack::SimulatedBatch)
            }
            Transition::SaveHandbook => self.handbook.save().await.map(Ack::Message),
            Transition::ValidateHandbook => self.handbook.validate().await.map(Ack::Validated),
        }
    }

    fn ensure_work_item(&self, filename: &str) -> ConsoleResult<()> {
        let present = self
            .needs_action
            .snapshot()
            .value()
            .is_some_and(|items| items.iter().any(|item| item.filename == filename));
        if present {
            Ok(())
        } else {
            debug!(filename, "Work item not in latest snapshot");
            Err(ConsoleError::stale_target("work item", filename))
        }
    }

    fn ensure_approval(&self, id: &str) -> ConsoleResult<()> {
        let present = self
            .approvals
            .snapshot()
            .value()
            .is_some_and(|approvals| approvals.iter().any(|approval| approval.id == id));
        if present {
            Ok(())
        } else {
            debug!(id, "Approval not in latest snapshot");
            Err(ConsoleError::stale_target("approval", id))
        }
    }

    fn ensure_vault_uninitialized(&self) -> ConsoleResult<()> {
        match self.vault.snapshot().value() {
            None => Err(ConsoleError::invalid_transition("vault status has not loaded yet")),
            Some(status) if status.initialized => {
                Err(ConsoleError::invalid_transition("vault is already initialized"))
            }
            Some(_) => Ok(()),
        }
    }
}

async fn stop_if_active<T: Send + Sync + 'static>(poller: &Poller<T>) -> ConsoleResult<()> {
    if poller.is_active() {
        poller.stop().await
    } else {
        Ok(())
    }
}

fn require_text(field: &str, value: String) -> ConsoleResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ConsoleError::invalid_input(format!("{field} must not be empty")))
    } else {
        Ok(trimmed.to_string())
    }
}

fn validate_email(request: SimulateEmailRequest) -> ConsoleResult<SimulateEmailRequest> {
    Ok(SimulateEmailRequest {
        sender: require_text("sender", request.sender)?,
        subject: require_text("subject", request.subject)?,
        body: require_text("body", request.body)?,
        ..request
    })
}
