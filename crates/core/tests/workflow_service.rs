//! Lifecycle transitions through the workflow service against an in-memory
//! backend.

mod support;

use std::sync::Arc;

use console_common::assert_eventually_async;
use console_common::time::MockClock;
use console_core::{AgentBackend, MutationTarget, WorkflowService};
use console_domain::{Ack, ConsoleError, SimulateEmailRequest, Transition};
use support::{approval, quiet_polling, FakeBackend, FakeState, EVENTUALLY};

async fn started(backend: &Arc<FakeBackend>) -> Arc<WorkflowService> {
    let service = Arc::new(WorkflowService::new(
        Arc::clone(backend) as Arc<dyn AgentBackend>,
        &quiet_polling(),
        Arc::new(MockClock::new()),
    ));
    service.start().unwrap();
    assert_eventually_async!(EVENTUALLY, async {
        service.needs_action().snapshot().fetches >= 1
            && service.approvals().snapshot().fetches >= 1
            && service.dashboard().snapshot().fetches >= 1
            && service.vault().snapshot().fetches >= 1
    });
    service
}

fn filenames(service: &WorkflowService) -> Vec<String> {
    service
        .needs_action()
        .snapshot()
        .value()
        .map(|items| items.iter().map(|item| item.filename.clone()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn processing_an_item_removes_it_from_the_next_snapshot() {
    let backend = FakeBackend::with_items(&["a.txt"]);
    let service = started(&backend).await;
    assert_eq!(filenames(&service), vec!["a.txt"]);

    let ack = service
        .request_transition(Transition::ProcessItem { filename: "a.txt".into() })
        .await
        .unwrap();

    assert_eq!(ack, Ack::Processed { action: "archived".into() });
    assert!(filenames(&service).is_empty());
    assert_eq!(service.dashboard().snapshot().value().map(|d| d.needs_action), Some(0));

    service.stop().await.unwrap();
}

#[tokio::test]
async fn unknown_item_is_stale_and_never_sent() {
    let backend = FakeBackend::with_items(&["a.txt"]);
    let service = started(&backend).await;

    let err = service
        .request_transition(Transition::ProcessItem { filename: "ghost.txt".into() })
        .await
        .unwrap_err();

    assert_eq!(err, ConsoleError::stale_target("work item", "ghost.txt"));
    assert_eq!(backend.calls("process_item"), 0);
}

#[tokio::test]
async fn duplicate_process_request_makes_one_call() {
    let backend = FakeBackend::with_items(&["a.txt"]);
    let service = started(&backend).await;
    let gate = backend.gate_mutations();

    let first = tokio::spawn({
        let service = Arc::clone(&service);
        async move {
            service.request_transition(Transition::ProcessItem { filename: "a.txt".into() }).await
        }
    });
    assert_eventually_async!(EVENTUALLY, async {
        service.item_busy().is_busy(&MutationTarget::item("a.txt"))
    });

    let second = service
        .request_transition(Transition::ProcessItem { filename: "a.txt".into() })
        .await;
    assert_eq!(second.unwrap_err(), ConsoleError::busy("a.txt"));

    gate.add_permits(1);
    first.await.unwrap().unwrap();
    assert_eq!(backend.calls("process_item"), 1);
    assert!(service.item_busy().is_idle());
}

#[tokio::test]
async fn different_items_are_processed_concurrently() {
    let backend = FakeBackend::with_items(&["a.txt", "b.txt"]);
    let service = started(&backend).await;
    let gate = backend.gate_mutations();

    let spawn_process = |filename: &'static str| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service.request_transition(Transition::ProcessItem { filename: filename.into() }).await
        })
    };
    let a = spawn_process("a.txt");
    let b = spawn_process("b.txt");

    assert_eventually_async!(EVENTUALLY, async { backend.calls("process_item") == 2 });
    assert_eq!(service.item_busy().busy_items(), vec!["a.txt".to_string(), "b.txt".to_string()]);

    gate.add_permits(2);
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();
    assert!(filenames(&service).is_empty());
}

#[tokio::test]
async fn failed_mutation_propagates_without_refresh() {
    let backend = FakeBackend::with_items(&["a.txt"]);
    let service = started(&backend).await;
    backend.fail_once("process_item", ConsoleError::remote(500, "Internal Server Error"));
    let polls_before = backend.calls("needs_action");

    let err = service
        .request_transition(Transition::ProcessItem { filename: "a.txt".into() })
        .await
        .unwrap_err();

    assert_eq!(err, ConsoleError::remote(500, "Internal Server Error"));
    assert_eq!(backend.calls("needs_action"), polls_before);
    assert_eq!(filenames(&service), vec!["a.txt"]);
    assert!(service.item_busy().is_idle());
}

#[tokio::test]
async fn rejecting_an_approval_empties_the_list() {
    let backend = FakeBackend::new(FakeState {
        approvals: vec![approval("x1")],
        initialized: true,
        ..FakeState::default()
    });
    let service = started(&backend).await;

    let ack = service.request_transition(Transition::Reject { id: "x1".into() }).await.unwrap();
    assert_eq!(ack, Ack::Message("Rejected x1".into()));
    assert_eq!(service.approvals().snapshot().value().map(Vec::len), Some(0));

    let err = service.request_transition(Transition::Approve { id: "x1".into() }).await.unwrap_err();
    assert_eq!(err, ConsoleError::stale_target("approval", "x1"));
    assert_eq!(backend.calls("approve"), 0);
}

#[tokio::test]
async fn simulate_batch_refreshes_needs_action_exactly_once() {
    let backend = FakeBackend::with_items(&[]);
    let service = started(&backend).await;
    let polls_before = backend.calls("needs_action");

    let ack = service.request_transition(Transition::SimulateBatch { count: 5 }).await.unwrap();

    match ack {
        Ack::SimulatedBatch(response) => assert_eq!(response.count, 5),
        other => panic!("unexpected ack: {other:?}"),
    }
    assert_eq!(backend.calls("needs_action") - polls_before, 1);
    assert_eq!(filenames(&service).len(), 5);
}

#[tokio::test]
async fn simulate_batch_rejects_out_of_range_counts() {
    let backend = FakeBackend::with_items(&[]);
    let service = started(&backend).await;

    for count in [0, 21] {
        let err =
            service.request_transition(Transition::SimulateBatch { count }).await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidInput { .. }), "count {count}: {err:?}");
    }
    assert_eq!(backend.calls("simulate_batch"), 0);
}

#[tokio::test]
async fn simulate_email_requires_all_fields() {
    let backend = FakeBackend::with_items(&[]);
    let service = started(&backend).await;

    let blank_subject = SimulateEmailRequest::new("client@example.com", "  ", "Hello");
    let err = service
        .request_transition(Transition::SimulateEmail(blank_subject))
        .await
        .unwrap_err();
    assert_eq!(err, ConsoleError::invalid_input("subject must not be empty"));

    let request = SimulateEmailRequest::new("client@example.com", "Invoice", "Please pay")
        .with_priority("high");
    let ack = service.request_transition(Transition::SimulateEmail(request)).await.unwrap();
    assert!(matches!(ack, Ack::Simulated(ref response) if response.filename == "EMAIL_sim_1.md"));
    assert_eq!(filenames(&service), vec!["EMAIL_sim_1.md"]);
}

#[tokio::test]
async fn process_all_needs_items_and_locks_the_collection() {
    let empty = FakeBackend::with_items(&[]);
    let service = started(&empty).await;
    let err = service.request_transition(Transition::ProcessAll).await.unwrap_err();
    assert!(matches!(err, ConsoleError::InvalidTransition { .. }));
    assert_eq!(empty.calls("process_all"), 0);

    let backend = FakeBackend::with_items(&["a.txt", "b.txt"]);
    let service = started(&backend).await;
    let gate = backend.gate_mutations();

    let bulk = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.request_transition(Transition::ProcessAll).await }
    });
    assert_eventually_async!(EVENTUALLY, async {
        service.item_busy().is_busy(&MutationTarget::Collection)
    });

    let single = service
        .request_transition(Transition::ProcessItem { filename: "a.txt".into() })
        .await;
    assert_eq!(single.unwrap_err(), ConsoleError::busy("a.txt"));

    gate.add_permits(1);
    match bulk.await.unwrap().unwrap() {
        Ack::ProcessedAll(result) => assert_eq!(result.processed, 2),
        other => panic!("unexpected ack: {other:?}"),
    }
    assert!(filenames(&service).is_empty());
    assert_eq!(backend.calls("process_item"), 0);
}

#[tokio::test]
async fn vault_initializes_once() {
    let backend = FakeBackend::new(FakeState::default());
    let service = started(&backend).await;

    let err = service
        .request_transition(Transition::InitVault { owner: " ".into(), business: "Acme".into() })
        .await
        .unwrap_err();
    assert_eq!(err, ConsoleError::invalid_input("owner must not be empty"));

    let ack = service
        .request_transition(Transition::InitVault { owner: "Ada".into(), business: "Acme".into() })
        .await
        .unwrap();
    assert_eq!(ack, Ack::Message("Vault initialized for Ada (Acme)".into()));
    assert_eq!(service.vault().snapshot().value().map(|v| v.initialized), Some(true));

    let again = service
        .request_transition(Transition::InitVault { owner: "Ada".into(), business: "Acme".into() })
        .await
        .unwrap_err();
    assert_eq!(again, ConsoleError::invalid_transition("vault is already initialized"));
    assert_eq!(backend.calls("init_vault"), 1);
}

#[tokio::test]
async fn dashboard_refresh_transition_refetches_metrics() {
    let backend = FakeBackend::with_items(&["a.txt"]);
    let service = started(&backend).await;
    let before = backend.calls("dashboard");

    let ack = service.request_transition(Transition::RefreshDashboard).await.unwrap();

    assert_eq!(ack.summary(), "Dashboard refreshed");
    assert_eq!(backend.calls("dashboard") - before, 1);
}

#[tokio::test]
async fn stop_deactivates_every_poller() {
    let backend = FakeBackend::with_items(&[]);
    let service = started(&backend).await;

    service.stop().await.unwrap();

    assert!(!service.needs_action().is_active());
    assert!(!service.approvals().is_active());
    assert!(!service.dashboard().is_active());
    assert!(!service.vault().is_active());
    service.stop().await.unwrap();
}
