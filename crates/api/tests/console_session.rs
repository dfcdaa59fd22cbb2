//! Operator sessions against a mock agent

use std::sync::Arc;
use std::time::Duration;

use console_common::assert_eventually_async;
use console_common::time::SystemClock;
use console_core::AgentBackend;
use console_domain::{ApiConfig, Config, PollingConfig};
use console_infra::RemoteAgentBackend;
use console_lib::{run_line, AppContext, Outcome};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EVENTUALLY: Duration = Duration::from_secs(5);

fn work_item(filename: &str) -> Value {
    json!({
        "id": filename,
        "filename": filename,
        "type": "email",
        "sender": "client@example.com",
        "subject": "Invoice",
        "priority": "high",
        "received": "2026-01-05T09:00:00",
        "status": "pending"
    })
}

fn approval(id: &str) -> Value {
    json!({
        "id": id,
        "filename": format!("{id}.md"),
        "action": "send_email",
        "source_file": format!("EMAIL_{id}.md"),
        "created": "2026-01-05T09:00:00",
        "expires": "2026-01-06T09:00:00",
        "status": "pending",
        "priority": "high",
        "subject": "Invoice reply",
        "reason": "Outbound email needs sign-off"
    })
}

fn dashboard(needs_action: u32, pending_approval: u32) -> Value {
    json!({
        "needs_action": needs_action,
        "pending_approval": pending_approval,
        "done_today": 0,
        "active_plans": 0,
        "mtd_revenue": "$0",
        "monthly_target": "$10,000",
        "alerts": [],
        "recent_activity": []
    })
}

async fn get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer the first GET of `route` with `first` and every later one with `then`.
async fn get_then(server: &MockServer, route: &str, first: Value, then: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(first))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(server)
        .await;
    get(server, route, then).await;
}

async fn mount_common(server: &MockServer) {
    get(server, "/api/health", json!({ "status": "ok" })).await;
    get(
        server,
        "/api/vault/status",
        json!({ "initialized": true, "folders": [], "core_files": [] }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/handbook"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Handbook not found" })))
        .mount(server)
        .await;
}

fn config_for(server: &MockServer) -> Config {
    Config {
        api: ApiConfig { base_url: server.uri(), ..ApiConfig::default() },
        polling: PollingConfig {
            interval_ms: 3_600_000,
            vault_interval_ms: 3_600_000,
            health_interval_ms: 3_600_000,
        },
        ..Config::default()
    }
}

async fn started(server: &MockServer) -> AppContext {
    let config = config_for(server);
    let backend: Arc<dyn AgentBackend> =
        Arc::new(RemoteAgentBackend::from_config(&config.api).expect("backend"));
    let ctx = AppContext::with_backend(config, backend, Arc::new(SystemClock));
    ctx.start().await.expect("start");

    assert_eventually_async!(EVENTUALLY, async {
        ctx.workflow.needs_action().snapshot().fetches >= 1
            && ctx.workflow.approvals().snapshot().fetches >= 1
            && ctx.workflow.dashboard().snapshot().fetches >= 1
            && ctx.workflow.vault().snapshot().fetches >= 1
            && ctx.health.snapshot().fetches >= 1
    });
    ctx
}

async fn say(ctx: &AppContext, line: &str) -> String {
    match run_line(ctx, line).await {
        Outcome::Continue(text) => text,
        Outcome::Quit => panic!("'{line}' quit the session"),
    }
}

#[tokio::test]
async fn processing_an_item_empties_the_list() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    get_then(&server, "/api/needs-action", json!([work_item("a.txt")]), json!([])).await;
    get(&server, "/api/approvals", json!([])).await;
    get_then(&server, "/api/dashboard", dashboard(1, 0), dashboard(0, 0)).await;
    Mock::given(method("POST"))
        .and(path("/api/needs-action/process"))
        .and(body_json(json!({ "filename": "a.txt" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "action": "archived" })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = started(&server).await;
    assert!(say(&ctx, "items").await.contains("a.txt"));

    assert_eq!(say(&ctx, "process a.txt").await, "processed: archived");

    let items = say(&ctx, "items").await;
    assert!(items.starts_with("Needs action: 0 items awaiting processing"), "{items}");
    assert!(say(&ctx, "dashboard").await.contains("needs action      0"));

    ctx.shutdown().await.unwrap();
}

#[tokio::test]
async fn rejecting_an_approval_removes_it() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    get(&server, "/api/needs-action", json!([])).await;
    get_then(&server, "/api/approvals", json!([approval("x1")]), json!([])).await;
    get(&server, "/api/dashboard", dashboard(0, 0)).await;
    Mock::given(method("POST"))
        .and(path("/api/approvals/x1/reject"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Rejected x1" })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = started(&server).await;
    assert!(say(&ctx, "approvals").await.contains("x1  [high] send_email - Invoice reply"));

    assert_eq!(say(&ctx, "reject x1").await, "Rejected x1");
    assert!(say(&ctx, "approvals").await.contains("Nothing is waiting for a decision."));

    ctx.shutdown().await.unwrap();
}

#[tokio::test]
async fn stale_and_malformed_commands_never_reach_the_agent() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    get(&server, "/api/needs-action", json!([])).await;
    get(&server, "/api/approvals", json!([])).await;
    get(&server, "/api/dashboard", dashboard(0, 0)).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = started(&server).await;

    let stale = say(&ctx, "process gone.md").await;
    assert!(stale.starts_with("error: Stale target: work item 'gone.md'"), "{stale}");
    assert!(say(&ctx, "approve").await.contains("usage: approve <id>"));
    assert!(say(&ctx, "simulate 50").await.contains("between 1 and 20"));
    assert!(say(&ctx, "init").await.contains("vault is already initialized"));
    assert!(say(&ctx, "launch").await.contains("unknown command 'launch'"));
    assert_eq!(say(&ctx, "").await, "");

    ctx.shutdown().await.unwrap();
}

#[tokio::test]
async fn backend_failure_surfaces_detail() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    get(&server, "/api/needs-action", json!([])).await;
    get(&server, "/api/approvals", json!([])).await;
    get(&server, "/api/dashboard", dashboard(0, 0)).await;
    Mock::given(method("POST"))
        .and(path("/api/simulate/batch"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "Simulator offline" })))
        .mount(&server)
        .await;

    let ctx = started(&server).await;
    assert_eq!(say(&ctx, "simulate 3").await, "error: Simulator offline (try again shortly)");

    ctx.shutdown().await.unwrap();
}

#[tokio::test]
async fn missing_handbook_does_not_block_startup() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    get(&server, "/api/needs-action", json!([])).await;
    get(&server, "/api/approvals", json!([])).await;
    get(&server, "/api/dashboard", dashboard(0, 0)).await;

    let ctx = started(&server).await;
    assert!(ctx.workflow.handbook().state().server.is_none());
    assert_eq!(say(&ctx, "handbook").await, "error: Handbook not found");

    let status = say(&ctx, "status").await;
    assert!(status.starts_with("Console healthy (100% of components)"), "{status}");

    assert_eq!(run_line(&ctx, "quit").await, Outcome::Quit);
    ctx.shutdown().await.unwrap();
    assert!(!ctx.health.is_active());
}

#[tokio::test]
async fn unreachable_agent_degrades_health() {
    let config = Config {
        api: ApiConfig { base_url: "http://127.0.0.1:9".into(), timeout_secs: 2, ..ApiConfig::default() },
        polling: PollingConfig {
            interval_ms: 3_600_000,
            vault_interval_ms: 3_600_000,
            health_interval_ms: 3_600_000,
        },
        ..Config::default()
    };
    let ctx = AppContext::new(config).expect("context");
    ctx.start().await.expect("start");

    assert_eventually_async!(EVENTUALLY, async { ctx.health.snapshot().error.is_some() });

    let report = ctx.health_check();
    assert!(!report.is_healthy);
    assert!(report.unhealthy_components().any(|c| c.name == "backend"));

    ctx.shutdown().await.unwrap();
}
