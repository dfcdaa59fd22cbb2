//! Plain-text views of snapshots for the operator
//!
//! Renderers only read: snapshots, busy markers and editor state are passed
//! in by reference and nothing here triggers a fetch.

use std::fmt::Write as _;

use console_common::time::{format_age, Clock};
use console_core::{BusySet, HandbookState, MutationTarget, Snapshot};
use console_domain::{Approval, DashboardMetrics, VaultStatus, WorkItem};

use crate::utils::health::HealthReport;

pub const HELP: &str = "\
Views
  status                          backend health and poll freshness
  items                           work items waiting in needs-action
  approvals                       actions waiting for a decision
  dashboard                       agent metrics, alerts and activity
  vault                           vault layout
  handbook                        handbook draft and validation
Transitions
  process <filename>              process one work item
  process-all                     process every work item
  approve <id> | reject <id>      decide a pending approval
  init [<owner> | <business>]     initialize the vault
  refresh                         regenerate the dashboard
  simulate [<count>]              generate 1-20 random emails
  email <sender> | <subject> | <body>
                                  inject one custom email
  edit <text>                     replace the handbook draft (\\n for newlines)
  save                            upload the draft and reload it
  validate                        re-check handbook sections
Session
  help                            this text
  quit                            stop polling and exit";

/// One-line freshness note for a snapshot, e.g. `updated 5s ago`.
pub fn freshness<T>(snapshot: &Snapshot<T>, clock: &dyn Clock) -> String {
    let age = snapshot.updated_at.map(|at| {
        let elapsed = clock.utc_now().signed_duration_since(at);
        format_age(elapsed.to_std().unwrap_or_default())
    });

    match (&snapshot.error, age) {
        (Some(error), Some(age)) => {
            format!("stale, last refresh failed: {} (data from {age})", error.detail())
        }
        (Some(error), None) => format!("unavailable: {}", error.detail()),
        (None, Some(age)) => format!("updated {age}"),
        (None, None) if snapshot.loading => "loading...".to_string(),
        (None, None) => "not polled".to_string(),
    }
}

fn busy_marker(busy: &BusySet, id: &str) -> &'static str {
    if busy.is_busy(&MutationTarget::item(id)) {
        "* "
    } else {
        "  "
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

pub fn render_items(
    snapshot: &Snapshot<Vec<WorkItem>>,
    busy: &BusySet,
    clock: &dyn Clock,
) -> String {
    let mut out = String::new();
    let items = snapshot.value().map_or(&[][..], Vec::as_slice);

    let _ = write!(
        out,
        "Needs action: {} awaiting processing ({})",
        plural(items.len(), "item"),
        freshness(snapshot, clock)
    );
    if !busy.is_idle() && busy.busy_items().is_empty() {
        out.push_str("\n  processing all items...");
    }
    if items.is_empty() && snapshot.value.is_some() {
        out.push_str("\n  No items need action.");
    }
    for item in items {
        let _ = write!(
            out,
            "\n{}{:<40} {:<7} {:<28} {}",
            busy_marker(busy, &item.filename),
            item.filename,
            item.priority,
            item.sender,
            item.subject
        );
    }
    out
}

pub fn render_approvals(
    snapshot: &Snapshot<Vec<Approval>>,
    busy: &BusySet,
    clock: &dyn Clock,
) -> String {
    let mut out = String::new();
    let approvals = snapshot.value().map_or(&[][..], Vec::as_slice);

    let _ = write!(
        out,
        "Pending approval: {} ({})",
        plural(approvals.len(), "request"),
        freshness(snapshot, clock)
    );
    if approvals.is_empty() && snapshot.value.is_some() {
        out.push_str("\n  Nothing is waiting for a decision.");
    }
    for approval in approvals {
        let _ = write!(
            out,
            "\n{}{}  [{}] {} - {}\n    {}  (expires {})",
            busy_marker(busy, &approval.id),
            approval.id,
            approval.priority,
            approval.action,
            approval.subject,
            approval.reason,
            approval.expires
        );
    }
    out
}

pub fn render_dashboard(snapshot: &Snapshot<DashboardMetrics>, clock: &dyn Clock) -> String {
    let mut out = format!("Dashboard ({})", freshness(snapshot, clock));
    let Some(metrics) = snapshot.value() else {
        return out;
    };

    let _ = write!(
        out,
        "\n  needs action      {}\n  pending approval  {}\n  done today        {}\n  active plans      {}\n  revenue (MTD)     {} of {}\n  agent             {}",
        metrics.needs_action,
        metrics.pending_approval,
        metrics.done_today,
        metrics.active_plans,
        metrics.mtd_revenue,
        metrics.monthly_target,
        metrics.agent_health
    );
    if !metrics.alerts.is_empty() {
        out.push_str("\nAlerts");
        for alert in &metrics.alerts {
            let _ = write!(out, "\n  ! {alert}");
        }
    }
    if !metrics.recent_activity.is_empty() {
        out.push_str("\nRecent activity");
        for entry in &metrics.recent_activity {
            let _ = write!(out, "\n  - {entry}");
        }
    }
    out
}

pub fn render_vault(snapshot: &Snapshot<VaultStatus>, busy: &BusySet, clock: &dyn Clock) -> String {
    let mut out = format!("Vault ({})", freshness(snapshot, clock));
    let Some(vault) = snapshot.value() else {
        return out;
    };

    if !busy.is_idle() {
        out.push_str("\n  initializing...");
    } else if !vault.initialized {
        out.push_str("\n  Not initialized. Run 'init <owner> | <business>' to create it.");
        return out;
    }

    if !vault.folders.is_empty() {
        out.push_str("\nFolders");
        for folder in &vault.folders {
            let _ = write!(out, "\n  {:<20} {}", folder.name, folder.count);
        }
    }
    if !vault.core_files.is_empty() {
        out.push_str("\nCore files");
        for file in &vault.core_files {
            let mark = if file.exists { "x" } else { " " };
            let _ = write!(out, "\n  [{mark}] {}", file.name);
        }
    }
    out
}

pub fn render_handbook(state: &HandbookState, saving: bool, validating: bool) -> String {
    let status = match (state.dirty, saving) {
        (_, true) => "saving...",
        (true, false) => "unsaved changes",
        (false, false) => "saved",
    };
    let mut out = format!("Company handbook ({status})");

    match &state.server {
        None => out.push_str("\n  Not loaded from the agent yet."),
        Some(server) => {
            let missing = server.missing_sections().count();
            if validating {
                out.push_str("\n  validating...");
            } else if server.is_complete {
                out.push_str("\n  All required sections present.");
            } else {
                let _ = write!(out, "\n  {} missing.", plural(missing, "required section"));
            }
            for section in &server.validation {
                let mark = if section.present { "x" } else { " " };
                let _ = write!(out, "\n  [{mark}] {} - {}", section.section, section.description);
            }
        }
    }

    out.push_str("\n---");
    for line in state.draft.lines() {
        let _ = write!(out, "\n{line}");
    }
    out
}

pub fn render_health(report: &HealthReport) -> String {
    let overall = if report.is_healthy { "healthy" } else { "degraded" };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = (report.score * 100.0).round() as u32;
    let mut out = format!("Console {overall} ({percent}% of components)");
    for component in &report.components {
        let _ = match &component.message {
            None => write!(out, "\n  ok    {}", component.name),
            Some(message) if component.is_healthy => {
                write!(out, "\n  ok    {}: {message}", component.name)
            }
            Some(message) => write!(out, "\n  FAIL  {}: {message}", component.name),
        };
    }
    out
}
