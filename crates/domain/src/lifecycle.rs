//! Lifecycle vocabulary for work items, approvals, the vault and the handbook.
//!
//! There is no client-side state machine object: membership in the latest
//! fetched collection is the state. What lives here is the closed set of
//! transitions an operator may request and the acknowledgements they yield.

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;
use crate::types::{
    HandbookData, ProcessResult, SimulateBatchResponse, SimulateEmailRequest,
    SimulateEmailResponse,
};

/// Kind of a requested transition, without its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Process,
    ProcessAll,
    Approve,
    Reject,
    InitVault,
    RefreshDashboard,
    SimulateEmail,
    SimulateBatch,
    SaveHandbook,
    ValidateHandbook,
}

impl_domain_status_conversions!(TransitionKind {
    Process => "process",
    ProcessAll => "process_all",
    Approve => "approve",
    Reject => "reject",
    InitVault => "init_vault",
    RefreshDashboard => "refresh_dashboard",
    SimulateEmail => "simulate_email",
    SimulateBatch => "simulate_batch",
    SaveHandbook => "save_handbook",
    ValidateHandbook => "validate_handbook",
});

/// A state-changing request an operator can make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// `needs_action` → removed from the needs-action collection.
    ProcessItem { filename: String },
    /// Every item currently in needs-action; locks the whole collection.
    ProcessAll,
    /// `pending` → removed from approvals.
    Approve { id: String },
    /// `pending` → removed from approvals.
    Reject { id: String },
    /// `uninitialized` → `initialized`; there is no way back.
    InitVault { owner: String, business: String },
    RefreshDashboard,
    SimulateEmail(SimulateEmailRequest),
    SimulateBatch { count: u32 },
    /// `dirty` → `clean`.
    SaveHandbook,
    /// Read-only: refreshes validation without touching the draft.
    ValidateHandbook,
}

impl Transition {
    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::ProcessItem { .. } => TransitionKind::Process,
            Self::ProcessAll => TransitionKind::ProcessAll,
            Self::Approve { .. } => TransitionKind::Approve,
            Self::Reject { .. } => TransitionKind::Reject,
            Self::InitVault { .. } => TransitionKind::InitVault,
            Self::RefreshDashboard => TransitionKind::RefreshDashboard,
            Self::SimulateEmail(_) => TransitionKind::SimulateEmail,
            Self::SimulateBatch { .. } => TransitionKind::SimulateBatch,
            Self::SaveHandbook => TransitionKind::SaveHandbook,
            Self::ValidateHandbook => TransitionKind::ValidateHandbook,
        }
    }

    /// Identifier of the single entity this transition targets, if any.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Self::ProcessItem { filename } => Some(filename),
            Self::Approve { id } | Self::Reject { id } => Some(id),
            _ => None,
        }
    }
}

/// Typed acknowledgement of a completed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ack {
    /// The agent's routing decision for a processed item.
    Processed { action: String },
    ProcessedAll(ProcessResult),
    Message(String),
    Simulated(SimulateEmailResponse),
    SimulatedBatch(SimulateBatchResponse),
    Validated(HandbookData),
}

impl Ack {
    /// One-line summary for the operator.
    pub fn summary(&self) -> String {
        match self {
            Self::Processed { action } => format!("processed: {action}"),
            Self::ProcessedAll(result) => {
                format!("processed {} item(s): {}", result.processed, result.actions.join(", "))
            }
            Self::Message(message) => message.clone(),
            Self::Simulated(response) => format!("{} ({})", response.message, response.filename),
            Self::SimulatedBatch(response) => response.message.clone(),
            Self::Validated(data) => {
                let missing = data.missing_sections().count();
                if data.is_complete {
                    "handbook complete: all sections present".to_string()
                } else {
                    format!("handbook incomplete: {missing} section(s) missing")
                }
            }
        }
    }
}
