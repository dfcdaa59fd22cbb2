//! Needs-action work items

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Priority assigned by the agent when it files a work item or approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Normal,
    Low,
}

impl_domain_status_conversions!(Priority {
    High => "high",
    Medium => "medium",
    Normal => "normal",
    Low => "low",
});

impl Priority {
    /// Sort rank used by the backend (high first, unknown last).
    pub fn rank(priority: &str) -> u8 {
        match Self::from_str(priority) {
            Ok(Self::High) => 0,
            Ok(Self::Medium) => 1,
            Ok(Self::Normal) => 2,
            Ok(Self::Low) => 3,
            Err(_) => u8::MAX,
        }
    }
}

/// An inbound unit of work waiting in the needs-action folder.
///
/// Priority stays a string on the wire so an unexpected value from the agent
/// never fails the whole list; use [`WorkItem::priority_level`] to interpret
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub filename: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub sender: String,
    pub subject: String,
    pub priority: String,
    pub received: String,
    pub status: String,
    #[serde(default)]
    pub snippet: String,
}

impl WorkItem {
    pub fn priority_level(&self) -> Option<Priority> {
        Priority::from_str(&self.priority).ok()
    }
}
