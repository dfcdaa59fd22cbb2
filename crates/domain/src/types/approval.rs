//! Pending approvals

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::work_item::Priority;

/// A proposed action awaiting operator sign-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub id: String,
    pub filename: String,
    pub action: String,
    pub source_file: String,
    pub created: String,
    pub expires: String,
    pub status: String,
    pub priority: String,
    pub subject: String,
    pub reason: String,
}

impl Approval {
    pub fn priority_level(&self) -> Option<Priority> {
        Priority::from_str(&self.priority).ok()
    }
}
