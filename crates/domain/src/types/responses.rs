//! Request and acknowledgement bodies for backend operations

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Generic `{message}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessItemResponse {
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResult {
    pub processed: u32,
    pub actions: Vec<String>,
}

/// Body of `POST /api/simulate/email`.
///
/// `type` and `priority` are left out of the JSON when unset so the backend
/// applies its own defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateEmailRequest {
    pub sender: String,
    pub subject: String,
    pub body: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub email_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub priority: Option<String>,
}

impl SimulateEmailRequest {
    pub fn new(
        sender: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            subject: subject.into(),
            body: body.into(),
            email_type: None,
            priority: None,
        }
    }

    pub fn with_type(mut self, email_type: impl Into<String>) -> Self {
        self.email_type = Some(email_type.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateEmailResponse {
    pub message: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateBatchResponse {
    pub message: String,
    pub count: u32,
    pub files: Vec<String>,
}
