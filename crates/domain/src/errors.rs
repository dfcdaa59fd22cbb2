//! Error types used throughout the console

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the console
///
/// `Clone` so that a failure can be stored on a polled snapshot and handed to
/// every observer of that snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConsoleError {
    /// The request could not complete at the transport level.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The backend answered with a non-success status.
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// A transition was requested against an identifier that is no longer in
    /// the latest snapshot.
    #[error("Stale target: {kind} '{id}' is no longer present")]
    StaleTarget { kind: String, id: String },

    /// A mutation for the same target is already in flight.
    #[error("Busy: a mutation for {target} is already in flight")]
    Busy { target: String },

    #[error("Invalid transition: {message}")]
    InvalidTransition { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A success response did not match the expected contract.
    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The subscription was deactivated while the caller was waiting.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ConsoleError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote { status, message: message.into() }
    }

    pub fn stale_target(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::StaleTarget { kind: kind.into(), id: id.into() }
    }

    pub fn busy(target: impl Into<String>) -> Self {
        Self::Busy { target: target.into() }
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition { message: message.into() }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Stable label suitable for log fields and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Remote { .. } => "remote",
            Self::StaleTarget { .. } => "stale_target",
            Self::Busy { .. } => "busy",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Decode { .. } => "decode",
            Self::Config { .. } => "config",
            Self::Cancelled => "cancelled",
            Self::Internal { .. } => "internal",
        }
    }

    /// Whether repeating the same request later may succeed.
    ///
    /// Nothing in the console retries automatically; this only informs what
    /// the operator is told.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Busy { .. } => true,
            Self::Remote { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Human-readable message for display.
    ///
    /// Backend failures are usually FastAPI bodies of the form
    /// `{"detail": "..."}`; the detail string is extracted when present and the
    /// raw body is used otherwise.
    pub fn detail(&self) -> String {
        match self {
            Self::Remote { message, .. } => serde_json::from_str::<serde_json::Value>(message)
                .ok()
                .and_then(|body| body.get("detail").and_then(|d| d.as_str()).map(str::to_owned))
                .unwrap_or_else(|| message.clone()),
            other => other.to_string(),
        }
    }
}

/// Result type alias for console operations
pub type ConsoleResult<T> = std::result::Result<T, ConsoleError>;
