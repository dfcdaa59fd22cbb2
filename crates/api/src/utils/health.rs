//! Health summary for the console's view of the agent
//!
//! Each polled resource contributes one component; the backend component
//! comes from the dedicated health poller.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Overall health of the console session
///
/// # Example
/// ```
/// use chrono::Utc;
/// use console_lib::utils::health::{ComponentHealth, HealthReport};
///
/// let mut report = HealthReport::new(Utc::now());
/// report = report.add_component(ComponentHealth::healthy("backend"));
/// report = report.add_component(ComponentHealth::unhealthy("vault", "connection refused"));
/// report.calculate_score();
///
/// assert_eq!(report.score, 0.5);
/// assert!(!report.is_healthy);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub is_healthy: bool,

    /// Fraction of healthy components, from 0.0 to 1.0
    pub score: f64,

    pub components: Vec<ComponentHealth>,

    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    /// Healthy report with no components
    pub fn new(checked_at: DateTime<Utc>) -> Self {
        Self { is_healthy: true, score: 1.0, components: Vec::new(), checked_at }
    }

    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.components.push(component);
        self
    }

    /// Recompute `score` and `is_healthy`.
    ///
    /// The session counts as healthy only when every component is; a single
    /// failing poll means the operator is looking at stale data.
    pub fn calculate_score(&mut self) {
        if self.components.is_empty() {
            return;
        }

        let healthy = self.components.iter().filter(|c| c.is_healthy).count();
        #[allow(clippy::cast_precision_loss)]
        let score = healthy as f64 / self.components.len() as f64;
        self.score = score;
        self.is_healthy = healthy == self.components.len();
    }

    pub fn unhealthy_components(&self) -> impl Iterator<Item = &ComponentHealth> {
        self.components.iter().filter(|c| !c.is_healthy)
    }
}

/// Health of one polled resource
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub is_healthy: bool,
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}
