//! Dashboard aggregate

use serde::{Deserialize, Serialize};

fn default_agent_health() -> String {
    "Online".to_string()
}

/// Point-in-time aggregate of vault state.
///
/// Always replaced as a whole when a new snapshot arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub needs_action: u32,
    pub pending_approval: u32,
    pub done_today: u32,
    pub active_plans: u32,
    pub mtd_revenue: String,
    pub monthly_target: String,
    pub alerts: Vec<String>,
    pub recent_activity: Vec<String>,
    #[serde(default = "default_agent_health")]
    pub agent_health: String,
}
