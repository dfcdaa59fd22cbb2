//! Wire types exchanged with the agent backend
//!
//! Field names follow the backend's JSON contract exactly; the console never
//! invents fields and never merges two payloads into one value.

pub mod approval;
pub mod dashboard;
pub mod handbook;
pub mod responses;
pub mod vault;
pub mod work_item;

pub use approval::Approval;
pub use dashboard::DashboardMetrics;
pub use handbook::{HandbookData, SectionValidation};
pub use responses::{
    HealthStatus, MessageResponse, ProcessItemResponse, ProcessResult, SimulateBatchResponse,
    SimulateEmailRequest, SimulateEmailResponse,
};
pub use vault::{CoreFileStatus, FolderStatus, VaultStatus};
pub use work_item::{Priority, WorkItem};
