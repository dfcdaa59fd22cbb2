//! Company handbook

use serde::{Deserialize, Serialize};

/// Presence check for one required handbook section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionValidation {
    pub section: String,
    pub description: String,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandbookData {
    pub content: String,
    pub validation: Vec<SectionValidation>,
    pub is_complete: bool,
}

impl HandbookData {
    /// Sections the backend reported as missing.
    pub fn missing_sections(&self) -> impl Iterator<Item = &SectionValidation> {
        self.validation.iter().filter(|section| !section.present)
    }
}
