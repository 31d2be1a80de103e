//! Generation request and its loaded inputs.

use serde::{Deserialize, Serialize};

use super::{SubjectRequirement, WorkingCalendar};

/// Which section/session to generate a timetable for.
///
/// Ids are opaque to the engine; the host guarantees they exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTimetableRequest {
    pub section_id: String,
    pub session_id: String,
    #[serde(default)]
    pub template_id: Option<String>,
}

impl GenerateTimetableRequest {
    pub fn new(section_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            session_id: session_id.into(),
            template_id: None,
        }
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }
}

/// Snapshot of academic configuration loaded before solving.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInput {
    pub calendar: WorkingCalendar,
    /// Requirements in the host's order.
    pub subjects: Vec<SubjectRequirement>,
}

impl GenerationInput {
    pub fn new(calendar: WorkingCalendar) -> Self {
        Self {
            calendar,
            subjects: Vec::new(),
        }
    }

    pub fn with_subject(mut self, subject: SubjectRequirement) -> Self {
        self.subjects.push(subject);
        self
    }
}
