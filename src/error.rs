//! Run-level errors.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that end a run without a timetable.
///
/// Per-subject problems are not errors at this level; they are reported
/// through [`crate::report::GenerationResult`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request failed validation; nothing was placed.
    #[error("request rejected with {} validation error(s): {}", .0.len(), render(.0))]
    Validation(Vec<ValidationError>),

    /// The host's sink failed to store the grid.
    #[error("failed to persist timetable of section {section_id}")]
    Persistence {
        section_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl EngineError {
    /// Validation errors, if the run was rejected.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Validation(errors) => errors,
            Self::Persistence { .. } => &[],
        }
    }
}

impl From<Vec<ValidationError>> for EngineError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

fn render(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
