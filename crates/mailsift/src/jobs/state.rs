use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type JobId = Uuid;

/// Lifecycle: `Created → Queued → Processing → Completed | Failed`.
///
/// Only terminal jobs may be removed or evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Created,
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether `next` may follow `self`.
    pub fn can_advance_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Queued)
                | (Self::Queued, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a status poll sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: JobId,
    pub state: JobState,
    pub documents: Vec<String>,
    pub current_page: usize,
    pub total_pages: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobStatus {
    pub(crate) fn new(id: JobId, documents: Vec<String>) -> Self {
        Self {
            id,
            state: JobState::Created,
            documents,
            current_page: 0,
            total_pages: 0,
            message: "Job created".to_string(),
            error: None,
        }
    }
}

/// Registry-wide counts. `pending` covers every non-terminal job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        assert!(JobState::Created.can_advance_to(JobState::Queued));
        assert!(JobState::Queued.can_advance_to(JobState::Processing));
        assert!(JobState::Processing.can_advance_to(JobState::Failed));
        assert!(!JobState::Created.can_advance_to(JobState::Processing));
        assert!(!JobState::Completed.can_advance_to(JobState::Processing));
        assert!(!JobState::Failed.can_advance_to(JobState::Completed));
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(!JobState::Processing.is_terminal());
        assert_eq!(serde_json::to_string(&JobState::Queued).unwrap(), "\"queued\"");
    }
}
