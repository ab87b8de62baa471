use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a submitted job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a fresh, never reused identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier received from a caller
    ///
    /// Returns `None` for anything that is not a UUID; such an id can
    /// never name a known job.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction recommended by a token evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

/// Result of evaluating a single token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub token: String,
    pub action: SignalAction,
    pub confidence: Decimal,
    pub reasoning: String,
}

impl Signal {
    /// A neutral signal with zero confidence
    pub fn hold(token: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            action: SignalAction::Hold,
            confidence: Decimal::ZERO,
            reasoning: reasoning.into(),
        }
    }
}

/// Lifecycle state of a job
///
/// # State Transitions
/// ```text
/// Running -> Completed
///        └--> Failed
/// ```
/// Both terminal states are final.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobState {
    Running,
    Completed { result: serde_json::Value },
    Failed { error: String },
}

impl JobState {
    pub fn phase(&self) -> JobPhase {
        match self {
            JobState::Running => JobPhase::Running,
            JobState::Completed { .. } => JobPhase::Completed,
            JobState::Failed { .. } => JobPhase::Failed,
        }
    }
}

/// Tag of a [`JobState`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPhase {
    Running,
    Completed,
    Failed,
}

impl JobPhase {
    pub fn is_terminal(&self) -> bool {
        *self != JobPhase::Running
    }
}

impl std::fmt::Display for JobPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobPhase::Running => write!(f, "running"),
            JobPhase::Completed => write!(f, "completed"),
            JobPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Status report for a single job, as handed to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub job_id: JobId,
    pub agent: String,
    pub submitted_at: DateTime<Utc>,
    pub status: JobPhase,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl JobStatus {
    pub fn new(job_id: JobId, agent: String, submitted_at: DateTime<Utc>, state: JobState) -> Self {
        let status = state.phase();
        let (result, error) = match state {
            JobState::Running => (None, None),
            JobState::Completed { result } => (Some(result), None),
            JobState::Failed { error } => (None, Some(error)),
        };

        Self {
            job_id,
            agent,
            submitted_at,
            status,
            result,
            error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_parse_rejects_garbage() {
        assert!(JobId::parse("bogus-id").is_none());

        let id = JobId::new();
        assert_eq!(JobId::parse(&id.to_string()), Some(id));
    }

    #[test]
    fn job_ids_are_unique() {
        assert_ne!(JobId::new(), JobId::new());
    }

    #[test]
    fn status_from_failed_state_carries_only_error() {
        let status = JobStatus::new(
            JobId::new(),
            "risk".to_string(),
            Utc::now(),
            JobState::Failed {
                error: "boom".to_string(),
            },
        );

        assert_eq!(status.status, JobPhase::Failed);
        assert_eq!(status.error.as_deref(), Some("boom"));
        assert!(status.result.is_none());
        assert!(status.is_terminal());
    }

    #[test]
    fn status_serializes_phase_lowercase() {
        let status = JobStatus::new(JobId::new(), "trading".to_string(), Utc::now(), JobState::Running);
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["status"], "running");
        assert_eq!(json["result"], serde_json::Value::Null);
        assert!(!status.is_terminal());
    }

    #[test]
    fn signal_serializes_action_lowercase() {
        let json = serde_json::to_value(Signal::hold("AAA", "flat")).unwrap();
        assert_eq!(json["action"], "hold");
        assert_eq!(json["token"], "AAA");
    }
}
