//! Job bookkeeping: execution handles, the shared job table, and status resolution

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use super::errors::{AgentError, AgentResult};
use super::types::{JobId, JobState, JobStatus};

/// Write-once outcome slot for a job's execution
///
/// The worker fills it exactly once; readers inspect it without blocking.
#[derive(Debug, Default)]
pub struct JobHandle {
    outcome: OnceLock<Result<serde_json::Value, String>>,
    finished: Notify,
}

impl JobHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the terminal outcome. Returns `false` if one was already set.
    pub fn complete(&self, outcome: AgentResult<serde_json::Value>) -> bool {
        let stored = self.outcome.set(outcome.map_err(|e| e.to_string())).is_ok();
        if stored {
            self.finished.notify_waiters();
        }
        stored
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// Resolve the current state without waiting
    pub fn state(&self) -> JobState {
        match self.outcome.get() {
            None => JobState::Running,
            Some(Ok(result)) => JobState::Completed {
                result: result.clone(),
            },
            Some(Err(error)) => JobState::Failed {
                error: error.clone(),
            },
        }
    }

    /// Wait until the job reaches a terminal state
    pub async fn wait(&self) -> JobState {
        loop {
            let notified = self.finished.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_finished() {
                return self.state();
            }
            notified.await;
        }
    }
}

/// One tracked invocation of an agent
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub id: JobId,
    pub agent: String,
    pub submitted_at: DateTime<Utc>,
    /// Insertion sequence, used to order jobs with equal timestamps
    pub sequence: u64,
    pub handle: Arc<JobHandle>,
}

impl JobRecord {
    /// Snapshot this job's status from its handle
    pub fn status(&self) -> JobStatus {
        JobStatus::new(
            self.id,
            self.agent.clone(),
            self.submitted_at,
            self.handle.state(),
        )
    }
}

#[derive(Debug, Default)]
struct TableInner {
    jobs: HashMap<JobId, JobRecord>,
    next_sequence: u64,
}

/// Shared map from job id to job record
///
/// Every mutation and iteration happens under one lock. Callers get cloned
/// records back and resolve handles after the lock is released.
#[derive(Debug, Default)]
pub struct JobTable {
    inner: Mutex<TableInner>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly scheduled job and return its record
    pub fn insert(
        &self,
        id: JobId,
        agent: &str,
        submitted_at: DateTime<Utc>,
        handle: Arc<JobHandle>,
    ) -> JobRecord {
        let mut inner = self.lock();
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;

        let record = JobRecord {
            id,
            agent: agent.to_string(),
            submitted_at,
            sequence,
            handle,
        };
        inner.jobs.insert(id, record.clone());
        record
    }

    pub fn get(&self, id: &JobId) -> AgentResult<JobRecord> {
        self.lock()
            .jobs
            .get(id)
            .cloned()
            .ok_or_else(|| AgentError::JobNotFound(id.to_string()))
    }

    /// All jobs, newest first; equal timestamps fall back to insertion order
    pub fn list_all(&self) -> Vec<JobRecord> {
        let mut records: Vec<JobRecord> = self.lock().jobs.values().cloned().collect();
        records.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then(b.sequence.cmp(&a.sequence))
        });
        records
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TableInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
