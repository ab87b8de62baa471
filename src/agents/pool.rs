use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, Mutex};

use super::errors::{AgentError, AgentResult};
use super::jobs::JobHandle;
use super::types::JobId;

type JobFuture = Pin<Box<dyn Future<Output = AgentResult<Value>> + Send + 'static>>;

/// A unit of work waiting in the pool's queue
pub struct QueuedJob {
    pub id: JobId,
    pub agent: String,
    pub handle: Arc<JobHandle>,
    work: JobFuture,
}

impl QueuedJob {
    pub fn new<F>(id: JobId, agent: impl Into<String>, handle: Arc<JobHandle>, work: F) -> Self
    where
        F: Future<Output = AgentResult<Value>> + Send + 'static,
    {
        Self {
            id,
            agent: agent.into(),
            handle,
            work: Box::pin(work),
        }
    }
}

/// Fixed set of workers draining a bounded FIFO queue
///
/// Submission never waits: a full queue is reported as
/// [`AgentError::QueueFull`]. Each job runs in its own task so a panic is
/// recorded on that job and the worker keeps going. Workers drain what is
/// already queued and exit once the pool is dropped.
pub struct WorkerPool {
    sender: mpsc::Sender<QueuedJob>,
    max_pending: usize,
    worker_count: usize,
}

impl WorkerPool {
    /// Spawn `worker_count` workers. Must be called inside a tokio runtime.
    pub fn new(worker_count: usize, max_pending: usize) -> Self {
        let worker_count = worker_count.max(1);
        let max_pending = max_pending.max(1);
        let (sender, receiver) = mpsc::channel(max_pending);
        let receiver = Arc::new(Mutex::new(receiver));

        for worker in 0..worker_count {
            tokio::spawn(work_loop(worker, Arc::clone(&receiver)));
        }

        Self {
            sender,
            max_pending,
            worker_count,
        }
    }

    /// Enqueue a job without waiting for it to start
    pub fn submit(&self, job: QueuedJob) -> AgentResult<()> {
        self.sender.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => AgentError::QueueFull(self.max_pending),
            mpsc::error::TrySendError::Closed(_) => AgentError::ShuttingDown,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Number of jobs waiting for a worker
    pub fn pending(&self) -> usize {
        self.max_pending - self.sender.capacity()
    }
}

async fn work_loop(worker: usize, receiver: Arc<Mutex<mpsc::Receiver<QueuedJob>>>) {
    tracing::debug!(worker, "Worker started");

    loop {
        let next = receiver.lock().await.recv().await;
        let Some(job) = next else { break };

        let outcome = match tokio::spawn(job.work).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => {
                let message = panic_message(e.into_panic());
                tracing::error!(job_id = %job.id, agent = %job.agent, %message, "Agent task panicked");
                Err(AgentError::Panicked(message))
            }
            Err(e) => Err(AgentError::Panicked(e.to_string())),
        };

        match &outcome {
            Ok(_) => tracing::info!(job_id = %job.id, agent = %job.agent, "Job completed"),
            Err(e) => tracing::warn!(job_id = %job.id, agent = %job.agent, error = %e, "Job failed"),
        }

        job.handle.complete(outcome);
    }

    tracing::debug!(worker, "Worker stopped");
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::types::JobState;
    use serde_json::json;
    use std::time::Duration;

    fn job<F>(work: F) -> (QueuedJob, Arc<JobHandle>)
    where
        F: Future<Output = AgentResult<Value>> + Send + 'static,
    {
        let handle = Arc::new(JobHandle::new());
        (QueuedJob::new(JobId::new(), "test", handle.clone(), work), handle)
    }

    #[tokio::test]
    async fn test_job_runs_and_completes_handle() {
        let pool = WorkerPool::new(2, 8);
        let (queued, handle) = job(async { Ok(json!({"message": "ok"})) });

        pool.submit(queued).unwrap();

        assert_eq!(
            handle.wait().await,
            JobState::Completed {
                result: json!({"message": "ok"})
            }
        );
        assert_eq!(pool.worker_count(), 2);
    }

    #[tokio::test]
    async fn test_panic_is_recorded_and_worker_survives() {
        let pool = WorkerPool::new(1, 8);
        let (panicking, failed) = job(async {
            if true {
                panic!("exploded");
            }
            Ok(json!({}))
        });
        let (healthy, completed) = job(async { Ok(json!({})) });

        pool.submit(panicking).unwrap();
        pool.submit(healthy).unwrap();

        match failed.wait().await {
            JobState::Failed { error } => assert!(error.contains("exploded")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(matches!(completed.wait().await, JobState::Completed { .. }));
    }

    #[tokio::test]
    async fn test_full_queue_rejects_submission() {
        let pool = WorkerPool::new(1, 1);
        let (gate_tx, gate_rx) = tokio::sync::oneshot::channel::<()>();

        let (blocker, blocker_handle) = job(async move {
            let _ = gate_rx.await;
            Ok(json!({}))
        });
        pool.submit(blocker).unwrap();

        // Wait until the worker has taken the blocker off the queue
        while pool.pending() > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let (queued, _) = job(async { Ok(json!({})) });
        pool.submit(queued).unwrap();

        let (rejected, _) = job(async { Ok(json!({})) });
        assert!(matches!(pool.submit(rejected), Err(AgentError::QueueFull(1))));

        gate_tx.send(()).unwrap();
        assert!(matches!(blocker_handle.wait().await, JobState::Completed { .. }));
    }
}
