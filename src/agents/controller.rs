use std::sync::Arc;

use chrono::Utc;

use super::builtin::default_registry;
use super::cache::InstanceCache;
use super::dispatch::Dispatcher;
use super::errors::AgentResult;
use super::jobs::{JobHandle, JobTable};
use super::pool::{QueuedJob, WorkerPool};
use super::registry::{AgentRegistry, AgentSummary};
use super::traits::MonitoredTokens;
use super::types::{JobId, JobStatus};
use crate::config::ControllerConfig;

/// Runs registered agents in the background and tracks each run as a job
///
/// Each controller owns its registry, instance cache, worker pool and job
/// table, so independent controllers never share state.
pub struct AgentController {
    registry: Arc<AgentRegistry>,
    cache: Arc<InstanceCache>,
    dispatcher: Arc<Dispatcher>,
    pool: WorkerPool,
    jobs: JobTable,
}

impl AgentController {
    /// Create a controller over `registry`. Must be called inside a tokio runtime.
    pub fn new(
        registry: AgentRegistry,
        config: ControllerConfig,
        monitored: Arc<dyn MonitoredTokens>,
    ) -> Self {
        let registry = Arc::new(registry);
        let cache = Arc::new(InstanceCache::new(Arc::clone(&registry)));
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&registry),
            Arc::clone(&cache),
            monitored,
        ));

        if registry.is_empty() {
            tracing::warn!("Agent controller created with an empty registry");
        }
        tracing::info!(
            agents = registry.len(),
            max_workers = config.max_workers,
            max_pending_jobs = config.max_pending_jobs,
            "Agent controller ready"
        );

        Self {
            registry,
            cache,
            dispatcher,
            pool: WorkerPool::new(config.max_workers, config.max_pending_jobs),
            jobs: JobTable::new(),
        }
    }

    /// Create a controller over the built-in agents
    pub fn with_default_agents(
        config: ControllerConfig,
        monitored: Arc<dyn MonitoredTokens>,
    ) -> AgentResult<Self> {
        Ok(Self::new(default_registry()?, config, monitored))
    }

    /// Metadata for every registered agent, in registration order
    pub fn list_agents(&self) -> Vec<AgentSummary> {
        self.registry
            .iter()
            .map(|descriptor| AgentSummary {
                name: descriptor.name.clone(),
                description: descriptor.description.clone(),
                supports_tokens: descriptor.supports_tokens(),
                warm: self.cache.is_warm(&descriptor.name),
            })
            .collect()
    }

    /// Schedule a run of agent `name` and return its job id immediately
    ///
    /// Unknown agents and a full queue are rejected before any job record
    /// exists. The record is in the table before the id is returned.
    pub fn submit_run(&self, name: &str, tokens: Option<Vec<String>>) -> AgentResult<JobId> {
        let descriptor = self.registry.get(name)?;

        let id = JobId::new();
        let submitted_at = Utc::now();
        let handle = Arc::new(JobHandle::new());

        let dispatcher = Arc::clone(&self.dispatcher);
        let agent = descriptor.name.clone();
        let work = async move { dispatcher.execute(&agent, tokens).await };

        self.pool
            .submit(QueuedJob::new(id, name, Arc::clone(&handle), work))?;
        self.jobs.insert(id, name, submitted_at, handle);

        tracing::info!(
            job_id = %id,
            agent = %name,
            tracked_jobs = self.jobs.len(),
            "Agent run submitted"
        );
        Ok(id)
    }

    /// Current status of a job; never waits for it to finish
    pub fn job_status(&self, id: &JobId) -> AgentResult<JobStatus> {
        Ok(self.jobs.get(id)?.status())
    }

    /// Every job's status, newest submission first
    ///
    /// Records are copied under the table lock and resolved after it is
    /// released.
    pub fn list_jobs(&self) -> Vec<JobStatus> {
        self.jobs
            .list_all()
            .iter()
            .map(|record| record.status())
            .collect()
    }

    /// Wait for a job to reach a terminal state and return its status
    pub async fn wait_for(&self, id: &JobId) -> AgentResult<JobStatus> {
        let record = self.jobs.get(id)?;
        record.handle.wait().await;
        Ok(record.status())
    }

    pub fn pending_jobs(&self) -> usize {
        self.pool.pending()
    }
}
