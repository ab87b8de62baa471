// Agent control plane core
//
// Registry of agent kinds, lazily built instances, a bounded worker pool,
// and the job table that tracks every submitted run.

pub mod builtin;
pub mod cache;
pub mod controller;
pub mod dispatch;
pub mod errors;
pub mod jobs;
pub mod pool;
pub mod registry;
pub mod traits;
pub mod types;

// Re-export main types
pub use controller::AgentController;
pub use errors::{AgentError, AgentResult};
pub use registry::{AgentDescriptor, AgentRegistry, AgentSummary, Capability};
pub use traits::{Agent, EvaluateToken, MonitoredTokens, RunCycle};
pub use types::{JobId, JobPhase, JobState, JobStatus, Signal, SignalAction};
