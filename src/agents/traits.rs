//! Execution contract between the controller and agent implementations
//!
//! An agent exposes its capabilities through the `as_*` accessors. The
//! dispatcher only calls a capability that the agent's descriptor declares,
//! so an implementation never has to guess which entry point will be used.

use async_trait::async_trait;

use super::errors::AgentResult;
use super::types::Signal;

/// A long-lived agent instance produced by a registry factory
pub trait Agent: Send + Sync {
    /// Plain run capability, if this agent supports it
    fn as_runner(&self) -> Option<&dyn RunCycle> {
        None
    }

    /// Per-token evaluation capability, if this agent supports it
    fn as_evaluator(&self) -> Option<&dyn EvaluateToken> {
        None
    }
}

/// Executes one full cycle of an agent's work
#[async_trait]
pub trait RunCycle: Send + Sync {
    async fn run(&self) -> AgentResult<()>;
}

/// Evaluates a single token symbol
#[async_trait]
pub trait EvaluateToken: Send + Sync {
    async fn evaluate(&self, token: &str) -> AgentResult<Signal>;
}

/// Source of the process-wide monitored token list
///
/// Read at execution time, so implementations may change their answer
/// between calls.
pub trait MonitoredTokens: Send + Sync {
    fn monitored_tokens(&self) -> Vec<String>;
}

impl MonitoredTokens for Vec<String> {
    fn monitored_tokens(&self) -> Vec<String> {
        self.clone()
    }
}
