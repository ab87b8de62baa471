use thiserror::Error;

/// Errors that can occur in the agent control plane
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Unknown agent '{0}'")]
    UnknownAgent(String),

    #[error("Job '{0}' not found")]
    JobNotFound(String),

    /// A registered agent has no execution routine matching its declared capability
    #[error("No execution handler for agent '{0}'")]
    DispatchGap(String),

    #[error("Job queue is full ({0} pending jobs)")]
    QueueFull(usize),

    #[error("Worker pool is shutting down")]
    ShuttingDown,

    /// Failure raised by the agent itself; displays the bare message
    #[error("{0}")]
    Execution(String),

    #[error("Failed to initialize agent '{agent}': {message}")]
    Construction { agent: String, message: String },

    #[error("Agent task panicked: {0}")]
    Panicked(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AgentError {
    /// Shorthand for an agent-internal failure carrying `message`
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
