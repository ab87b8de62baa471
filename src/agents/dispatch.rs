use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::cache::InstanceCache;
use super::errors::{AgentError, AgentResult};
use super::registry::{AgentRegistry, Capability};
use super::traits::{EvaluateToken, MonitoredTokens};

/// Routes an agent name to the execution shape its descriptor declares
pub struct Dispatcher {
    registry: Arc<AgentRegistry>,
    cache: Arc<InstanceCache>,
    monitored: Arc<dyn MonitoredTokens>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<AgentRegistry>,
        cache: Arc<InstanceCache>,
        monitored: Arc<dyn MonitoredTokens>,
    ) -> Self {
        Self {
            registry,
            cache,
            monitored,
        }
    }

    /// Run agent `name` to completion and shape its result payload
    ///
    /// Executed inside a worker. Agent failures propagate as errors for the
    /// worker to record on the job.
    pub async fn execute(&self, name: &str, tokens: Option<Vec<String>>) -> AgentResult<Value> {
        let descriptor = self.registry.get(name)?;
        let agent = self.cache.get_or_create(name).await?;

        match &descriptor.capability {
            Capability::Run { completion_message } => {
                let runner = agent.as_runner().ok_or_else(|| dispatch_gap(name))?;
                runner.run().await?;
                Ok(json!({ "message": completion_message }))
            }
            Capability::EvaluateTokens => {
                let evaluator = agent.as_evaluator().ok_or_else(|| dispatch_gap(name))?;
                self.evaluate_tokens(evaluator, tokens).await
            }
        }
    }

    async fn evaluate_tokens(
        &self,
        evaluator: &dyn EvaluateToken,
        tokens: Option<Vec<String>>,
    ) -> AgentResult<Value> {
        let token_list = self.resolve_tokens(tokens);

        if token_list.is_empty() {
            return Ok(json!({
                "message": "No tokens provided and no monitored tokens configured.",
                "approved_signals": {},
            }));
        }

        let mut approved = Map::with_capacity(token_list.len());
        for token in &token_list {
            let signal = evaluator.evaluate(token).await?;
            approved.insert(token.clone(), serde_json::to_value(signal)?);
        }

        Ok(json!({
            "message": format!("Evaluated {} token(s).", token_list.len()),
            "approved_signals": approved,
        }))
    }

    /// Caller tokens win when any survive blank-filtering; otherwise the
    /// monitored list is read.
    fn resolve_tokens(&self, tokens: Option<Vec<String>>) -> Vec<String> {
        let requested = non_blank(tokens.unwrap_or_default());
        if !requested.is_empty() {
            return requested;
        }
        non_blank(self.monitored.monitored_tokens())
    }
}

fn non_blank(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .collect()
}

fn dispatch_gap(name: &str) -> AgentError {
    tracing::error!(
        agent = %name,
        "Registered agent lacks the capability its descriptor declares"
    );
    AgentError::DispatchGap(name.to_string())
}
