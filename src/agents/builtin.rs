//! Built-in agents registered by the server binary
//!
//! These satisfy the execution contract with lightweight placeholder cycles.
//! The trading, risk, copy-trading and sentiment logic lives outside this
//! crate; swapping a real implementation in only requires a new factory.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::errors::AgentResult;
use super::registry::{AgentDescriptor, AgentRegistry};
use super::traits::{Agent, EvaluateToken, RunCycle};
use super::types::{Signal, SignalAction};

/// Build the registry of the five built-in agents
pub fn default_registry() -> AgentResult<AgentRegistry> {
    AgentRegistry::new(vec![
        AgentDescriptor::runner(
            "trading",
            "LLM-driven discretionary trading pipeline.",
            "Trading cycle complete",
            || Ok(TradingAgent::new()),
        ),
        AgentDescriptor::runner(
            "risk",
            "Risk management guardrails and limit monitoring.",
            "Risk review complete",
            || Ok(RiskAgent::new()),
        ),
        AgentDescriptor::evaluator(
            "strategy",
            "Aggregates custom strategies and validates with LLMs.",
            || Ok(StrategyAgent::new()),
        ),
        AgentDescriptor::runner(
            "copybot",
            "Mirrors trades from curated on-chain wallets.",
            "CopyBot analysis cycle complete",
            || Ok(CopyBotAgent::new()),
        ),
        AgentDescriptor::runner(
            "sentiment",
            "Collects social data and scores market sentiment.",
            "Sentiment scan complete",
            || Ok(SentimentAgent::new()),
        ),
    ])
}

/// Discretionary trading pipeline
#[derive(Debug, Clone)]
pub struct TradingAgent {
    pub model: String,
    pub temperature: f32,
}

impl TradingAgent {
    pub fn new() -> Self {
        Self {
            model: "claude-3-5-sonnet-20241022".to_string(),
            temperature: 0.7,
        }
    }
}

impl Default for TradingAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RunCycle for TradingAgent {
    async fn run(&self) -> AgentResult<()> {
        tracing::info!(model = %self.model, "Running trading cycle");
        Ok(())
    }
}

impl Agent for TradingAgent {
    fn as_runner(&self) -> Option<&dyn RunCycle> {
        Some(self)
    }
}

/// Portfolio guardrails
#[derive(Debug, Clone)]
pub struct RiskAgent {
    /// Maximum tolerated loss per day, in percent of equity
    pub max_daily_loss_percent: Decimal,
}

impl RiskAgent {
    pub fn new() -> Self {
        Self {
            max_daily_loss_percent: Decimal::new(5, 0),
        }
    }
}

impl Default for RiskAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RunCycle for RiskAgent {
    async fn run(&self) -> AgentResult<()> {
        tracing::info!(max_daily_loss_percent = %self.max_daily_loss_percent, "Reviewing risk limits");
        Ok(())
    }
}

impl Agent for RiskAgent {
    fn as_runner(&self) -> Option<&dyn RunCycle> {
        Some(self)
    }
}

/// Strategy aggregator evaluated token by token
#[derive(Debug, Clone)]
pub struct StrategyAgent {
    pub min_confidence: Decimal,
}

impl StrategyAgent {
    pub fn new() -> Self {
        Self {
            min_confidence: Decimal::new(7, 1),
        }
    }
}

impl Default for StrategyAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EvaluateToken for StrategyAgent {
    async fn evaluate(&self, token: &str) -> AgentResult<Signal> {
        tracing::info!(%token, "Evaluating strategies");
        // No strategies are loaded, so nothing clears the confidence bar
        Ok(Signal {
            token: token.to_string(),
            action: SignalAction::Hold,
            confidence: Decimal::ZERO,
            reasoning: format!(
                "No strategy signal reached minimum confidence {}",
                self.min_confidence
            ),
        })
    }
}

impl Agent for StrategyAgent {
    fn as_evaluator(&self) -> Option<&dyn EvaluateToken> {
        Some(self)
    }
}

/// Copy-trading analysis over tracked wallets
#[derive(Debug, Clone, Default)]
pub struct CopyBotAgent {
    pub wallets: Vec<String>,
}

impl CopyBotAgent {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RunCycle for CopyBotAgent {
    async fn run(&self) -> AgentResult<()> {
        tracing::info!(wallets = self.wallets.len(), "Running copybot analysis cycle");
        Ok(())
    }
}

impl Agent for CopyBotAgent {
    fn as_runner(&self) -> Option<&dyn RunCycle> {
        Some(self)
    }
}

/// Social sentiment scanner
#[derive(Debug, Clone)]
pub struct SentimentAgent {
    pub sources: Vec<String>,
}

impl SentimentAgent {
    pub fn new() -> Self {
        Self {
            sources: vec!["twitter".to_string()],
        }
    }
}

impl Default for SentimentAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RunCycle for SentimentAgent {
    async fn run(&self) -> AgentResult<()> {
        tracing::info!(sources = ?self.sources, "Scanning sentiment");
        Ok(())
    }
}

impl Agent for SentimentAgent {
    fn as_runner(&self) -> Option<&dyn RunCycle> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_contents() {
        let registry = default_registry().unwrap();
        let names: Vec<_> = registry.iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names, vec!["trading", "risk", "strategy", "copybot", "sentiment"]);
        assert!(registry.get("strategy").unwrap().supports_tokens());
        assert!(!registry.get("sentiment").unwrap().supports_tokens());
    }

    #[test]
    fn test_each_agent_exposes_declared_capability() {
        let registry = default_registry().unwrap();

        for descriptor in registry.iter() {
            let agent = descriptor.construct().unwrap();
            if descriptor.supports_tokens() {
                assert!(agent.as_evaluator().is_some(), "{} cannot evaluate", descriptor.name);
            } else {
                assert!(agent.as_runner().is_some(), "{} cannot run", descriptor.name);
            }
        }
    }

    #[tokio::test]
    async fn test_strategy_holds_without_strategies() {
        let signal = StrategyAgent::new().evaluate("BONK").await.unwrap();

        assert_eq!(signal.token, "BONK");
        assert_eq!(signal.action, SignalAction::Hold);
        assert_eq!(signal.confidence, Decimal::ZERO);
    }
}
