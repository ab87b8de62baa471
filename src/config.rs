//! Configuration parsing from environment variables

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::agents::errors::{AgentError, AgentResult};
use crate::agents::traits::MonitoredTokens;

pub const MONITORED_TOKENS_VAR: &str = "MONITORED_TOKENS";

/// Worker pool sizing for the agent controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub max_workers: usize,
    /// Jobs allowed to wait for a worker before submissions are refused
    pub max_pending_jobs: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            max_pending_jobs: 64,
        }
    }
}

impl ControllerConfig {
    pub fn from_env() -> AgentResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            max_workers: positive_var("AGENT_MAX_WORKERS", defaults.max_workers)?,
            max_pending_jobs: positive_var("AGENT_MAX_PENDING_JOBS", defaults.max_pending_jobs)?,
        })
    }
}

/// Full server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub controller: ControllerConfig,
    pub bind_address: SocketAddr,
}

impl Config {
    pub fn from_env() -> AgentResult<Self> {
        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = SocketAddr::from_str(&bind_address)
            .map_err(|e| AgentError::ConfigError(format!("Invalid BIND_ADDRESS '{}': {}", bind_address, e)))?;

        Ok(Self {
            controller: ControllerConfig::from_env()?,
            bind_address,
        })
    }
}

/// Monitored tokens read from `MONITORED_TOKENS` on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvMonitoredTokens;

impl MonitoredTokens for EnvMonitoredTokens {
    fn monitored_tokens(&self) -> Vec<String> {
        env::var(MONITORED_TOKENS_VAR)
            .map(|raw| parse_token_list(&raw))
            .unwrap_or_default()
    }
}

/// Split a comma-separated token list, dropping blanks
pub fn parse_token_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn positive_var(name: &str, default: usize) -> AgentResult<usize> {
    let value = match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|e| AgentError::ConfigError(format!("Invalid {} '{}': {}", name, raw, e)))?,
        Err(_) => default,
    };

    if value == 0 {
        return Err(AgentError::ConfigError(format!("{} must be at least 1", name)));
    }
    Ok(value)
}
