use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::{AgentError, AgentResult};
use super::traits::Agent;

/// Zero-argument constructor for an agent instance
pub type AgentFactory = Arc<dyn Fn() -> AgentResult<Arc<dyn Agent>> + Send + Sync>;

/// Execution shape an agent kind declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// Invoke `run()` once and report a fixed completion message
    Run { completion_message: String },
    /// Invoke `evaluate(token)` for every resolved token
    EvaluateTokens,
}

/// Static metadata describing one agent kind
#[derive(Clone)]
pub struct AgentDescriptor {
    pub name: String,
    pub description: String,
    pub capability: Capability,
    factory: AgentFactory,
}

impl AgentDescriptor {
    /// Describe an agent driven through its plain run capability
    pub fn runner<F, A>(
        name: impl Into<String>,
        description: impl Into<String>,
        completion_message: impl Into<String>,
        factory: F,
    ) -> Self
    where
        F: Fn() -> AgentResult<A> + Send + Sync + 'static,
        A: Agent + 'static,
    {
        Self::with_capability(
            name,
            description,
            Capability::Run {
                completion_message: completion_message.into(),
            },
            factory,
        )
    }

    /// Describe a token-aware agent driven through per-token evaluation
    pub fn evaluator<F, A>(name: impl Into<String>, description: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> AgentResult<A> + Send + Sync + 'static,
        A: Agent + 'static,
    {
        Self::with_capability(name, description, Capability::EvaluateTokens, factory)
    }

    fn with_capability<F, A>(
        name: impl Into<String>,
        description: impl Into<String>,
        capability: Capability,
        factory: F,
    ) -> Self
    where
        F: Fn() -> AgentResult<A> + Send + Sync + 'static,
        A: Agent + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            capability,
            factory: Arc::new(move || factory().map(|agent| Arc::new(agent) as Arc<dyn Agent>)),
        }
    }

    pub fn supports_tokens(&self) -> bool {
        matches!(self.capability, Capability::EvaluateTokens)
    }

    /// Invoke the factory. Only the instance cache should call this.
    pub(crate) fn construct(&self) -> AgentResult<Arc<dyn Agent>> {
        (self.factory)()
    }
}

impl std::fmt::Debug for AgentDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

/// Public view of a registered agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub name: String,
    pub description: String,
    pub supports_tokens: bool,
    /// Whether an instance is currently cached
    pub warm: bool,
}

/// Immutable table of agent descriptors, in registration order
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    descriptors: Vec<AgentDescriptor>,
    index: HashMap<String, usize>,
}

impl AgentRegistry {
    /// Build a registry, rejecting duplicate or empty names
    pub fn new(descriptors: Vec<AgentDescriptor>) -> AgentResult<Self> {
        let mut index = HashMap::with_capacity(descriptors.len());

        for (position, descriptor) in descriptors.iter().enumerate() {
            if descriptor.name.trim().is_empty() {
                return Err(AgentError::ConfigError("Agent name cannot be empty".to_string()));
            }
            if index.insert(descriptor.name.clone(), position).is_some() {
                return Err(AgentError::ConfigError(format!(
                    "Agent '{}' registered more than once",
                    descriptor.name
                )));
            }
        }

        Ok(Self { descriptors, index })
    }

    pub fn get(&self, name: &str) -> AgentResult<&AgentDescriptor> {
        self.index
            .get(name)
            .map(|&position| &self.descriptors[position])
            .ok_or_else(|| AgentError::UnknownAgent(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;

    impl Agent for Idle {}

    fn idle(name: &str) -> AgentDescriptor {
        AgentDescriptor::runner(name, "does nothing", "Idle done", || Ok(Idle))
    }

    #[test]
    fn test_registry_preserves_registration_order() {
        let registry = AgentRegistry::new(vec![idle("b"), idle("a"), idle("c")]).unwrap();
        let names: Vec<_> = registry.iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_empty_registry_is_allowed() {
        let registry = AgentRegistry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert!(!AgentRegistry::new(vec![idle("a")]).unwrap().is_empty());
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let result = AgentRegistry::new(vec![idle("a"), idle("a")]);
        assert!(matches!(result, Err(AgentError::ConfigError(_))));
    }

    #[test]
    fn test_unknown_lookup_fails() {
        let registry = AgentRegistry::new(vec![idle("a")]).unwrap();

        assert!(registry.get("a").is_ok());
        assert!(matches!(
            registry.get("nonexistent"),
            Err(AgentError::UnknownAgent(name)) if name == "nonexistent"
        ));
    }

    #[test]
    fn test_supports_tokens_follows_capability() {
        let evaluator = AgentDescriptor::evaluator("strategy", "tokens", || Ok(Idle));

        assert!(evaluator.supports_tokens());
        assert!(!idle("a").supports_tokens());
    }
}
