use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

use super::errors::{AgentError, AgentResult};
use super::registry::AgentRegistry;
use super::traits::Agent;

type InstanceCell = Arc<OnceCell<Arc<dyn Agent>>>;

/// Lazily built, long-lived agent instances keyed by agent name
///
/// The map lock is only held to fetch or insert a name's cell. The factory
/// runs inside that cell's `get_or_try_init`, so concurrent first use of one
/// name constructs exactly once while other names stay unblocked. A failed
/// construction leaves the cell empty and the next caller retries.
pub struct InstanceCache {
    registry: Arc<AgentRegistry>,
    cells: Mutex<HashMap<String, InstanceCell>>,
}

impl InstanceCache {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self {
            registry,
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached instance for `name`, constructing it on first use
    pub async fn get_or_create(&self, name: &str) -> AgentResult<Arc<dyn Agent>> {
        let descriptor = self.registry.get(name)?;
        let cell = self.cell(name);

        let instance = cell
            .get_or_try_init(|| async {
                tracing::info!(agent = %name, "Initializing agent instance");
                descriptor.construct().map_err(|e| AgentError::Construction {
                    agent: name.to_string(),
                    message: e.to_string(),
                })
            })
            .await?;

        Ok(Arc::clone(instance))
    }

    /// Whether an instance for `name` is currently cached
    pub fn is_warm(&self, name: &str) -> bool {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .is_some_and(|cell| cell.initialized())
    }

    fn cell(&self, name: &str) -> InstanceCell {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cells.entry(name.to_string()).or_default())
    }
}
