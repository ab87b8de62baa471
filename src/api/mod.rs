// HTTP adapter over the agent controller

pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::agents::AgentController;
use handlers::{agents, jobs};

/// Shared state handed to every handler
pub type AppState = Arc<AgentController>;

/// Build the control plane router
pub fn router(controller: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/agents", get(agents::list_agents))
        .route("/agents/:name/run", post(agents::run_agent))
        .route("/jobs", get(jobs::list_jobs))
        .route("/jobs/:id", get(jobs::get_job))
        .with_state(controller)
}
