use axum::{
    extract::{Path, State},
    Json,
};

use crate::agents::{AgentError, JobId, JobStatus};
use crate::api::errors::ApiError;
use crate::api::AppState;

/// List all jobs, newest first
///
/// GET /jobs
pub async fn list_jobs(State(controller): State<AppState>) -> Json<Vec<JobStatus>> {
    Json(controller.list_jobs())
}

/// Get the status of a job by ID
///
/// GET /jobs/:id
pub async fn get_job(
    State(controller): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobStatus>, ApiError> {
    let job_id = JobId::parse(&id).ok_or_else(|| AgentError::JobNotFound(id.clone()))?;
    let status = controller.job_status(&job_id)?;

    Ok(Json(status))
}
