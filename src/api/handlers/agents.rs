use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::agents::{AgentSummary, JobId};
use crate::api::errors::ApiError;
use crate::api::AppState;

/// Request body for triggering an agent run
#[derive(Debug, Default, Deserialize)]
pub struct RunAgentRequest {
    pub tokens: Option<Vec<String>>,
}

/// Response from a successful submission
#[derive(Debug, Serialize)]
pub struct RunAgentResponse {
    pub job_id: JobId,
    pub status: String,
}

/// List metadata for every registered agent
///
/// GET /agents
pub async fn list_agents(State(controller): State<AppState>) -> Json<Vec<AgentSummary>> {
    Json(controller.list_agents())
}

/// Trigger an agent run in the background
///
/// POST /agents/:name/run
pub async fn run_agent(
    State(controller): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<RunAgentResponse>), ApiError> {
    let req = parse_run_request(&headers, &body)?;

    // Blank entries must not shadow the monitored token list
    let tokens = req.tokens.map(|tokens| {
        tokens
            .iter()
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>()
    });

    let job_id = controller.submit_run(&name, tokens)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(RunAgentResponse {
            job_id,
            status: "submitted".to_string(),
        }),
    ))
}

/// Decode the optional run body
///
/// Only an empty body means "no request"; anything else must be valid JSON
/// sent as `application/json`.
fn parse_run_request(headers: &HeaderMap, body: &Bytes) -> Result<RunAgentRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RunAgentRequest::default());
    }

    if !has_json_content_type(headers) {
        return Err(ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected request with `Content-Type: application/json`",
        ));
    }

    let Json(req) = Json::<RunAgentRequest>::from_bytes(body)?;
    Ok(req)
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json")
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}
