// src/handlers/blog.rs
//! Blog generation endpoints

use crate::error::BlogError;
use crate::models::blog::{ErrorResponse, GenerateBlogRequest, GenerateBlogResponse, StatusResponse};
use crate::workflow::{BlogOutcome, NodeName, WorkflowState};
use crate::AppState;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

const GENERIC_FAILURE: &str = "Blog generation failed. Please try again later.";

pub fn blog_routes() -> Router {
    Router::new()
        .route("/api/blog", post(generate_blog))
        .route("/api/status", get(api_status))
}

/// POST /api/blog - Turn one video into a blog post
pub async fn generate_blog(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<GenerateBlogRequest>,
) -> impl IntoResponse {
    let video_url = request.video_url.trim();
    if video_url.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Please enter a valid YouTube link.")),
        )
            .into_response();
    }

    let final_state = match state.executor.run(WorkflowState::new(video_url)).await {
        Ok(final_state) => final_state,
        Err(e) => {
            tracing::error!(video_url = %video_url, "Blog generation failed: {}", e);
            let status = match e {
                BlogError::ModelInvocation(_) | BlogError::ScoringParse(_) | BlogError::NodeTimeout { .. } => {
                    StatusCode::BAD_GATEWAY
                }
                BlogError::Configuration(_) | BlogError::Workflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            return (status, Json(ErrorResponse::new(GENERIC_FAILURE))).into_response();
        }
    };

    match final_state.outcome() {
        Some(BlogOutcome::Published { title, body }) => {
            let response = GenerateBlogResponse {
                run_id: final_state.run_id.clone(),
                title,
                body,
                revised: final_state.visited(NodeName::Reviewer),
                path: final_state.path.clone(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Some(BlogOutcome::TranscriptFailed { error }) => {
            tracing::warn!(run_id = %final_state.run_id, "Transcript unavailable: {}", error);
            (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::new(error))).into_response()
        }
        None => {
            tracing::error!(run_id = %final_state.run_id, "Workflow finished without a title or transcript error");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(GENERIC_FAILURE))).into_response()
        }
    }
}

/// GET /api/status - Liveness and configured model
pub async fn api_status(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.model_name.clone(),
    })
}
