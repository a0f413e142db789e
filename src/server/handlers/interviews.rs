//! 访谈生命周期接口

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
};
use uuid::Uuid;

use crate::server::AppState;
use crate::server::types::{AppError, PublishInterviewResponse};
use crate::services::{interviews, synthesis};
use crate::types::analysis::AnalysisRecord;
use crate::types::interview::{Interview, NewInterview};

/// POST /api/interviews
pub async fn create_interview(
    State(state): State<AppState>,
    Json(request): Json<NewInterview>,
) -> Result<(StatusCode, ResponseJson<Interview>), AppError> {
    let interview = interviews::create_interview(&state, request)
        .await
        .map_err(|e| AppError::new("create_interview", e))?;
    Ok((StatusCode::CREATED, ResponseJson(interview)))
}

/// GET /api/interviews/{id}
pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<Interview>, AppError> {
    interviews::get_interview(&state, id)
        .await
        .map(ResponseJson)
        .map_err(|e| AppError::new("get_interview", e))
}

/// POST /api/interviews/{id}/publish
pub async fn publish_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<PublishInterviewResponse>, AppError> {
    interviews::publish_interview(&state, id)
        .await
        .map(ResponseJson)
        .map_err(|e| AppError::new("publish_interview", e))
}

/// POST /api/interviews/{id}/close
pub async fn close_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<Interview>, AppError> {
    interviews::close_interview(&state, id)
        .await
        .map(ResponseJson)
        .map_err(|e| AppError::new("close_interview", e))
}

/// GET /api/interviews/{id}/analyses
pub async fn list_analyses(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<Vec<AnalysisRecord>>, AppError> {
    interviews::list_analyses(&state, id)
        .await
        .map(ResponseJson)
        .map_err(|e| AppError::new("list_analyses", e))
}

/// POST /api/interviews/{id}/synthesize
pub async fn synthesize_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<Interview>, AppError> {
    synthesis::synthesize_interview(&state, id)
        .await
        .map(ResponseJson)
        .map_err(|e| AppError::new("synthesize_interview", e))
}
