//! 访谈官接口

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::Json as ResponseJson,
};

use crate::server::AppState;
use crate::server::types::{AppError, SyncInterviewersResponse};
use crate::services::interviewers;
use crate::types::interviewer::{Interviewer, NewInterviewer};

/// POST /api/interviewers - 幂等创建；同名已存在时返回已有记录
pub async fn create_interviewer(
    State(state): State<AppState>,
    Json(request): Json<NewInterviewer>,
) -> Result<(StatusCode, ResponseJson<Interviewer>), AppError> {
    let (interviewer, created) = interviewers::create_or_fetch_interviewer(&state, request)
        .await
        .map_err(|e| AppError::new("create_interviewer", e))?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, ResponseJson(interviewer)))
}

/// GET /api/interviewers
pub async fn list_interviewers(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<Interviewer>>, AppError> {
    interviewers::list_interviewers(&state)
        .await
        .map(ResponseJson)
        .map_err(|e| AppError::new("list_interviewers", e))
}

/// GET /api/sync-interviewers - 与语音服务的Agent列表对齐
pub async fn sync_interviewers(
    State(state): State<AppState>,
) -> Result<ResponseJson<SyncInterviewersResponse>, AppError> {
    let stats = interviewers::sync_interviewers(&state)
        .await
        .map_err(|e| AppError::new("sync_interviewers", e))?;
    Ok(ResponseJson(SyncInterviewersResponse {
        success: true,
        stats,
    }))
}
