use axum::{
    extract::{Json, State},
    response::Json as ResponseJson,
};

use crate::error::ServiceError;
use crate::server::AppState;
use crate::server::types::{AnalyzeCommunicationRequest, AnalyzeCommunicationResponse, AppError};
use crate::services::analysis;

/// POST /api/analyze-communication
pub async fn analyze_communication(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeCommunicationRequest>,
) -> Result<ResponseJson<AnalyzeCommunicationResponse>, AppError> {
    let fail = |e| AppError::new("analyze_communication", e);

    let response = match request.interview_id {
        Some(interview_id) => {
            let call_id = request.call_id.as_deref().ok_or_else(|| {
                fail(ServiceError::validation(
                    "callId is required when interviewId is given",
                ))
            })?;
            let record = analysis::analyze_and_store(
                &state,
                interview_id,
                call_id,
                &request.transcript,
                request.objective.as_deref(),
            )
            .await
            .map_err(fail)?;
            AnalyzeCommunicationResponse {
                analysis: record.analysis,
                record_id: Some(record.id),
            }
        }
        None => {
            let objective = request.objective.as_deref().unwrap_or_default();
            let result = analysis::analyze_communication(&state, &request.transcript, objective)
                .await
                .map_err(fail)?;
            AnalyzeCommunicationResponse {
                analysis: result,
                record_id: None,
            }
        }
    };
    Ok(ResponseJson(response))
}
