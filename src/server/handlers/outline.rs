use axum::{
    extract::{Json, State},
    response::Json as ResponseJson,
};

use crate::server::AppState;
use crate::server::types::AppError;
use crate::services::outline::{self, GeneratedOutline, OutlineRequest};

/// POST /api/generate-outline
pub async fn generate_outline(
    State(state): State<AppState>,
    Json(request): Json<OutlineRequest>,
) -> Result<ResponseJson<GeneratedOutline>, AppError> {
    outline::generate_outline(&state, &request)
        .await
        .map(ResponseJson)
        .map_err(|e| AppError::new("generate_outline", e))
}
