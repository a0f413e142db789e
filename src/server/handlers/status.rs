//! 状态检查

use axum::response::Json;

use crate::server::types::StatusResponse;

/// GET /status - 健康检查
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
