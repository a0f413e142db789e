//! REST API 请求与响应类型

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::services::interviews::PublishedInterview;
use crate::types::analysis::CommunicationAnalysis;
use crate::types::interviewer::SyncStats;

/// 对外暴露的错误信息
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ApiError {
    /// 错误键，供调用方分支处理
    pub key: String,
    /// 可读的错误描述
    pub message: String,
}

impl ApiError {
    pub fn new(key: &str, message: &str) -> Self {
        Self {
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}

/// 失败响应体
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub success: bool,
    pub errors: Vec<ApiError>,
}

/// 边界处的错误：附带发生的操作，用于日志关联
#[derive(Debug)]
pub struct AppError {
    pub operation: &'static str,
    pub error: ServiceError,
}

impl AppError {
    pub fn new(operation: &'static str, error: ServiceError) -> Self {
        Self { operation, error }
    }

    pub fn status_code(&self) -> StatusCode {
        match &self.error {
            ServiceError::Validation(_) | ServiceError::Template(_) => StatusCode::BAD_REQUEST,
            ServiceError::MalformedResponse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Provider { .. } => StatusCode::BAD_GATEWAY,
            ServiceError::Conflict { .. } => StatusCode::CONFLICT,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对外消息；上游与存储细节不外泄
    pub fn public_message(&self) -> String {
        match &self.error {
            ServiceError::Provider { .. } => {
                "An upstream provider is unavailable. Please try again later.".to_string()
            }
            ServiceError::MalformedResponse { .. } => {
                "Generation failed: the model returned an unexpected response. Please try again."
                    .to_string()
            }
            ServiceError::Store(_) => "An internal error occurred.".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let key = self.error.key();
        if status.is_server_error() {
            tracing::error!(
                operation = self.operation,
                key,
                status = status.as_u16(),
                error = ?self.error,
                "request failed"
            );
        } else {
            tracing::warn!(
                operation = self.operation,
                key,
                status = status.as_u16(),
                error = %self.error,
                "request rejected"
            );
        }

        let body = ErrorResponse {
            success: false,
            errors: vec![ApiError::new(key, &self.public_message())],
        };
        (status, Json(body)).into_response()
    }
}

/// 状态检查响应
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatusResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// 访谈官同步响应
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SyncInterviewersResponse {
    pub success: bool,
    pub stats: SyncStats,
}

/// 通话分析请求；提供 `interviewId` 时必须同时提供 `callId`，结果会被保存
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeCommunicationRequest {
    pub transcript: String,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub interview_id: Option<Uuid>,
    #[serde(default)]
    pub call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeCommunicationResponse {
    #[serde(flatten)]
    pub analysis: CommunicationAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<Uuid>,
}

pub type PublishInterviewResponse = PublishedInterview;
