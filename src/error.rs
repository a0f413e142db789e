//! 服务层错误分类

use crate::prompts::TemplateError;

/// 服务层统一错误
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// 调用方输入不合法
    #[error("invalid input: {0}")]
    Validation(String),

    /// 模型返回的内容不符合约定的JSON结构
    #[error("malformed model response for {operation}: {reason}")]
    MalformedResponse {
        operation: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    /// 模型或语音服务调用失败（已重试）
    #[error("provider call failed during {operation}")]
    Provider {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// 唯一性约束冲突
    #[error("{entity} `{key}` already exists")]
    Conflict { entity: &'static str, key: String },

    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },

    /// 存储层失败
    #[error("store failure: {0}")]
    Store(#[source] anyhow::Error),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn malformed(operation: &'static str, reason: impl Into<String>) -> Self {
        ServiceError::MalformedResponse {
            operation,
            reason: reason.into(),
        }
    }

    pub fn provider(operation: &'static str, source: anyhow::Error) -> Self {
        ServiceError::Provider { operation, source }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// 错误键，用于对外响应与日志关联
    pub fn key(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_error",
            ServiceError::MalformedResponse { .. } => "generation_failed",
            ServiceError::Template(_) => "missing_parameter",
            ServiceError::Provider { .. } => "provider_error",
            ServiceError::Conflict { .. } => "conflict",
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::Store(_) => "internal_error",
        }
    }

    /// 是否由调用方引起（4xx语义）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::MalformedResponse { .. }
                | ServiceError::Template(_)
                | ServiceError::Conflict { .. }
                | ServiceError::NotFound { .. }
        )
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
