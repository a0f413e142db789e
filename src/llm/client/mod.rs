//! LLM客户端 - 提供统一的LLM服务接口

use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::{config::LLMConfig, llm::client::utils::evaluate_befitting_model};

mod providers;
pub mod scripted;
pub mod utils;

pub use providers::ProviderBackend;
pub use scripted::ScriptedBackend;

/// 可由模型结构化输出的类型
pub trait StructuredOutput: JsonSchema + DeserializeOwned + Serialize + Send + Sync + 'static {}

impl<T> StructuredOutput for T where T: JsonSchema + DeserializeOwned + Serialize + Send + Sync + 'static {}

/// 结构化提取失败的原因
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// 模型服务调用失败或超时，可重试
    #[error("model call failed: {0}")]
    Provider(#[source] anyhow::Error),

    /// 模型输出不符合目标结构，不重试
    #[error("model output does not match the expected structure: {0}")]
    Malformed(String),
}

type ProviderExtractFn = for<'a> fn(
    &'a ProviderBackend,
    &'a str,
    &'a str,
    &'a str,
) -> BoxFuture<'a, Result<Value, ExtractError>>;

/// 类型擦除后的提取目标，使后端可以作为trait object使用
#[derive(Clone, Copy)]
pub struct ExtractTarget {
    type_name: &'static str,
    via_provider: ProviderExtractFn,
}

impl ExtractTarget {
    pub fn of<T: StructuredOutput>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            via_provider: providers::extract_as::<T>,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// 模型后端：按目标结构执行一次提取，结果以JSON值返回
#[async_trait::async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn extract(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        target: ExtractTarget,
    ) -> Result<Value, ExtractError>;
}

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    backend: Arc<dyn CompletionBackend>,
}

impl LLMClient {
    /// 根据配置创建连接真实Provider的客户端
    pub fn new(config: LLMConfig) -> anyhow::Result<Self> {
        let backend = ProviderBackend::new(&config)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// 使用显式注入的后端创建客户端
    pub fn with_backend(config: LLMConfig, backend: Arc<dyn CompletionBackend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &LLMConfig {
        &self.config
    }

    /// 通用重试逻辑：每次尝试受超时约束，仅对服务调用失败按固定间隔重试
    async fn retry_with_backoff<T, F, Fut>(&self, model: &str, operation: F) -> Result<T, ExtractError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ExtractError>>,
    {
        let max_retries = self.config.retry_attempts.max(1);
        let retry_delay = Duration::from_millis(self.config.retry_delay_ms);
        let timeout = Duration::from_secs(self.config.timeout_seconds.max(1));
        let mut retries = 0;

        loop {
            let err = match tokio::time::timeout(timeout, operation()).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(ExtractError::Malformed(reason))) => {
                    return Err(ExtractError::Malformed(reason));
                }
                Ok(Err(ExtractError::Provider(err))) => err,
                Err(_) => anyhow::anyhow!("model call timed out after {}s", timeout.as_secs()),
            };

            retries += 1;
            tracing::warn!(
                model,
                attempt = retries,
                max_attempts = max_retries,
                error = %err,
                "LLM call failed"
            );
            if retries >= max_retries {
                return Err(ExtractError::Provider(err));
            }
            tokio::time::sleep(retry_delay).await;
        }
    }

    async fn extract_value(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        target: ExtractTarget,
    ) -> Result<Value, ExtractError> {
        self.retry_with_backoff(model, || {
            self.backend
                .extract(model, system_prompt, user_prompt, target)
        })
        .await
    }

    /// 结构化提取：失败时自动重试，并在高能效模型耗尽重试后切换备选模型
    pub async fn extract<T: StructuredOutput>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<T, ExtractError> {
        let target = ExtractTarget::of::<T>();
        let (befitting_model, fallover_model) =
            evaluate_befitting_model(&self.config, system_prompt, user_prompt);

        let first = self
            .extract_value(&befitting_model, system_prompt, user_prompt, target)
            .await;

        let value = match (first, fallover_model) {
            (Ok(value), _) => value,
            (Err(ExtractError::Provider(e)), Some(model)) if model != befitting_model => {
                tracing::warn!(
                    failed_model = %befitting_model,
                    fallover_model = %model,
                    error = %e,
                    "retries exhausted, switching to fallover model"
                );
                self.extract_value(&model, system_prompt, user_prompt, target)
                    .await?
            }
            (Err(e), _) => return Err(e),
        };

        serde_json::from_value(value).map_err(|e| {
            ExtractError::Malformed(format!("{}: {}", target.type_name(), e))
        })
    }
}
