use async_trait::async_trait;

use crate::error::{ServiceError, ServiceResult};
use crate::llm::client::{ExtractError, LLMClient, StructuredOutput};
use crate::prompts::{PromptTemplate, TemplateParams};

/// 单轮结构化抽取任务：渲染模板 -> 模型按输出结构提交 -> 校验
#[async_trait]
pub trait StructuredTask: Send + Sync {
    /// 任务输出类型，其JSON Schema即提交给模型的结构
    type Output: StructuredOutput;

    /// 任务标识，用于日志与错误上下文
    fn task_name(&self) -> &'static str;

    /// Prompt模板配置
    fn prompt_template(&self) -> PromptTemplate;

    fn prompt_params(&self) -> TemplateParams;

    /// 反序列化之后的业务校验，返回首个违例
    fn validate(&self, _output: &Self::Output) -> Result<(), String> {
        Ok(())
    }

    /// 默认实现的execute方法 - 模型调用失败已在客户端重试，结构不符直接拒绝
    async fn execute(&self, llm_client: &LLMClient) -> ServiceResult<Self::Output> {
        let task_name = self.task_name();
        let prompt = self.prompt_template().render(&self.prompt_params())?;

        let started = std::time::Instant::now();
        let output = llm_client
            .extract::<Self::Output>(&prompt.system, &prompt.user)
            .await
            .map_err(|e| match e {
                ExtractError::Provider(source) => ServiceError::provider(task_name, source),
                ExtractError::Malformed(reason) => {
                    tracing::warn!(task = task_name, %reason, "model output failed to deserialize");
                    ServiceError::malformed(task_name, reason)
                }
            })?;

        self.validate(&output).map_err(|reason| {
            tracing::warn!(task = task_name, %reason, "model output failed validation");
            ServiceError::malformed(task_name, reason)
        })?;

        tracing::debug!(
            task = task_name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "structured task completed"
        );
        Ok(output)
    }
}
