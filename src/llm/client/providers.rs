//! 基于rig的Provider后端

use anyhow::Result;
use futures::future::BoxFuture;
use rig::{
    client::CompletionClient,
    extractor::ExtractionError,
    providers::gemini::completion::gemini_api_types::{AdditionalParameters, GenerationConfig},
};
use serde_json::Value;

use crate::config::{LLMConfig, LLMProvider};

use super::{CompletionBackend, ExtractError, ExtractTarget, StructuredOutput};

/// 以rig Extractor执行一次提取：系统提示词追加到preamble，目标结构作为submit工具
macro_rules! run_extractor {
    ($builder:expr, $system:expr, $user:expr, $config:expr) => {
        $builder
            .preamble($system)
            .max_tokens($config.max_tokens.into())
            .build()
            .extract($user)
            .await
            .map_err(ExtractError::from)
    };
}

impl From<ExtractionError> for ExtractError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::CompletionError(e) => ExtractError::Provider(e.into()),
            ExtractionError::NoData => {
                ExtractError::Malformed("model did not submit any data".to_string())
            }
            ExtractionError::DeserializationError(e) => ExtractError::Malformed(e.to_string()),
        }
    }
}

#[derive(Clone)]
enum ProviderClient {
    OpenAI(rig::providers::openai::Client),
    Moonshot(rig::providers::moonshot::Client),
    DeepSeek(rig::providers::deepseek::Client),
    Mistral(rig::providers::mistral::Client),
    OpenRouter(rig::providers::openrouter::Client),
    Anthropic(rig::providers::anthropic::Client),
    Gemini(rig::providers::gemini::Client),
    Ollama(rig::providers::ollama::Client),
}

impl ProviderClient {
    fn from_config(config: &LLMConfig) -> Result<Self> {
        let key = config.api_key.as_str();
        let client = match config.provider {
            LLMProvider::OpenAI => Self::OpenAI(
                rig::providers::openai::Client::builder(key)
                    .base_url(&config.api_base_url)
                    .build(),
            ),
            LLMProvider::Moonshot => Self::Moonshot(
                rig::providers::moonshot::Client::builder(key)
                    .base_url(&config.api_base_url)
                    .build(),
            ),
            LLMProvider::DeepSeek => Self::DeepSeek(
                rig::providers::deepseek::Client::builder(key)
                    .base_url(&config.api_base_url)
                    .build(),
            ),
            LLMProvider::Mistral => {
                Self::Mistral(rig::providers::mistral::Client::builder(key).build())
            }
            LLMProvider::OpenRouter => {
                Self::OpenRouter(rig::providers::openrouter::Client::builder(key).build())
            }
            LLMProvider::Anthropic => {
                Self::Anthropic(rig::providers::anthropic::ClientBuilder::new(key).build()?)
            }
            LLMProvider::Gemini => {
                Self::Gemini(rig::providers::gemini::Client::builder(key).build()?)
            }
            LLMProvider::Ollama => Self::Ollama(rig::providers::ollama::Client::builder().build()),
        };
        Ok(client)
    }
}

/// 连接真实模型服务的后端；每次调用按模型与目标结构临时构建Extractor
pub struct ProviderBackend {
    client: ProviderClient,
    config: LLMConfig,
}

impl ProviderBackend {
    pub fn new(config: &LLMConfig) -> Result<Self> {
        Ok(Self {
            client: ProviderClient::from_config(config)?,
            config: config.clone(),
        })
    }

    async fn extract_typed<T: StructuredOutput>(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<T, ExtractError> {
        let config = &self.config;
        match &self.client {
            // 兼容OpenAI协议的网关大多只实现了chat completions接口
            ProviderClient::OpenAI(client) => run_extractor!(
                client.extractor_completions_api::<T>(model),
                system_prompt,
                user_prompt,
                config
            ),
            ProviderClient::Moonshot(client) => {
                run_extractor!(client.extractor::<T>(model), system_prompt, user_prompt, config)
            }
            ProviderClient::DeepSeek(client) => {
                run_extractor!(client.extractor::<T>(model), system_prompt, user_prompt, config)
            }
            ProviderClient::Mistral(client) => {
                run_extractor!(client.extractor::<T>(model), system_prompt, user_prompt, config)
            }
            ProviderClient::OpenRouter(client) => {
                run_extractor!(client.extractor::<T>(model), system_prompt, user_prompt, config)
            }
            ProviderClient::Anthropic(client) => {
                run_extractor!(client.extractor::<T>(model), system_prompt, user_prompt, config)
            }
            ProviderClient::Gemini(client) => {
                let params = AdditionalParameters::default().with_config(GenerationConfig::default());
                run_extractor!(
                    client
                        .extractor::<T>(model)
                        .additional_params(serde_json::to_value(params).unwrap_or_default()),
                    system_prompt,
                    user_prompt,
                    config
                )
            }
            ProviderClient::Ollama(client) => {
                run_extractor!(client.extractor::<T>(model), system_prompt, user_prompt, config)
            }
        }
    }
}

/// `ExtractTarget` 保存的单态化入口
pub(super) fn extract_as<'a, T: StructuredOutput>(
    backend: &'a ProviderBackend,
    model: &'a str,
    system_prompt: &'a str,
    user_prompt: &'a str,
) -> BoxFuture<'a, Result<Value, ExtractError>> {
    Box::pin(async move {
        let data: T = backend
            .extract_typed(model, system_prompt, user_prompt)
            .await?;
        serde_json::to_value(data).map_err(|e| ExtractError::Malformed(e.to_string()))
    })
}

#[async_trait::async_trait]
impl CompletionBackend for ProviderBackend {
    async fn extract(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        target: ExtractTarget,
    ) -> Result<Value, ExtractError> {
        (target.via_provider)(self, model, system_prompt, user_prompt).await
    }
}
