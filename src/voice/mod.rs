//! 语音服务 - 管理托管的访谈Agent

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::VoiceConfig;

/// 语音服务中的一个Agent
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VoiceAgent {
    pub agent_id: String,
    #[serde(default)]
    pub agent_name: Option<String>,
}

impl VoiceAgent {
    /// 本地访谈官记录使用的名称，缺省时退回Agent标识
    pub fn display_name(&self) -> &str {
        self.agent_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.agent_id)
    }
}

#[async_trait]
pub trait VoiceProvider: Send + Sync {
    async fn list_agents(&self) -> Result<Vec<VoiceAgent>>;
}

/// 基于HTTP的语音服务客户端
pub struct HttpVoiceProvider {
    client: Client,
    config: VoiceConfig,
}

impl HttpVoiceProvider {
    pub fn new(config: VoiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl VoiceProvider for HttpVoiceProvider {
    async fn list_agents(&self) -> Result<Vec<VoiceAgent>> {
        if self.config.api_key.trim().is_empty() {
            return Err(anyhow!("voice provider api_key is not configured"));
        }

        let url = format!(
            "{}/list-agents",
            self.config.api_base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("list agents: HTTP {}: {}", status, body));
        }

        let agents: Vec<VoiceAgent> = response.json().await?;
        tracing::debug!(count = agents.len(), "fetched voice agents");
        Ok(agents)
    }
}

/// 固定Agent列表的语音服务，用于离线运行与测试
#[derive(Debug, Default)]
pub struct StaticVoiceProvider {
    agents: Mutex<Vec<VoiceAgent>>,
}

impl StaticVoiceProvider {
    pub fn new(agents: Vec<VoiceAgent>) -> Self {
        Self {
            agents: Mutex::new(agents),
        }
    }

    /// 替换Agent列表，模拟远端变化
    pub fn set_agents(&self, agents: Vec<VoiceAgent>) {
        if let Ok(mut guard) = self.agents.lock() {
            *guard = agents;
        }
    }
}

#[async_trait]
impl VoiceProvider for StaticVoiceProvider {
    async fn list_agents(&self) -> Result<Vec<VoiceAgent>> {
        self.agents
            .lock()
            .map(|agents| agents.clone())
            .map_err(|_| anyhow!("voice agent list lock poisoned"))
    }
}
