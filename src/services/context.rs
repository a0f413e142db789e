use std::sync::Arc;

use anyhow::Result;

use crate::{
    config::Config,
    llm::client::LLMClient,
    store::{MemoryStore, SnapshotStore, Store},
    voice::{HttpVoiceProvider, VoiceProvider},
};

#[derive(Clone)]
pub struct ServiceContext {
    /// LLM调用器，用于与AI通信。
    pub llm_client: LLMClient,
    /// 配置
    pub config: Config,
    /// 持久化存储
    pub store: Arc<dyn Store>,
    /// 语音Agent服务
    pub voice: Arc<dyn VoiceProvider>,
}

impl ServiceContext {
    /// 按配置创建连接真实服务的上下文
    pub async fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(config.llm.clone())?;
        let store: Arc<dyn Store> = match &config.store.data_path {
            Some(path) => Arc::new(SnapshotStore::open(path).await?),
            None => Arc::new(MemoryStore::new()),
        };
        let voice = Arc::new(HttpVoiceProvider::new(config.voice.clone())?);

        Ok(Self::from_parts(config, llm_client, store, voice))
    }

    /// 使用显式注入的协作方组装上下文
    pub fn from_parts(
        config: Config,
        llm_client: LLMClient,
        store: Arc<dyn Store>,
        voice: Arc<dyn VoiceProvider>,
    ) -> Self {
        Self {
            llm_client,
            config,
            store,
            voice,
        }
    }
}
