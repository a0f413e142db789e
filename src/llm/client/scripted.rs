//! 脚本化后端 - 按顺序回放预置的JSON响应，不发起网络请求

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::anyhow;
use serde_json::Value;

use super::{CompletionBackend, ExtractError, ExtractTarget};

/// 一次被记录的调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// 预置响应的后端，用于离线运行与测试
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条模型提交的JSON文本
    pub fn push_response(&self, text: impl Into<String>) -> &Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(Ok(text.into()));
        }
        self
    }

    /// 追加一次失败（模拟网络或Provider错误）
    pub fn push_failure(&self, message: impl Into<String>) -> &Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(Err(message.into()));
        }
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn extract(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        target: ExtractTarget,
    ) -> Result<Value, ExtractError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                model: model.to_string(),
                system_prompt: system_prompt.to_string(),
                user_prompt: user_prompt.to_string(),
            });
        }

        let next = self
            .responses
            .lock()
            .map_err(|_| ExtractError::Provider(anyhow!("scripted backend lock poisoned")))?
            .pop_front();

        match next {
            Some(Ok(text)) => serde_json::from_str(&text).map_err(|e| {
                ExtractError::Malformed(format!("{}: {}", target.type_name(), e))
            }),
            Some(Err(message)) => Err(ExtractError::Provider(anyhow!(message))),
            None => Err(ExtractError::Provider(anyhow!(
                "scripted backend has no responses left"
            ))),
        }
    }
}
