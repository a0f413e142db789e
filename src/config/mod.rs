use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    #[default]
    OpenAI,
    Moonshot,
    DeepSeek,
    Mistral,
    OpenRouter,
    Anthropic,
    Gemini,
    Ollama,
}

impl LLMProvider {
    pub const ALL: [LLMProvider; 8] = [
        LLMProvider::OpenAI,
        LLMProvider::Moonshot,
        LLMProvider::DeepSeek,
        LLMProvider::Mistral,
        LLMProvider::OpenRouter,
        LLMProvider::Anthropic,
        LLMProvider::Gemini,
        LLMProvider::Ollama,
    ];

    /// 配置文件与命令行中使用的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            LLMProvider::OpenAI => "openai",
            LLMProvider::Moonshot => "moonshot",
            LLMProvider::DeepSeek => "deepseek",
            LLMProvider::Mistral => "mistral",
            LLMProvider::OpenRouter => "openrouter",
            LLMProvider::Anthropic => "anthropic",
            LLMProvider::Gemini => "gemini",
            LLMProvider::Ollama => "ollama",
        }
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| format!("Unknown provider: {}", s))
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// HTTP服务配置
    pub server: ServerConfig,

    /// 存储配置
    pub store: StoreConfig,

    /// 语音Agent服务配置
    pub voice: VoiceConfig,

    /// 访谈大纲生成配置
    pub outline: OutlineConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，用于大纲生成、翻译等常规任务
    pub model_efficient: String,

    /// 高质量模型，用于长转录稿分析，以及作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 单次调用超时时间（秒）
    pub timeout_seconds: u64,

    /// 批量分析时的最大并发数
    pub max_parallels: usize,
}

/// HTTP服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_address: String,
}

/// 存储配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// 快照文件路径，未设置时仅保存在内存中
    pub data_path: Option<PathBuf>,
}

/// 语音Agent服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct VoiceConfig {
    /// 语音服务API基地址
    pub api_base_url: String,

    /// 语音服务API KEY
    pub api_key: String,

    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 访谈大纲配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct OutlineConfig {
    /// 默认问题数量
    pub default_question_count: u8,

    /// 允许的最大问题数量
    pub max_question_count: u8,

    /// 单个问题的最大词数
    pub max_question_words: usize,
}

impl Config {
    /// 从TOML文件加载配置，缺省字段取默认值
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("PARLEY_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.openai.com/v1"),
            model_efficient: String::from("gpt-4o-mini"),
            model_powerful: String::from("gpt-4o"),
            max_tokens: 16384,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            timeout_seconds: 120,
            max_parallels: 3,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: String::from("127.0.0.1:8787"),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::from("https://api.retellai.com"),
            api_key: std::env::var("PARLEY_VOICE_API_KEY").unwrap_or_default(),
            timeout_seconds: 30,
        }
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            default_question_count: 5,
            max_question_count: 20,
            max_question_words: 25,
        }
    }
}
