use crate::config::{Config, LLMProvider};
use crate::i18n::Language;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Parley - AI语音用户研究后端
#[derive(Parser, Debug)]
#[command(name = "parley-rs")]
#[command(
    about = "Research backend for AI voice interviews: generates localized interview outlines, renders voice-agent instructions and turns call transcripts into structured, cross-interview insights."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 高能效模型，优先用于常规推理任务
    #[arg(long, global = true)]
    pub model_efficient: Option<String>,

    /// 高质量模型，用于长提示词，以及作为efficient失效情况下的兜底
    #[arg(long, global = true)]
    pub model_powerful: Option<String>,

    /// LLM API基地址
    #[arg(long, global = true)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long, global = true)]
    pub llm_api_key: Option<String>,

    /// LLM Provider (openai, moonshot, deepseek, mistral, openrouter, anthropic, gemini, ollama)
    #[arg(long, global = true)]
    pub llm_provider: Option<String>,

    /// 最大tokens数
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    /// 最大并发数
    #[arg(long, global = true)]
    pub max_parallels: Option<usize>,

    /// 模型调用失败时的重试次数
    #[arg(long, global = true)]
    pub retry_attempts: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// 启动HTTP服务
    Serve {
        /// 监听地址，例如 127.0.0.1:8787
        #[arg(short, long)]
        bind: Option<String>,

        /// JSON快照文件路径，不指定时仅保存在内存
        #[arg(long)]
        data_path: Option<PathBuf>,
    },

    /// 根据研究目标生成访谈大纲
    Outline {
        /// 研究目标
        #[arg(short, long)]
        objective: String,

        /// 问题数量
        #[arg(short = 'n', long)]
        question_count: Option<u8>,

        /// 访谈语言 (en, es, fr, de, pt, it, nl, ja, ko, zh)
        #[arg(short, long)]
        language: Option<Language>,

        /// 额外翻译成该语言
        #[arg(long)]
        debug_language: Option<Language>,

        /// 以JSON输出
        #[arg(long)]
        json: bool,
    },

    /// 分析一份或多份通话转写
    Analyze {
        /// 研究目标
        #[arg(short, long)]
        objective: String,

        /// 转写文本文件
        #[arg(required = true)]
        transcripts: Vec<PathBuf>,
    },

    /// 渲染语音访谈Agent的系统提示词
    AgentPrompt {
        /// 访谈官名称
        #[arg(long)]
        name: String,

        /// 访谈时长（分钟）
        #[arg(long)]
        mins: u32,

        /// 研究目标
        #[arg(short, long)]
        objective: String,

        /// 访谈问题，可重复指定
        #[arg(short = 'q', long = "question", required = true)]
        questions: Vec<String>,

        /// 每个问题允许的追问次数
        #[arg(long, default_value_t = 2)]
        follow_ups: u32,
    },
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            // 显式指定的配置文件必须可读
            Some(config_path) => Config::from_file(config_path)
                .with_context(|| format!("无法读取配置文件 {:?}", config_path))?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join("parley.toml");
                if default_config_path.exists() {
                    Config::from_file(&default_config_path).with_context(|| {
                        format!("无法读取默认配置文件 {:?}", default_config_path)
                    })?
                } else {
                    Config::default()
                }
            }
        };

        // 覆盖LLM配置
        if let Some(provider_str) = &self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_base_url) = &self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url.clone();
        }
        if let Some(llm_api_key) = &self.llm_api_key {
            config.llm.api_key = llm_api_key.clone();
        }
        if let Some(model_efficient) = &self.model_efficient {
            config.llm.model_efficient = model_efficient.clone();
        }
        if let Some(model_powerful) = &self.model_powerful {
            config.llm.model_powerful = model_powerful.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.llm.max_parallels = max_parallels;
        }
        if let Some(retry_attempts) = self.retry_attempts {
            config.llm.retry_attempts = retry_attempts;
        }

        // 服务配置
        if let Command::Serve { bind, .. } = &self.command
            && let Some(bind) = bind
        {
            config.server.bind_address = bind.clone();
        }
        if let Command::Serve { data_path, .. } = &self.command
            && let Some(data_path) = data_path
        {
            config.store.data_path = Some(data_path.clone());
        }

        config.verbose = config.verbose || self.verbose;
        Ok(config)
    }
}
