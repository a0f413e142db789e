//! 提示词模板库 - 将类型化参数渲染为最终提示词
//!
//! 模板中的占位符写作 `{{name}}`。渲染是纯字符串插值，
//! 唯一的失败方式是缺少参数（空白值同样视为缺失）。

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::interview::Question;

pub mod templates;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([a-z_]+)\s*\}\}").unwrap());

/// 模板渲染错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template parameter `{0}` is missing")]
    MissingParameter(String),
}

/// 模板参数表
#[derive(Debug, Clone, Default)]
pub struct TemplateParams {
    values: BTreeMap<String, String>,
}

impl TemplateParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl ToString) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// 渲染单个模板字符串
pub fn render(template: &str, params: &TemplateParams) -> Result<String, TemplateError> {
    if let Some(missing) = PLACEHOLDER
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .find(|key| params.get(key).is_none())
    {
        return Err(TemplateError::MissingParameter(missing));
    }

    Ok(PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            params.get(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned())
}

/// 列出模板中出现的全部占位符（去重、按出现顺序）
pub fn placeholders(template: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let key = caps[1].to_string();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Prompt模板配置
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    /// 系统提示词
    pub system_prompt: &'static str,
    /// 用户提示词
    pub user_prompt: &'static str,
}

/// 渲染完成的一对提示词
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

impl PromptTemplate {
    pub fn render(&self, params: &TemplateParams) -> Result<RenderedPrompt, TemplateError> {
        Ok(RenderedPrompt {
            system: render(self.system_prompt, params)?,
            user: render(self.user_prompt, params)?,
        })
    }
}

/// 语音访谈Agent的模板参数
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewerPromptParams {
    /// 访谈时长（分钟）
    pub mins: u32,
    /// 访谈官名称
    pub name: String,
    pub objective: String,
    pub questions: Vec<Question>,
}

impl InterviewerPromptParams {
    fn to_params(&self) -> TemplateParams {
        let mins = if self.mins == 0 {
            String::new()
        } else {
            self.mins.to_string()
        };
        TemplateParams::new()
            .with("mins", mins)
            .with("name", &self.name)
            .with("objective", &self.objective)
            .with("questions", format_question_list(&self.questions))
    }
}

/// 渲染语音访谈Agent的系统提示词
pub fn render_interviewer_prompt(params: &InterviewerPromptParams) -> Result<String, TemplateError> {
    render(templates::INTERVIEWER_AGENT, &params.to_params())
}

/// 问题列表的编号文本，附带追问预算
pub fn format_question_list(questions: &[Question]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            format!(
                "{}. {} (follow-up questions allowed: {})",
                i + 1,
                q.text.trim(),
                q.follow_up_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
