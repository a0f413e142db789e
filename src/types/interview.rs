use std::collections::HashSet;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::i18n::Language;
use crate::types::analysis::{Importance, QuoteType, Sentiment};

/// 访谈问题
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// 允许的追问次数
    pub follow_up_count: u32,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>, follow_up_count: u32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            follow_up_count,
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// 访谈生命周期
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    #[default]
    Draft,
    Live,
    Closed,
}

/// 创建访谈的请求
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewInterview {
    pub organization_id: String,
    pub user_id: String,
    pub name: String,
    pub objective: String,
    pub question_count: u8,
    pub duration_mins: u32,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub interviewer_id: Option<Uuid>,
}

/// 跨访谈洞察中的支撑引用
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SupportingQuote {
    /// 引用来源的单次访谈（通话）标识
    pub call_id: String,
    pub quote: String,
    #[serde(rename = "type")]
    pub quote_type: QuoteType,
    pub sentiment: Sentiment,
}

/// 跨多次访谈归纳出的洞察
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CrossInterviewInsight {
    pub id: String,
    pub theme: String,
    pub insight: String,
    pub importance: Importance,
    /// 出现该主题的访谈数量
    pub interview_count: usize,
    pub supporting_quotes: Vec<SupportingQuote>,
}

/// 研究目标交付物，以 `type` 字段区分
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectiveDeliverable {
    Finding {
        title: String,
        detail: String,
    },
    Persona {
        name: String,
        description: String,
        goals: Vec<String>,
        frustrations: Vec<String>,
    },
    Recommendation {
        title: String,
        rationale: String,
        priority: Importance,
    },
    Metric {
        label: String,
        value: String,
        context: String,
    },
}

impl ObjectiveDeliverable {
    pub fn kind(&self) -> &'static str {
        match self {
            ObjectiveDeliverable::Finding { .. } => "finding",
            ObjectiveDeliverable::Persona { .. } => "persona",
            ObjectiveDeliverable::Recommendation { .. } => "recommendation",
            ObjectiveDeliverable::Metric { .. } => "metric",
        }
    }

    /// 校验必填文本字段非空
    pub fn check(&self) -> Result<(), String> {
        let required: Vec<(&str, &str)> = match self {
            ObjectiveDeliverable::Finding { title, detail } => {
                vec![("title", title.as_str()), ("detail", detail.as_str())]
            }
            ObjectiveDeliverable::Persona {
                name, description, ..
            } => vec![("name", name.as_str()), ("description", description.as_str())],
            ObjectiveDeliverable::Recommendation {
                title, rationale, ..
            } => vec![("title", title.as_str()), ("rationale", rationale.as_str())],
            ObjectiveDeliverable::Metric { label, value, .. } => {
                vec![("label", label.as_str()), ("value", value.as_str())]
            }
        };
        match required.iter().find(|(_, v)| v.trim().is_empty()) {
            Some((field, _)) => Err(format!("{} deliverable has empty `{}`", self.kind(), field)),
            None => Ok(()),
        }
    }
}

/// 访谈记录
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Interview {
    pub id: Uuid,
    pub organization_id: String,
    pub user_id: String,
    pub name: String,
    pub objective: String,
    pub question_count: u8,
    pub duration_mins: u32,
    pub is_anonymous: bool,
    pub language: Language,
    pub interviewer_id: Option<Uuid>,
    pub status: InterviewStatus,
    /// 上线后固定的问题列表
    pub questions: Vec<Question>,
    pub draft_outline: Option<Vec<Question>>,
    pub localized_outline: Option<Vec<Question>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub quotes: Vec<SupportingQuote>,
    #[serde(default)]
    pub executive_summary: Option<String>,
    #[serde(default)]
    pub objective_deliverables: Vec<ObjectiveDeliverable>,
    #[serde(default)]
    pub cross_interview_insights: Vec<CrossInterviewInsight>,
}

impl Interview {
    pub fn new(request: NewInterview) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            organization_id: request.organization_id,
            user_id: request.user_id,
            name: request.name,
            objective: request.objective,
            question_count: request.question_count,
            duration_mins: request.duration_mins,
            is_anonymous: request.is_anonymous,
            language: request.language,
            interviewer_id: request.interviewer_id,
            status: InterviewStatus::Draft,
            questions: Vec::new(),
            draft_outline: None,
            localized_outline: None,
            created_at: now,
            updated_at: now,
            published_at: None,
            insights: Vec::new(),
            quotes: Vec::new(),
            executive_summary: None,
            objective_deliverables: Vec::new(),
            cross_interview_insights: Vec::new(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.status == InterviewStatus::Live
    }

    /// 对受访者实际使用的问题：优先本地化版本
    pub fn effective_outline(&self) -> Option<&[Question]> {
        self.localized_outline
            .as_deref()
            .or(self.draft_outline.as_deref())
    }

    /// 写入大纲；上线后问题不可再修改
    pub fn set_outline(
        &mut self,
        draft: Vec<Question>,
        localized: Option<Vec<Question>>,
    ) -> Result<(), String> {
        if self.status != InterviewStatus::Draft {
            return Err(format!(
                "interview {} is no longer a draft; its questions are frozen",
                self.id
            ));
        }
        if let Some(localized) = &localized {
            check_outline_alignment(&draft, localized)?;
        }
        self.draft_outline = Some(draft);
        self.localized_outline = localized;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 上线：固定问题列表
    pub fn publish(&mut self) -> Result<(), String> {
        if self.status != InterviewStatus::Draft {
            return Err(format!("interview {} is already {:?}", self.id, self.status));
        }
        let questions = match self.effective_outline() {
            Some(outline) if !outline.is_empty() => outline.to_vec(),
            _ => return Err(format!("interview {} has no outline to publish", self.id)),
        };
        let now = Utc::now();
        self.questions = questions;
        self.status = InterviewStatus::Live;
        self.published_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), String> {
        if self.status != InterviewStatus::Live {
            return Err(format!("interview {} is not live", self.id));
        }
        self.status = InterviewStatus::Closed;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 跨访谈洞察引用的通话必须属于已分析的通话
    pub fn check_insight_references(&self, known_calls: &HashSet<String>) -> Result<(), String> {
        for insight in &self.cross_interview_insights {
            if let Some(quote) = insight
                .supporting_quotes
                .iter()
                .find(|q| !known_calls.contains(&q.call_id))
            {
                return Err(format!(
                    "insight `{}` cites unknown call `{}`",
                    insight.id, quote.call_id
                ));
            }
        }
        Ok(())
    }
}

/// 本地化大纲必须与草稿等长、同序、同id
pub fn check_outline_alignment(draft: &[Question], localized: &[Question]) -> Result<(), String> {
    if draft.len() != localized.len() {
        return Err(format!(
            "localized outline has {} questions, draft has {}",
            localized.len(),
            draft.len()
        ));
    }
    for (index, (d, l)) in draft.iter().zip(localized).enumerate() {
        if d.id != l.id {
            return Err(format!(
                "question {} id mismatch: draft `{}`, localized `{}`",
                index + 1,
                d.id,
                l.id
            ));
        }
    }
    Ok(())
}
