//! 访谈大纲生成与本地化

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::i18n::Language;
use crate::prompts::{PromptTemplate, TemplateParams, templates};
use crate::services::context::ServiceContext;
use crate::services::interviews;
use crate::services::task::StructuredTask;
use crate::types::interview::{Question, check_outline_alignment};

/// 大纲生成请求
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OutlineRequest {
    pub objective: String,
    /// 访谈语言；缺省时取关联访谈的语言，再缺省为英文
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub question_count: Option<u8>,
    /// 额外把草稿翻译成该语言
    #[serde(default)]
    pub debug_language: Option<Language>,
    /// 生成后写入该访谈的草稿大纲
    #[serde(default)]
    pub interview_id: Option<Uuid>,
}

/// 生成结果
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedOutline {
    pub draft_outline: Vec<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_outline: Option<Vec<Question>>,
}

/// 模型生成的单个问题
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct DraftQuestion {
    /// 问题正文，不带编号
    pub question: String,
    /// 建议的追问次数（0-3）
    #[serde(default)]
    pub follow_up_count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct DraftOutline {
    pub questions: Vec<DraftQuestion>,
}

/// 翻译后的问题，`id` 必须与草稿一致
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct LocalizedQuestion {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct LocalizedOutline {
    pub questions: Vec<LocalizedQuestion>,
}

pub struct OutlineGenerationTask {
    pub objective: String,
    pub language: Language,
    pub question_count: u8,
    pub max_words: usize,
}

impl StructuredTask for OutlineGenerationTask {
    type Output = DraftOutline;

    fn task_name(&self) -> &'static str {
        "generate_outline"
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate {
            system_prompt: templates::OUTLINE_GENERATION_SYSTEM,
            user_prompt: templates::OUTLINE_GENERATION_USER,
        }
    }

    fn prompt_params(&self) -> TemplateParams {
        TemplateParams::new()
            .with("objective", self.objective.trim())
            .with("question_count", self.question_count)
            .with("max_words", self.max_words)
            .with("language_name", self.language.english_name())
            .with("language_instruction", self.language.prompt_instruction())
    }

    fn validate(&self, output: &DraftOutline) -> Result<(), String> {
        let expected = self.question_count as usize;
        if output.questions.len() != expected {
            return Err(format!(
                "expected exactly {} questions, got {}",
                expected,
                output.questions.len()
            ));
        }
        for (index, question) in output.questions.iter().enumerate() {
            let words = question.question.split_whitespace().count();
            if words == 0 {
                return Err(format!("question {} is empty", index + 1));
            }
            if words > self.max_words {
                return Err(format!(
                    "question {} has {} words, limit is {}",
                    index + 1,
                    words,
                    self.max_words
                ));
            }
        }
        Ok(())
    }
}

pub struct OutlineLocalizationTask {
    pub draft: Vec<Question>,
    pub language: Language,
    pub max_words: usize,
}

impl OutlineLocalizationTask {
    fn questions_json(&self) -> String {
        let items: Vec<LocalizedQuestion> = self
            .draft
            .iter()
            .map(|q| LocalizedQuestion {
                id: q.id.clone(),
                text: q.text.clone(),
            })
            .collect();
        serde_json::to_string_pretty(&items).unwrap_or_default()
    }
}

impl StructuredTask for OutlineLocalizationTask {
    type Output = LocalizedOutline;

    fn task_name(&self) -> &'static str {
        "localize_outline"
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate {
            system_prompt: templates::OUTLINE_LOCALIZATION_SYSTEM,
            user_prompt: templates::OUTLINE_LOCALIZATION_USER,
        }
    }

    fn prompt_params(&self) -> TemplateParams {
        TemplateParams::new()
            .with("language_name", self.language.english_name())
            .with("max_words", self.max_words)
            .with("question_count", self.draft.len())
            .with("questions_json", self.questions_json())
    }

    fn validate(&self, output: &LocalizedOutline) -> Result<(), String> {
        if let Some(empty) = output.questions.iter().find(|q| q.text.trim().is_empty()) {
            return Err(format!("translation of `{}` is empty", empty.id));
        }
        check_outline_alignment(&self.draft, &merge_localized(&self.draft, output))
    }
}

/// 按位置合并译文，追问次数沿用草稿
fn merge_localized(draft: &[Question], localized: &LocalizedOutline) -> Vec<Question> {
    localized
        .questions
        .iter()
        .enumerate()
        .map(|(index, q)| {
            let follow_up_count = draft.get(index).map(|d| d.follow_up_count).unwrap_or(0);
            Question::new(q.id.clone(), q.text.trim(), follow_up_count)
        })
        .collect()
}

/// 为模型草稿分配 `q1..qN` 标识
fn number_questions(outline: DraftOutline) -> Vec<Question> {
    outline
        .questions
        .into_iter()
        .enumerate()
        .map(|(index, q)| {
            Question::new(
                format!("q{}", index + 1),
                q.question.trim(),
                q.follow_up_count,
            )
        })
        .collect()
}

/// 生成访谈大纲，必要时追加一次本地化
pub async fn generate_outline(
    context: &ServiceContext,
    request: &OutlineRequest,
) -> ServiceResult<GeneratedOutline> {
    if request.objective.trim().is_empty() {
        return Err(ServiceError::validation("objective is required"));
    }

    // 关联的访谈需先确认存在且仍是草稿
    let interview = match request.interview_id {
        Some(id) => Some(interviews::get_draft_interview(context, id).await?),
        None => None,
    };

    let outline_config = &context.config.outline;
    let question_count = request
        .question_count
        .or(interview.as_ref().map(|i| i.question_count))
        .unwrap_or(outline_config.default_question_count);
    if question_count == 0 || question_count > outline_config.max_question_count {
        return Err(ServiceError::validation(format!(
            "questionCount must be between 1 and {}",
            outline_config.max_question_count
        )));
    }
    let language = request
        .language
        .or(interview.as_ref().map(|i| i.language))
        .unwrap_or_default();

    let generation = OutlineGenerationTask {
        objective: request.objective.clone(),
        language,
        question_count,
        max_words: outline_config.max_question_words,
    };
    let draft = number_questions(generation.execute(&context.llm_client).await?);
    tracing::info!(
        question_count = draft.len(),
        language = language.code(),
        "outline draft generated"
    );

    let localized = match request.debug_language {
        Some(target) if target == language => Some(draft.clone()),
        Some(target) => Some(localize_outline(context, &draft, target).await?),
        None => None,
    };

    let outline = GeneratedOutline {
        draft_outline: draft,
        localized_outline: localized,
    };

    if let Some(id) = request.interview_id {
        interviews::attach_outline(context, id, &outline).await?;
    }
    Ok(outline)
}

/// 翻译已有草稿；数量、顺序与id保持不变
pub async fn localize_outline(
    context: &ServiceContext,
    draft: &[Question],
    language: Language,
) -> ServiceResult<Vec<Question>> {
    if draft.is_empty() {
        return Err(ServiceError::validation("cannot localize an empty outline"));
    }

    let task = OutlineLocalizationTask {
        draft: draft.to_vec(),
        language,
        max_words: context.config.outline.max_question_words,
    };
    let localized = merge_localized(draft, &task.execute(&context.llm_client).await?);

    if let Some(long) = localized.iter().find(|q| q.word_count() > task.max_words) {
        tracing::warn!(
            question_id = %long.id,
            words = long.word_count(),
            language = language.code(),
            "localized question exceeds word limit"
        );
    }
    Ok(localized)
}
