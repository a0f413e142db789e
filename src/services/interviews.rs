//! 访谈生命周期：草稿 -> 上线 -> 结束

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::prompts::{InterviewerPromptParams, render_interviewer_prompt};
use crate::services::context::ServiceContext;
use crate::services::outline::GeneratedOutline;
use crate::types::analysis::AnalysisRecord;
use crate::types::interview::{Interview, InterviewStatus, NewInterview};

/// 未指定访谈官时Agent使用的名字
pub const DEFAULT_INTERVIEWER_NAME: &str = "Alex";

/// 上线结果：固定后的访谈与渲染好的Agent提示词
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublishedInterview {
    pub interview: Interview,
    pub agent_prompt: String,
}

pub async fn create_interview(
    context: &ServiceContext,
    request: NewInterview,
) -> ServiceResult<Interview> {
    if request.name.trim().is_empty() {
        return Err(ServiceError::validation("interview name is required"));
    }
    if request.objective.trim().is_empty() {
        return Err(ServiceError::validation("objective is required"));
    }
    let max_questions = context.config.outline.max_question_count;
    if request.question_count == 0 || request.question_count > max_questions {
        return Err(ServiceError::validation(format!(
            "question_count must be between 1 and {}",
            max_questions
        )));
    }
    if request.duration_mins == 0 {
        return Err(ServiceError::validation("durationMins must be positive"));
    }
    if let Some(interviewer_id) = request.interviewer_id {
        find_interviewer_name(context, interviewer_id).await?;
    }

    let interview = context.store.create_interview(Interview::new(request)).await?;
    tracing::info!(interview_id = %interview.id, organization_id = %interview.organization_id, "interview created");
    Ok(interview)
}

pub async fn get_interview(context: &ServiceContext, id: Uuid) -> ServiceResult<Interview> {
    context.store.get_interview(id).await
}

/// 取回仍处于草稿状态的访谈
pub async fn get_draft_interview(context: &ServiceContext, id: Uuid) -> ServiceResult<Interview> {
    let interview = context.store.get_interview(id).await?;
    if interview.status != InterviewStatus::Draft {
        return Err(ServiceError::validation(format!(
            "interview {} is no longer a draft",
            id
        )));
    }
    Ok(interview)
}

/// 把生成的大纲写入访谈草稿
pub async fn attach_outline(
    context: &ServiceContext,
    id: Uuid,
    outline: &GeneratedOutline,
) -> ServiceResult<Interview> {
    let mut interview = context.store.get_interview(id).await?;
    interview
        .set_outline(
            outline.draft_outline.clone(),
            outline.localized_outline.clone(),
        )
        .map_err(ServiceError::Validation)?;
    let interview = context.store.update_interview(interview).await?;
    tracing::debug!(interview_id = %id, "outline attached to interview");
    Ok(interview)
}

async fn find_interviewer_name(context: &ServiceContext, id: Uuid) -> ServiceResult<String> {
    context
        .store
        .get_interviewer(id)
        .await?
        .map(|i| i.name)
        .ok_or_else(|| ServiceError::not_found("interviewer", id))
}

/// 上线访谈：固定问题列表并渲染语音Agent提示词
pub async fn publish_interview(
    context: &ServiceContext,
    id: Uuid,
) -> ServiceResult<PublishedInterview> {
    let mut interview = context.store.get_interview(id).await?;
    interview.publish().map_err(ServiceError::Validation)?;

    let name = match interview.interviewer_id {
        Some(interviewer_id) => find_interviewer_name(context, interviewer_id).await?,
        None => DEFAULT_INTERVIEWER_NAME.to_string(),
    };
    // 提示词渲染失败时不改变访谈状态
    let agent_prompt = render_interviewer_prompt(&InterviewerPromptParams {
        mins: interview.duration_mins,
        name,
        objective: interview.objective.clone(),
        questions: interview.questions.clone(),
    })?;

    let interview = context.store.update_interview(interview).await?;
    tracing::info!(
        interview_id = %interview.id,
        questions = interview.questions.len(),
        "interview published"
    );
    Ok(PublishedInterview {
        interview,
        agent_prompt,
    })
}

pub async fn close_interview(context: &ServiceContext, id: Uuid) -> ServiceResult<Interview> {
    let mut interview = context.store.get_interview(id).await?;
    interview.close().map_err(ServiceError::Validation)?;
    let interview = context.store.update_interview(interview).await?;
    tracing::info!(interview_id = %interview.id, "interview closed");
    Ok(interview)
}

pub async fn list_analyses(
    context: &ServiceContext,
    id: Uuid,
) -> ServiceResult<Vec<AnalysisRecord>> {
    // 不存在的访谈返回404而非空列表
    context.store.get_interview(id).await?;
    context.store.list_analyses(id).await
}
