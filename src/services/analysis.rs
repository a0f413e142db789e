//! 单次通话分析

use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::prompts::{PromptTemplate, TemplateParams, templates};
use crate::services::context::ServiceContext;
use crate::services::task::StructuredTask;
use crate::types::analysis::{AnalysisRecord, CommunicationAnalysis};

pub struct CommunicationAnalysisTask {
    pub transcript: String,
    pub objective: String,
}

impl StructuredTask for CommunicationAnalysisTask {
    type Output = CommunicationAnalysis;

    fn task_name(&self) -> &'static str {
        "analyze_communication"
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate {
            system_prompt: templates::COMMUNICATION_ANALYSIS_SYSTEM,
            user_prompt: templates::COMMUNICATION_ANALYSIS_USER,
        }
    }

    fn prompt_params(&self) -> TemplateParams {
        TemplateParams::new()
            .with("objective", self.objective.trim())
            .with("transcript", self.transcript.trim())
    }

    fn validate(&self, output: &CommunicationAnalysis) -> Result<(), String> {
        output.check()
    }
}

/// 对一份转写做一次性结构化分析，不落库
pub async fn analyze_communication(
    context: &ServiceContext,
    transcript: &str,
    objective: &str,
) -> ServiceResult<CommunicationAnalysis> {
    if transcript.trim().is_empty() {
        return Err(ServiceError::validation("transcript is required"));
    }
    if objective.trim().is_empty() {
        return Err(ServiceError::validation("objective is required"));
    }

    let task = CommunicationAnalysisTask {
        transcript: transcript.to_string(),
        objective: objective.to_string(),
    };
    task.execute(&context.llm_client).await
}

/// 分析某次访谈的一通电话并写入分析记录；分析失败时不写入任何内容
///
/// `objective` 缺省时使用访谈自身的研究目标。
pub async fn analyze_and_store(
    context: &ServiceContext,
    interview_id: Uuid,
    call_id: &str,
    transcript: &str,
    objective: Option<&str>,
) -> ServiceResult<AnalysisRecord> {
    if call_id.trim().is_empty() {
        return Err(ServiceError::validation("callId is required"));
    }
    let interview = context.store.get_interview(interview_id).await?;
    let objective = objective
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .unwrap_or(&interview.objective);

    let analysis = match analyze_communication(context, transcript, objective).await {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::error!(
                %interview_id,
                call_id,
                error = %e,
                "communication analysis rejected, nothing persisted"
            );
            return Err(e);
        }
    };

    let record = AnalysisRecord::new(interview_id, call_id.trim().to_string(), analysis);
    let record = context.store.insert_analysis(record).await?;
    tracing::info!(
        %interview_id,
        call_id = %record.call_id,
        record_id = %record.id,
        insight_score = record.analysis.insight_score,
        "communication analysis stored"
    );
    Ok(record)
}
