//! 访谈官管理与语音服务同步

use std::collections::HashSet;

use crate::error::{ServiceError, ServiceResult};
use crate::services::context::ServiceContext;
use crate::types::interviewer::{Interviewer, NewInterviewer, PersonaTraits, SyncStats};

/// 幂等创建：同名访谈官已存在时返回已有记录，第二项表示是否新建
pub async fn create_or_fetch_interviewer(
    context: &ServiceContext,
    request: NewInterviewer,
) -> ServiceResult<(Interviewer, bool)> {
    request.check().map_err(ServiceError::Validation)?;

    let (interviewer, created) = context
        .store
        .insert_or_fetch_interviewer(Interviewer::new(request))
        .await?;
    if created {
        tracing::info!(interviewer_id = %interviewer.id, name = %interviewer.name, "interviewer created");
    }
    Ok((interviewer, created))
}

pub async fn list_interviewers(context: &ServiceContext) -> ServiceResult<Vec<Interviewer>> {
    context.store.list_interviewers().await
}

/// 以语音服务的Agent列表为准同步本地访谈官
///
/// 先删除远端已不存在的记录，再补齐远端新增的Agent。
pub async fn sync_interviewers(context: &ServiceContext) -> ServiceResult<SyncStats> {
    let agents = context
        .voice
        .list_agents()
        .await
        .map_err(|e| ServiceError::provider("sync_interviewers", e))?;
    let remote_ids: HashSet<&str> = agents.iter().map(|a| a.agent_id.as_str()).collect();

    let mut stats = SyncStats::default();
    let local = context.store.list_interviewers().await?;
    for interviewer in local
        .iter()
        .filter(|i| !remote_ids.contains(i.agent_id.as_str()))
    {
        if context.store.delete_interviewer(interviewer.id).await? {
            stats.deleted += 1;
        }
    }

    let local_ids: HashSet<&str> = local.iter().map(|i| i.agent_id.as_str()).collect();
    for agent in agents
        .iter()
        .filter(|a| !local_ids.contains(a.agent_id.as_str()))
    {
        let candidate = Interviewer::new(NewInterviewer {
            name: agent.display_name().to_string(),
            agent_id: agent.agent_id.clone(),
            description: String::new(),
            traits: PersonaTraits::default(),
        });
        let (_, created) = context.store.insert_or_fetch_interviewer(candidate).await?;
        if created {
            stats.new_added += 1;
        }
    }

    stats.current_total = context.store.list_interviewers().await?.len();
    tracing::info!(
        new_added = stats.new_added,
        deleted = stats.deleted,
        current_total = stats.current_total,
        "interviewers synchronised with voice provider"
    );
    Ok(stats)
}
