//! 持久化层
//!
//! 托管数据库被视为外部协作方，这里只定义服务层依赖的存储契约，
//! 并提供内存实现与JSON快照实现。

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::types::analysis::AnalysisRecord;
use crate::types::interview::Interview;
use crate::types::interviewer::Interviewer;

mod memory;
mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_interview(&self, interview: Interview) -> ServiceResult<Interview>;

    async fn get_interview(&self, id: Uuid) -> ServiceResult<Interview>;

    /// 覆盖已存在的访谈记录
    async fn update_interview(&self, interview: Interview) -> ServiceResult<Interview>;

    /// 分析记录只允许插入，不允许修改
    async fn insert_analysis(&self, record: AnalysisRecord) -> ServiceResult<AnalysisRecord>;

    /// 按创建顺序列出某次访谈的全部分析记录
    async fn list_analyses(&self, interview_id: Uuid) -> ServiceResult<Vec<AnalysisRecord>>;

    /// 插入访谈官；名称冲突时返回 `Conflict`
    async fn insert_interviewer(&self, interviewer: Interviewer) -> ServiceResult<Interviewer>;

    async fn get_interviewer(&self, id: Uuid) -> ServiceResult<Option<Interviewer>>;

    async fn find_interviewer_by_name(&self, name: &str) -> ServiceResult<Option<Interviewer>>;

    async fn list_interviewers(&self) -> ServiceResult<Vec<Interviewer>>;

    async fn delete_interviewer(&self, id: Uuid) -> ServiceResult<bool>;

    /// 插入或取回已存在的同名访谈官，返回 (记录, 是否新建)
    async fn insert_or_fetch_interviewer(
        &self,
        interviewer: Interviewer,
    ) -> ServiceResult<(Interviewer, bool)> {
        let name = interviewer.name.clone();
        match self.insert_interviewer(interviewer).await {
            Ok(created) => Ok((created, true)),
            Err(ServiceError::Conflict { .. }) => {
                let existing = self.find_interviewer_by_name(&name).await?.ok_or_else(|| {
                    ServiceError::Store(anyhow::anyhow!(
                        "interviewer `{}` conflicted but could not be fetched",
                        name
                    ))
                })?;
                tracing::debug!(interviewer_id = %existing.id, name = %name, "resolved duplicate interviewer to existing row");
                Ok((existing, false))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests;
