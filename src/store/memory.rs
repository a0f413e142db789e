use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::error::{ServiceError, ServiceResult};
use crate::types::analysis::AnalysisRecord;
use crate::types::interview::Interview;
use crate::types::interviewer::Interviewer;

/// 存储状态，可整体序列化为快照
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreState {
    interviews: HashMap<Uuid, Interview>,
    analyses: Vec<AnalysisRecord>,
    interviewers: HashMap<Uuid, Interviewer>,
    /// 规范化名称 -> 访谈官id，承担唯一性约束
    #[serde(default)]
    interviewer_names: HashMap<String, Uuid>,
}

impl StoreState {
    /// 由记录重建名称索引
    pub(crate) fn reindex(&mut self) {
        self.interviewer_names = self
            .interviewers
            .values()
            .map(|i| (Interviewer::unique_key(&i.name), i.id))
            .collect();
    }

    pub(crate) fn create_interview(&mut self, interview: Interview) -> ServiceResult<Interview> {
        if self.interviews.contains_key(&interview.id) {
            return Err(ServiceError::Conflict {
                entity: "interview",
                key: interview.id.to_string(),
            });
        }
        self.interviews.insert(interview.id, interview.clone());
        Ok(interview)
    }

    pub(crate) fn update_interview(&mut self, interview: Interview) -> ServiceResult<Interview> {
        match self.interviews.get_mut(&interview.id) {
            Some(slot) => {
                *slot = interview.clone();
                Ok(interview)
            }
            None => Err(ServiceError::not_found("interview", interview.id)),
        }
    }

    pub(crate) fn insert_analysis(&mut self, record: AnalysisRecord) -> ServiceResult<AnalysisRecord> {
        if !self.interviews.contains_key(&record.interview_id) {
            return Err(ServiceError::not_found("interview", record.interview_id));
        }
        if self.analyses.iter().any(|r| r.id == record.id) {
            return Err(ServiceError::Conflict {
                entity: "analysis",
                key: record.id.to_string(),
            });
        }
        self.analyses.push(record.clone());
        Ok(record)
    }

    pub(crate) fn insert_interviewer(&mut self, interviewer: Interviewer) -> ServiceResult<Interviewer> {
        let key = Interviewer::unique_key(&interviewer.name);
        if self.interviewer_names.contains_key(&key) {
            return Err(ServiceError::Conflict {
                entity: "interviewer",
                key: interviewer.name,
            });
        }
        self.interviewer_names.insert(key, interviewer.id);
        self.interviewers.insert(interviewer.id, interviewer.clone());
        Ok(interviewer)
    }

    pub(crate) fn delete_interviewer(&mut self, id: Uuid) -> bool {
        match self.interviewers.remove(&id) {
            Some(removed) => {
                self.interviewer_names
                    .remove(&Interviewer::unique_key(&removed.name));
                true
            }
            None => false,
        }
    }
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_state(mut state: StoreState) -> Self {
        state.reindex();
        Self {
            state: RwLock::new(state),
        }
    }

    pub(crate) async fn snapshot(&self) -> StoreState {
        self.state.read().await.clone()
    }

    /// 以已落盘的状态整体替换当前状态
    pub(crate) async fn replace(&self, state: StoreState) {
        *self.state.write().await = state;
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_interview(&self, interview: Interview) -> ServiceResult<Interview> {
        self.state.write().await.create_interview(interview)
    }

    async fn get_interview(&self, id: Uuid) -> ServiceResult<Interview> {
        let state = self.state.read().await;
        state
            .interviews
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("interview", id))
    }

    async fn update_interview(&self, interview: Interview) -> ServiceResult<Interview> {
        self.state.write().await.update_interview(interview)
    }

    async fn insert_analysis(&self, record: AnalysisRecord) -> ServiceResult<AnalysisRecord> {
        self.state.write().await.insert_analysis(record)
    }

    async fn list_analyses(&self, interview_id: Uuid) -> ServiceResult<Vec<AnalysisRecord>> {
        let state = self.state.read().await;
        Ok(state
            .analyses
            .iter()
            .filter(|r| r.interview_id == interview_id)
            .cloned()
            .collect())
    }

    async fn insert_interviewer(&self, interviewer: Interviewer) -> ServiceResult<Interviewer> {
        // 检查与写入在同一把写锁内完成
        self.state.write().await.insert_interviewer(interviewer)
    }

    async fn get_interviewer(&self, id: Uuid) -> ServiceResult<Option<Interviewer>> {
        Ok(self.state.read().await.interviewers.get(&id).cloned())
    }

    async fn find_interviewer_by_name(&self, name: &str) -> ServiceResult<Option<Interviewer>> {
        let state = self.state.read().await;
        Ok(state
            .interviewer_names
            .get(&Interviewer::unique_key(name))
            .and_then(|id| state.interviewers.get(id))
            .cloned())
    }

    async fn list_interviewers(&self) -> ServiceResult<Vec<Interviewer>> {
        let state = self.state.read().await;
        let mut interviewers: Vec<Interviewer> = state.interviewers.values().cloned().collect();
        interviewers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        Ok(interviewers)
    }

    async fn delete_interviewer(&self, id: Uuid) -> ServiceResult<bool> {
        Ok(self.state.write().await.delete_interviewer(id))
    }
}
