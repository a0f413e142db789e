use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::memory::{MemoryStore, StoreState};
use super::Store;
use crate::error::{ServiceError, ServiceResult};
use crate::types::analysis::AnalysisRecord;
use crate::types::interview::Interview;
use crate::types::interviewer::Interviewer;

/// 每次写入后把完整状态落盘为JSON快照的存储
pub struct SnapshotStore {
    inner: MemoryStore,
    path: PathBuf,
    persist_lock: Mutex<()>,
}

impl SnapshotStore {
    /// 打开快照文件；文件不存在时从空状态开始
    pub async fn open(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let path = path.as_ref().to_path_buf();
        let state = match fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<StoreState>(&content).map_err(|e| {
                ServiceError::Store(anyhow::anyhow!(
                    "failed to parse snapshot {}: {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreState::default(),
            Err(e) => return Err(ServiceError::Store(e.into())),
        };

        tracing::info!(path = %path.display(), "snapshot store opened");
        Ok(Self {
            inner: MemoryStore::from_state(state),
            path,
            persist_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 写临时文件后原子替换
    async fn persist(&self, state: &StoreState) -> ServiceResult<()> {
        let content =
            serde_json::to_string_pretty(state).map_err(|e| ServiceError::Store(e.into()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Store(e.into()))?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .map_err(|e| ServiceError::Store(e.into()))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| ServiceError::Store(e.into()))?;
        Ok(())
    }

    /// 在状态副本上执行写操作，落盘成功后才替换内存状态
    async fn commit<T, F>(&self, apply: F) -> ServiceResult<T>
    where
        F: FnOnce(&mut StoreState) -> ServiceResult<T> + Send,
        T: Send,
    {
        let _guard = self.persist_lock.lock().await;
        let mut next = self.inner.snapshot().await;
        let output = apply(&mut next)?;
        if let Err(e) = self.persist(&next).await {
            tracing::error!(path = %self.path.display(), error = %e, "snapshot write failed, change discarded");
            return Err(e);
        }
        self.inner.replace(next).await;
        Ok(output)
    }
}

#[async_trait]
impl Store for SnapshotStore {
    async fn create_interview(&self, interview: Interview) -> ServiceResult<Interview> {
        self.commit(|state| state.create_interview(interview)).await
    }

    async fn get_interview(&self, id: Uuid) -> ServiceResult<Interview> {
        self.inner.get_interview(id).await
    }

    async fn update_interview(&self, interview: Interview) -> ServiceResult<Interview> {
        self.commit(|state| state.update_interview(interview)).await
    }

    async fn insert_analysis(&self, record: AnalysisRecord) -> ServiceResult<AnalysisRecord> {
        self.commit(|state| state.insert_analysis(record)).await
    }

    async fn list_analyses(&self, interview_id: Uuid) -> ServiceResult<Vec<AnalysisRecord>> {
        self.inner.list_analyses(interview_id).await
    }

    async fn insert_interviewer(&self, interviewer: Interviewer) -> ServiceResult<Interviewer> {
        self.commit(|state| state.insert_interviewer(interviewer)).await
    }

    async fn get_interviewer(&self, id: Uuid) -> ServiceResult<Option<Interviewer>> {
        self.inner.get_interviewer(id).await
    }

    async fn find_interviewer_by_name(&self, name: &str) -> ServiceResult<Option<Interviewer>> {
        self.inner.find_interviewer_by_name(name).await
    }

    async fn list_interviewers(&self) -> ServiceResult<Vec<Interviewer>> {
        self.inner.list_interviewers().await
    }

    async fn delete_interviewer(&self, id: Uuid) -> ServiceResult<bool> {
        if self.inner.get_interviewer(id).await?.is_none() {
            return Ok(false);
        }
        self.commit(|state| Ok(state.delete_interviewer(id))).await
    }
}
