#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;
    use uuid::Uuid;

    use crate::error::ServiceError;
    use crate::i18n::Language;
    use crate::store::{MemoryStore, SnapshotStore, Store};
    use crate::types::analysis::{AnalysisRecord, CommunicationAnalysis};
    use crate::types::interview::{Interview, NewInterview};
    use crate::types::interviewer::{Interviewer, NewInterviewer, PersonaTraits};

    fn interview() -> Interview {
        Interview::new(NewInterview {
            organization_id: "org_1".to_string(),
            user_id: "user_1".to_string(),
            name: "Checkout study".to_string(),
            objective: "Understand checkout drop-off".to_string(),
            question_count: 5,
            duration_mins: 10,
            is_anonymous: true,
            language: Language::English,
            interviewer_id: None,
        })
    }

    fn interviewer(name: &str) -> Interviewer {
        Interviewer::new(NewInterviewer {
            name: name.to_string(),
            agent_id: format!("agent_{}", name.to_lowercase()),
            description: String::new(),
            traits: PersonaTraits::default(),
        })
    }

    fn analysis() -> CommunicationAnalysis {
        CommunicationAnalysis {
            insight_score: 6.0,
            summary: "Participant abandoned checkout over shipping costs.".to_string(),
            supporting_quotes: vec![],
            key_insights: vec![],
            pain_points: vec![],
            needs: vec![],
            themes: vec![],
            emotional_journey: vec![],
            recommendations: vec![],
        }
    }

    #[tokio::test]
    async fn test_interview_round_trip_and_not_found() {
        let store = MemoryStore::new();
        let created = store.create_interview(interview()).await.unwrap();

        let fetched = store.get_interview(created.id).await.unwrap();
        assert_eq!(fetched, created);

        let missing = store.get_interview(Uuid::new_v4()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_unknown_interview_fails() {
        let store = MemoryStore::new();
        let result = store.update_interview(interview()).await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_analyses_are_insert_only() {
        let store = MemoryStore::new();
        let created = store.create_interview(interview()).await.unwrap();

        let record = AnalysisRecord::new(created.id, "call_1".to_string(), analysis());
        store.insert_analysis(record.clone()).await.unwrap();

        let duplicate = store.insert_analysis(record.clone()).await;
        assert!(matches!(duplicate, Err(ServiceError::Conflict { .. })));

        // 重新分析生成新记录
        let again = AnalysisRecord::new(created.id, "call_1".to_string(), analysis());
        store.insert_analysis(again).await.unwrap();

        let listed = store.list_analyses(created.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, record.id);
    }

    #[tokio::test]
    async fn test_analysis_requires_existing_interview() {
        let store = MemoryStore::new();
        let orphan = AnalysisRecord::new(Uuid::new_v4(), "call_x".to_string(), analysis());
        assert!(store.insert_analysis(orphan).await.is_err());
    }

    #[tokio::test]
    async fn test_interviewer_name_is_unique_case_insensitively() {
        let store = MemoryStore::new();
        store.insert_interviewer(interviewer("Ava")).await.unwrap();

        let duplicate = store.insert_interviewer(interviewer(" ava ")).await;
        assert!(matches!(duplicate, Err(ServiceError::Conflict { .. })));
        assert_eq!(store.list_interviewers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_or_fetch_is_idempotent() {
        let store = MemoryStore::new();

        let (first, created) = store
            .insert_or_fetch_interviewer(interviewer("Ava"))
            .await
            .unwrap();
        assert!(created);

        let (second, created) = store
            .insert_or_fetch_interviewer(interviewer("Ava"))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(store.list_interviewers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_insert_or_fetch_creates_one_record() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert_or_fetch_interviewer(interviewer("Ava"))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut ids = Vec::new();
        let mut created_count = 0;
        for handle in handles {
            let (record, created) = handle.await.unwrap();
            ids.push(record.id);
            if created {
                created_count += 1;
            }
        }

        assert_eq!(created_count, 1);
        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(store.list_interviewers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_interviewer_frees_name() {
        let store = MemoryStore::new();
        let ava = store.insert_interviewer(interviewer("Ava")).await.unwrap();

        assert!(store.delete_interviewer(ava.id).await.unwrap());
        assert!(!store.delete_interviewer(ava.id).await.unwrap());
        assert!(store.find_interviewer_by_name("Ava").await.unwrap().is_none());
        store.insert_interviewer(interviewer("Ava")).await.unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("store.json");

        let interview_id = {
            let store = SnapshotStore::open(&path).await.unwrap();
            let created = store.create_interview(interview()).await.unwrap();
            store
                .insert_analysis(AnalysisRecord::new(
                    created.id,
                    "call_1".to_string(),
                    analysis(),
                ))
                .await
                .unwrap();
            store.insert_interviewer(interviewer("Ava")).await.unwrap();
            created.id
        };
        assert!(path.exists());

        let reopened = SnapshotStore::open(&path).await.unwrap();
        assert_eq!(reopened.path(), path.as_path());
        assert_eq!(
            reopened.get_interview(interview_id).await.unwrap().name,
            "Checkout study"
        );
        assert_eq!(reopened.list_analyses(interview_id).await.unwrap().len(), 1);

        // 名称索引在重新打开后依然生效
        let (existing, created) = reopened
            .insert_or_fetch_interviewer(interviewer("Ava"))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(existing.name, "Ava");
    }

    #[tokio::test]
    async fn test_get_interviewer_by_id() {
        let store = MemoryStore::new();
        let ava = store.insert_interviewer(interviewer("Ava")).await.unwrap();

        let fetched = store.get_interviewer(ava.id).await.unwrap();
        assert_eq!(fetched.map(|i| i.name), Some("Ava".to_string()));
        assert!(store.get_interviewer(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_write_failure_leaves_state_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let store = SnapshotStore::open(&path).await.unwrap();
        let created = store.create_interview(interview()).await.unwrap();

        // 快照路径被非空目录占据，替换文件必然失败
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        let record = AnalysisRecord::new(created.id, "call_1".to_string(), analysis());
        let result = store.insert_analysis(record).await;
        assert!(matches!(result, Err(ServiceError::Store(_))));
        assert!(store.list_analyses(created.id).await.unwrap().is_empty());

        let ava = interviewer("Ava");
        let ava_id = ava.id;
        assert!(store.insert_interviewer(ava).await.is_err());
        assert!(store.get_interviewer(ava_id).await.unwrap().is_none());
        assert!(store.find_interviewer_by_name("Ava").await.unwrap().is_none());

        let mut renamed = created.clone();
        renamed.name = "Renamed".to_string();
        assert!(store.update_interview(renamed).await.is_err());
        assert_eq!(
            store.get_interview(created.id).await.unwrap().name,
            "Checkout study"
        );
    }

    #[tokio::test]
    async fn test_snapshot_store_rejects_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(SnapshotStore::open(&path).await.is_err());
    }
}
