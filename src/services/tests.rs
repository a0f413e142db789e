#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use uuid::Uuid;

    use crate::config::{Config, LLMConfig};
    use crate::error::ServiceError;
    use crate::i18n::Language;
    use crate::llm::client::{LLMClient, ScriptedBackend};
    use crate::services::outline::{OutlineRequest, generate_outline};
    use crate::services::synthesis::{cluster_insights, latest_per_call};
    use crate::services::{ServiceContext, analysis, interviewers, interviews, synthesis};
    use crate::store::{MemoryStore, Store};
    use crate::types::analysis::{
        AnalysisRecord, CommunicationAnalysis, Importance, Quote, QuoteType, Sentiment,
    };
    use crate::types::interview::{InterviewStatus, NewInterview};
    use crate::types::interviewer::{NewInterviewer, PersonaTraits};
    use crate::voice::{StaticVoiceProvider, VoiceAgent};

    struct Harness {
        context: ServiceContext,
        backend: Arc<ScriptedBackend>,
        voice: Arc<StaticVoiceProvider>,
    }

    fn harness() -> Harness {
        let backend = Arc::new(ScriptedBackend::new());
        let voice = Arc::new(StaticVoiceProvider::new(vec![]));
        let llm = LLMConfig {
            model_efficient: "small".to_string(),
            model_powerful: "large".to_string(),
            retry_attempts: 1,
            retry_delay_ms: 0,
            timeout_seconds: 5,
            ..Default::default()
        };
        let config = Config {
            llm: llm.clone(),
            ..Default::default()
        };
        let context = ServiceContext::from_parts(
            config,
            LLMClient::with_backend(llm, backend.clone()),
            Arc::new(MemoryStore::new()),
            voice.clone(),
        );
        Harness {
            context,
            backend,
            voice,
        }
    }

    fn checkout_outline_json() -> String {
        json!({
            "questions": [
                {"question": "Tell me about the last time you shopped online.", "follow_up_count": 1},
                {"question": "What happened when you reached the checkout page?", "follow_up_count": 2},
                {"question": "Was there a moment you considered leaving the purchase?", "follow_up_count": 2},
                {"question": "How did shipping costs or delivery times affect your decision?", "follow_up_count": 2},
                {"question": "What would have made finishing the purchase easier?", "follow_up_count": 1}
            ]
        })
        .to_string()
    }

    fn new_interview(question_count: u8) -> NewInterview {
        NewInterview {
            organization_id: "org_1".to_string(),
            user_id: "user_1".to_string(),
            name: "Checkout study".to_string(),
            objective: "Understand checkout drop-off".to_string(),
            question_count,
            duration_mins: 15,
            is_anonymous: false,
            language: Language::English,
            interviewer_id: None,
        }
    }

    fn quote(text: &str, theme: &str, sentiment: Sentiment) -> Quote {
        Quote {
            quote: text.to_string(),
            quote_type: QuoteType::PainPoint,
            sentiment,
            theme: theme.to_string(),
        }
    }

    fn analysis_with(quotes: Vec<Quote>) -> CommunicationAnalysis {
        CommunicationAnalysis {
            insight_score: 7.5,
            summary: "Participant left checkout after seeing the shipping fee.".to_string(),
            supporting_quotes: quotes,
            key_insights: vec![],
            pain_points: vec!["Unexpected shipping fee".to_string()],
            needs: vec!["Upfront total price".to_string()],
            themes: vec![],
            emotional_journey: vec![],
            recommendations: vec![],
        }
    }

    fn checkout_analysis() -> CommunicationAnalysis {
        analysis_with(vec![
            quote("The shipping fee came out of nowhere.", "shipping cost", Sentiment::Frustrated),
            quote("I just closed the tab.", "abandonment", Sentiment::Negative),
        ])
    }

    #[tokio::test]
    async fn test_generate_outline_for_checkout_objective() {
        let h = harness();
        h.backend.push_response(checkout_outline_json());

        let request = OutlineRequest {
            objective: "Understand checkout drop-off".to_string(),
            question_count: Some(5),
            ..Default::default()
        };
        let outline = generate_outline(&h.context, &request).await.unwrap();

        assert_eq!(outline.draft_outline.len(), 5);
        assert!(outline.draft_outline.iter().all(|q| q.word_count() <= 25));
        let ids: Vec<&str> = outline.draft_outline.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3", "q4", "q5"]);
        assert!(outline.localized_outline.is_none());

        let calls = h.backend.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].user_prompt.contains("Understand checkout drop-off"));
        assert!(calls[0].user_prompt.contains("exactly 5"));
        assert!(calls[0].system_prompt.contains("follow_up_count"));
    }

    #[tokio::test]
    async fn test_generate_outline_rejects_wrong_question_count_without_retry() {
        let h = harness();
        h.backend.push_response(
            json!({"questions": [{"question": "Why did you leave?", "follow_up_count": 1}]})
                .to_string(),
        );

        let request = OutlineRequest {
            objective: "Understand checkout drop-off".to_string(),
            question_count: Some(5),
            ..Default::default()
        };
        let result = generate_outline(&h.context, &request).await;

        assert!(matches!(result, Err(ServiceError::MalformedResponse { .. })));
        assert_eq!(h.backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_outline_rejects_overlong_question() {
        let h = harness();
        let long_question = "word ".repeat(30);
        h.backend.push_response(
            json!({"questions": [
                {"question": "Short question?", "follow_up_count": 0},
                {"question": long_question, "follow_up_count": 0}
            ]})
            .to_string(),
        );

        let request = OutlineRequest {
            objective: "Understand checkout drop-off".to_string(),
            question_count: Some(2),
            ..Default::default()
        };
        let result = generate_outline(&h.context, &request).await;
        assert!(matches!(result, Err(ServiceError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_generate_outline_validates_request() {
        let h = harness();
        let empty = OutlineRequest {
            question_count: Some(5),
            ..Default::default()
        };
        assert!(matches!(
            generate_outline(&h.context, &empty).await,
            Err(ServiceError::Validation(_))
        ));

        let too_many = OutlineRequest {
            objective: "Understand checkout drop-off".to_string(),
            question_count: Some(99),
            ..Default::default()
        };
        assert!(matches!(
            generate_outline(&h.context, &too_many).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(h.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_debug_language_localizes_draft_preserving_ids() {
        let h = harness();
        h.backend.push_response(checkout_outline_json());
        h.backend.push_response(
            json!({"questions": [
                {"id": "q1", "text": "Háblame de la última vez que compraste en línea."},
                {"id": "q2", "text": "¿Qué pasó cuando llegaste a la página de pago?"},
                {"id": "q3", "text": "¿Hubo un momento en que pensaste abandonar la compra?"},
                {"id": "q4", "text": "¿Cómo influyeron los costos de envío en tu decisión?"},
                {"id": "q5", "text": "¿Qué habría facilitado terminar la compra?"}
            ]})
            .to_string(),
        );

        let request = OutlineRequest {
            objective: "Understand checkout drop-off".to_string(),
            question_count: Some(5),
            debug_language: Some(Language::Spanish),
            ..Default::default()
        };
        let outline = generate_outline(&h.context, &request).await.unwrap();

        let localized = outline.localized_outline.unwrap();
        assert_eq!(localized.len(), outline.draft_outline.len());
        for (draft, translated) in outline.draft_outline.iter().zip(&localized) {
            assert_eq!(draft.id, translated.id);
            assert_eq!(draft.follow_up_count, translated.follow_up_count);
            assert_ne!(draft.text, translated.text);
        }

        let calls = h.backend.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].user_prompt.contains("Spanish"));
        assert!(calls[1].user_prompt.contains("\"q5\""));
    }

    #[tokio::test]
    async fn test_localization_rejects_reordered_ids() {
        let h = harness();
        h.backend.push_response(
            json!({"questions": [
                {"question": "Why did you stop?", "follow_up_count": 1},
                {"question": "What did shipping cost?", "follow_up_count": 1}
            ]})
            .to_string(),
        );
        h.backend.push_response(
            json!({"questions": [
                {"id": "q2", "text": "¿Cuánto costó el envío?"},
                {"id": "q1", "text": "¿Por qué te detuviste?"}
            ]})
            .to_string(),
        );

        let request = OutlineRequest {
            objective: "Understand checkout drop-off".to_string(),
            question_count: Some(2),
            debug_language: Some(Language::Spanish),
            ..Default::default()
        };
        let result = generate_outline(&h.context, &request).await;
        assert!(matches!(result, Err(ServiceError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_debug_language_equal_to_language_skips_translation() {
        let h = harness();
        h.backend.push_response(checkout_outline_json());

        let request = OutlineRequest {
            objective: "Understand checkout drop-off".to_string(),
            question_count: Some(5),
            language: Some(Language::English),
            debug_language: Some(Language::English),
            ..Default::default()
        };
        let outline = generate_outline(&h.context, &request).await.unwrap();

        assert_eq!(outline.localized_outline.as_ref(), Some(&outline.draft_outline));
        assert_eq!(h.backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_outline_attaches_to_interview() {
        let h = harness();
        let interview = interviews::create_interview(&h.context, new_interview(5))
            .await
            .unwrap();
        h.backend.push_response(checkout_outline_json());

        let request = OutlineRequest {
            objective: interview.objective.clone(),
            interview_id: Some(interview.id),
            ..Default::default()
        };
        generate_outline(&h.context, &request).await.unwrap();

        let stored = interviews::get_interview(&h.context, interview.id)
            .await
            .unwrap();
        assert_eq!(stored.draft_outline.map(|o| o.len()), Some(5));
    }

    #[tokio::test]
    async fn test_analysis_is_persisted_on_success() {
        let h = harness();
        let interview = interviews::create_interview(&h.context, new_interview(5))
            .await
            .unwrap();
        h.backend
            .push_response(serde_json::to_string(&checkout_analysis()).unwrap());

        let record = analysis::analyze_and_store(
            &h.context,
            interview.id,
            "call_1",
            "Agent: What happened at checkout?\nUser: The shipping fee came out of nowhere.",
            None,
        )
        .await
        .unwrap();

        assert_eq!(record.call_id, "call_1");
        let stored = h.context.store.list_analyses(interview.id).await.unwrap();
        assert_eq!(stored, vec![record]);
        assert!(h.backend.calls()[0].user_prompt.contains("Understand checkout drop-off"));
    }

    #[tokio::test]
    async fn test_analysis_missing_insight_score_is_rejected_and_not_persisted() {
        let h = harness();
        let interview = interviews::create_interview(&h.context, new_interview(5))
            .await
            .unwrap();
        let mut payload = serde_json::to_value(checkout_analysis()).unwrap();
        payload.as_object_mut().unwrap().remove("insightScore");
        h.backend.push_response(payload.to_string());

        let result = analysis::analyze_and_store(
            &h.context,
            interview.id,
            "call_1",
            "User: The shipping fee came out of nowhere.",
            None,
        )
        .await;

        assert!(matches!(result, Err(ServiceError::MalformedResponse { .. })));
        assert!(h.context.store.list_analyses(interview.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analysis_rejects_unknown_enum_and_out_of_range_score() {
        let h = harness();
        let mut unknown_sentiment = serde_json::to_value(checkout_analysis()).unwrap();
        unknown_sentiment["supportingQuotes"][0]["sentiment"] = json!("furious");
        h.backend.push_response(unknown_sentiment.to_string());

        let mut out_of_range = serde_json::to_value(checkout_analysis()).unwrap();
        out_of_range["insightScore"] = json!(11.0);
        h.backend.push_response(out_of_range.to_string());

        for _ in 0..2 {
            let result =
                analysis::analyze_communication(&h.context, "User: hi", "Understand checkout")
                    .await;
            assert!(matches!(result, Err(ServiceError::MalformedResponse { .. })));
        }
    }

    #[tokio::test]
    async fn test_analysis_surfaces_provider_failure() {
        let h = harness();
        h.backend.push_failure("503").push_failure("503");

        let result =
            analysis::analyze_communication(&h.context, "User: hi", "Understand checkout").await;
        assert!(matches!(result, Err(ServiceError::Provider { .. })));
        assert_eq!(h.backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_analyze_unknown_interview_does_not_call_model() {
        let h = harness();
        let result =
            analysis::analyze_and_store(&h.context, Uuid::new_v4(), "call_1", "User: hi", None)
                .await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
        assert!(h.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_or_fetch_interviewer_is_idempotent() {
        let h = harness();
        let request = NewInterviewer {
            name: "Ava".to_string(),
            agent_id: "agent_1".to_string(),
            description: "Warm and curious".to_string(),
            traits: PersonaTraits::default(),
        };

        let (first, created) =
            interviewers::create_or_fetch_interviewer(&h.context, request.clone())
                .await
                .unwrap();
        assert!(created);
        let (second, created) = interviewers::create_or_fetch_interviewer(&h.context, request)
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(
            interviewers::list_interviewers(&h.context).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_create_interviewer_validates_traits() {
        let h = harness();
        let request = NewInterviewer {
            name: "Ava".to_string(),
            agent_id: "agent_1".to_string(),
            description: String::new(),
            traits: PersonaTraits {
                empathy: 9,
                ..Default::default()
            },
        };
        let result = interviewers::create_or_fetch_interviewer(&h.context, request).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sync_interviewers_mirrors_voice_agents() {
        let h = harness();
        interviewers::create_or_fetch_interviewer(
            &h.context,
            NewInterviewer {
                name: "Retired".to_string(),
                agent_id: "agent_old".to_string(),
                description: String::new(),
                traits: PersonaTraits::default(),
            },
        )
        .await
        .unwrap();
        h.voice.set_agents(vec![
            VoiceAgent {
                agent_id: "agent_1".to_string(),
                agent_name: Some("Ava".to_string()),
            },
            VoiceAgent {
                agent_id: "agent_2".to_string(),
                agent_name: None,
            },
        ]);

        let stats = interviewers::sync_interviewers(&h.context).await.unwrap();
        assert_eq!(stats.new_added, 2);
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.current_total, 2);

        let again = interviewers::sync_interviewers(&h.context).await.unwrap();
        assert_eq!(again.new_added, 0);
        assert_eq!(again.deleted, 0);
        assert_eq!(again.current_total, 2);

        let names: Vec<String> = interviewers::list_interviewers(&h.context)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert!(names.contains(&"Ava".to_string()));
        assert!(names.contains(&"agent_2".to_string()));
    }

    #[tokio::test]
    async fn test_publish_renders_agent_prompt_and_freezes_questions() {
        let h = harness();
        let (ava, _) = interviewers::create_or_fetch_interviewer(
            &h.context,
            NewInterviewer {
                name: "Ava".to_string(),
                agent_id: "agent_1".to_string(),
                description: String::new(),
                traits: PersonaTraits::default(),
            },
        )
        .await
        .unwrap();
        let mut request = new_interview(5);
        request.interviewer_id = Some(ava.id);
        let interview = interviews::create_interview(&h.context, request)
            .await
            .unwrap();

        assert!(matches!(
            interviews::publish_interview(&h.context, interview.id).await,
            Err(ServiceError::Validation(_))
        ));

        h.backend.push_response(checkout_outline_json());
        generate_outline(
            &h.context,
            &OutlineRequest {
                objective: interview.objective.clone(),
                interview_id: Some(interview.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let published = interviews::publish_interview(&h.context, interview.id)
            .await
            .unwrap();
        assert_eq!(published.interview.status, InterviewStatus::Live);
        assert_eq!(published.interview.questions.len(), 5);
        assert!(published.agent_prompt.contains("You are Ava"));
        assert!(published.agent_prompt.contains("about 15 minutes"));
        assert!(published.agent_prompt.contains("5. What would have made finishing the purchase easier?"));

        // 上线后不能再写入大纲
        h.backend.push_response(checkout_outline_json());
        let result = generate_outline(
            &h.context,
            &OutlineRequest {
                objective: interview.objective.clone(),
                interview_id: Some(interview.id),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_interview_rejects_unknown_interviewer() {
        let h = harness();
        let mut request = new_interview(5);
        request.interviewer_id = Some(Uuid::new_v4());
        let result = interviews::create_interview(&h.context, request).await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[test]
    fn test_cluster_insights_groups_similar_themes_and_skips_singletons() {
        let interview_id = Uuid::new_v4();
        let records = vec![
            AnalysisRecord::new(
                interview_id,
                "call_a".to_string(),
                analysis_with(vec![
                    quote("Shipping was a shock.", "shipping cost", Sentiment::Frustrated),
                    quote("I like the colors.", "visual design", Sentiment::Positive),
                ]),
            ),
            AnalysisRecord::new(
                interview_id,
                "call_b".to_string(),
                analysis_with(vec![
                    quote("Why is shipping $15?", "Shipping cost surprise", Sentiment::Negative),
                    quote("Delivery fees killed it.", "shipping cost", Sentiment::Excited),
                ]),
            ),
        ];

        let insights = cluster_insights(&records);
        assert_eq!(insights.len(), 1);

        let shipping = &insights[0];
        assert_eq!(shipping.id, "ci_1");
        assert_eq!(shipping.theme, "shipping cost");
        assert_eq!(shipping.interview_count, 2);
        assert_eq!(shipping.importance, Importance::High);
        assert!((2..=4).contains(&shipping.supporting_quotes.len()));
        // 先覆盖不同通话，再按情绪强度补足
        assert_eq!(shipping.supporting_quotes[0].call_id, "call_a");
        assert_eq!(shipping.supporting_quotes[1].call_id, "call_b");
        assert_eq!(shipping.supporting_quotes[1].sentiment, Sentiment::Excited);
    }

    #[test]
    fn test_cluster_insights_caps_quotes_per_insight() {
        let interview_id = Uuid::new_v4();
        let records: Vec<AnalysisRecord> = (0..6)
            .map(|i| {
                AnalysisRecord::new(
                    interview_id,
                    format!("call_{}", i),
                    analysis_with(vec![quote(
                        &format!("Checkout was slow, attempt {}", i),
                        "slow checkout",
                        Sentiment::Negative,
                    )]),
                )
            })
            .collect();

        let insights = cluster_insights(&records);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].interview_count, 6);
        assert_eq!(insights[0].supporting_quotes.len(), 4);
    }

    #[test]
    fn test_cluster_insights_requires_two_distinct_calls() {
        let interview_id = Uuid::new_v4();
        let records = vec![
            AnalysisRecord::new(
                interview_id,
                "call_a".to_string(),
                analysis_with(vec![
                    quote("Shipping was a shock.", "shipping cost", Sentiment::Frustrated),
                    quote("The fee doubled my total.", "shipping cost", Sentiment::Negative),
                    quote("I'd never pay that shipping.", "shipping cost", Sentiment::Negative),
                ]),
            ),
            AnalysisRecord::new(
                interview_id,
                "call_b".to_string(),
                analysis_with(vec![quote(
                    "I like the colors.",
                    "visual design",
                    Sentiment::Positive,
                )]),
            ),
        ];

        assert!(cluster_insights(&records).is_empty());
        assert!(cluster_insights(&records[..1]).is_empty());
    }

    #[test]
    fn test_reanalysed_call_only_counts_latest_record() {
        let interview_id = Uuid::new_v4();
        let latest_a = AnalysisRecord::new(
            interview_id,
            "call_a".to_string(),
            analysis_with(vec![quote(
                "The page kept spinning.",
                "slow checkout",
                Sentiment::Frustrated,
            )]),
        );
        let mut stale_a = AnalysisRecord::new(
            interview_id,
            "call_a".to_string(),
            analysis_with(vec![quote(
                "Shipping was a shock.",
                "shipping cost",
                Sentiment::Frustrated,
            )]),
        );
        stale_a.created_at = latest_a.created_at - chrono::Duration::minutes(5);
        let call_b = AnalysisRecord::new(
            interview_id,
            "call_b".to_string(),
            analysis_with(vec![
                quote("Checkout took forever.", "slow checkout", Sentiment::Negative),
                quote("Why is shipping $15?", "shipping cost", Sentiment::Negative),
            ]),
        );
        let records = vec![stale_a.clone(), call_b, latest_a.clone()];

        let kept = latest_per_call(&records);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().any(|r| r.id == latest_a.id));
        assert!(kept.iter().all(|r| r.id != stale_a.id));

        let insights = cluster_insights(&records);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].theme, "slow checkout");
        assert_eq!(insights[0].interview_count, 2);
        assert!(insights[0]
            .supporting_quotes
            .iter()
            .all(|q| q.quote != "Shipping was a shock."));
    }

    async fn interview_with_two_calls(h: &Harness) -> Uuid {
        let interview = interviews::create_interview(&h.context, new_interview(5))
            .await
            .unwrap();
        for call_id in ["call_a", "call_b"] {
            h.context
                .store
                .insert_analysis(AnalysisRecord::new(
                    interview.id,
                    call_id.to_string(),
                    checkout_analysis(),
                ))
                .await
                .unwrap();
        }
        interview.id
    }

    #[tokio::test]
    async fn test_synthesize_interview_writes_report() {
        let h = harness();
        let interview_id = interview_with_two_calls(&h).await;
        h.backend.push_response(
            json!({
                "executive_summary": "Unexpected shipping fees drive most checkout abandonment.",
                "objective_deliverables": [
                    {"type": "finding", "title": "Shipping surprise", "detail": "Both participants left at the shipping fee."},
                    {"type": "recommendation", "title": "Show shipping early", "rationale": "Removes the surprise", "priority": "high"},
                    {"type": "metric", "label": "Abandoned at shipping", "value": "2 of 2", "context": "analysed calls"}
                ]
            })
            .to_string(),
        );

        let interview = synthesis::synthesize_interview(&h.context, interview_id)
            .await
            .unwrap();

        assert_eq!(
            interview.executive_summary.as_deref(),
            Some("Unexpected shipping fees drive most checkout abandonment.")
        );
        assert_eq!(interview.objective_deliverables.len(), 3);
        assert_eq!(interview.cross_interview_insights.len(), 2);
        assert_eq!(interview.insights.len(), 2);
        assert!(!interview.quotes.is_empty());
        assert!(interview
            .cross_interview_insights
            .iter()
            .flat_map(|i| &i.supporting_quotes)
            .all(|q| q.call_id == "call_a" || q.call_id == "call_b"));

        let calls = h.backend.calls();
        assert!(calls[0].user_prompt.contains("Number of analysed interviews: 2"));

        let stored = interviews::get_interview(&h.context, interview_id)
            .await
            .unwrap();
        assert_eq!(stored, interview);
    }

    #[tokio::test]
    async fn test_synthesize_rejects_invalid_deliverable_and_keeps_interview() {
        let h = harness();
        let interview_id = interview_with_two_calls(&h).await;
        h.backend.push_response(
            json!({
                "executive_summary": "Shipping fees hurt conversion.",
                "objective_deliverables": [{"type": "finding", "title": "", "detail": "x"}]
            })
            .to_string(),
        );

        let result = synthesis::synthesize_interview(&h.context, interview_id).await;
        assert!(matches!(result, Err(ServiceError::MalformedResponse { .. })));

        let stored = interviews::get_interview(&h.context, interview_id)
            .await
            .unwrap();
        assert!(stored.executive_summary.is_none());
        assert!(stored.cross_interview_insights.is_empty());
    }

    #[tokio::test]
    async fn test_synthesize_requires_analyses() {
        let h = harness();
        let interview = interviews::create_interview(&h.context, new_interview(5))
            .await
            .unwrap();
        let result = synthesis::synthesize_interview(&h.context, interview.id).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
