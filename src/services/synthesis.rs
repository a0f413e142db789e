//! 跨访谈归纳
//!
//! 先按主题相似度把各通电话的引用聚类，得到可追溯到具体通话的跨访谈洞察；
//! 再让模型基于这些洞察撰写执行摘要与研究交付物。

use std::collections::{BTreeSet, HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::prompts::{PromptTemplate, TemplateParams, templates};
use crate::services::context::ServiceContext;
use crate::services::task::StructuredTask;
use crate::types::analysis::{AnalysisRecord, Importance, Sentiment};
use crate::types::interview::{
    CrossInterviewInsight, Interview, ObjectiveDeliverable, SupportingQuote,
};

/// 主题归入同一簇所需的最小Jaccard相似度
const THEME_SIMILARITY_THRESHOLD: f64 = 0.5;
const MIN_QUOTES_PER_INSIGHT: usize = 2;
/// 洞察必须来自至少两通不同的电话
const MIN_CALLS_PER_INSIGHT: usize = 2;
const MAX_QUOTES_PER_INSIGHT: usize = 4;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "the", "of", "to", "in", "on", "for", "with", "at", "by", "or", "is", "are",
    "was", "be", "it", "its", "as", "from", "about",
];

/// 主题词集合：小写、按非字母数字切分、去停用词
fn theme_tokens(theme: &str) -> BTreeSet<String> {
    let lowered = theme.trim().to_lowercase();
    let tokens: BTreeSet<String> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect();
    if !tokens.is_empty() {
        return tokens;
    }
    // 纯停用词或非拉丁分词的主题整体作为一个词
    if lowered.is_empty() {
        BTreeSet::from(["general".to_string()])
    } else {
        BTreeSet::from([lowered])
    }
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// 由覆盖率推导重要度
fn importance_for(interview_count: usize, total_interviews: usize) -> Importance {
    if total_interviews == 0 {
        return Importance::Low;
    }
    let coverage = interview_count as f64 / total_interviews as f64;
    if coverage >= 0.6 {
        Importance::High
    } else if coverage >= 0.3 {
        Importance::Medium
    } else {
        Importance::Low
    }
}

#[derive(Debug, Clone)]
struct ThemeCluster {
    theme: String,
    tokens: BTreeSet<String>,
    quotes: Vec<SupportingQuote>,
    calls: BTreeSet<String>,
}

impl ThemeCluster {
    fn dominant_sentiment(&self) -> Sentiment {
        let order = [
            Sentiment::Frustrated,
            Sentiment::Negative,
            Sentiment::Neutral,
            Sentiment::Positive,
            Sentiment::Excited,
        ];
        order
            .into_iter()
            .max_by_key(|s| {
                let count = self.quotes.iter().filter(|q| q.sentiment == *s).count();
                // 数量相同时取更靠前（更负面）的情绪
                (count, std::cmp::Reverse(order.iter().position(|o| o == s)))
            })
            .unwrap_or(Sentiment::Neutral)
    }

    /// 挑选2-4条代表性引用：优先覆盖不同通话，其次情绪强度
    fn representative_quotes(&self) -> Vec<SupportingQuote> {
        let mut ranked: Vec<&SupportingQuote> = self.quotes.iter().collect();
        ranked.sort_by_key(|q| std::cmp::Reverse(q.sentiment.intensity()));

        let mut picked: Vec<SupportingQuote> = Vec::new();
        let mut seen_calls: HashSet<&str> = HashSet::new();
        let mut seen_text: HashSet<(&str, String)> = HashSet::new();

        for distinct_calls_only in [true, false] {
            for quote in &ranked {
                if picked.len() >= MAX_QUOTES_PER_INSIGHT {
                    break;
                }
                let text_key = (quote.call_id.as_str(), quote.quote.trim().to_lowercase());
                if seen_text.contains(&text_key) {
                    continue;
                }
                if distinct_calls_only && seen_calls.contains(quote.call_id.as_str()) {
                    continue;
                }
                seen_calls.insert(quote.call_id.as_str());
                seen_text.insert(text_key);
                picked.push((*quote).clone());
            }
        }
        picked
    }
}

/// 每通电话只保留最新的一次分析，创建时间相同时以后插入者为准
pub fn latest_per_call(records: &[AnalysisRecord]) -> Vec<AnalysisRecord> {
    let mut latest: HashMap<&str, &AnalysisRecord> = HashMap::new();
    for record in records {
        match latest.get(record.call_id.as_str()) {
            Some(kept) if kept.created_at > record.created_at => {}
            _ => {
                latest.insert(record.call_id.as_str(), record);
            }
        }
    }
    let mut kept: Vec<AnalysisRecord> = latest.into_values().cloned().collect();
    kept.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.call_id.cmp(&b.call_id)));
    kept
}

/// 把多通电话的分析聚合为跨访谈洞察，按重要度排序
pub fn cluster_insights(records: &[AnalysisRecord]) -> Vec<CrossInterviewInsight> {
    let records = latest_per_call(records);
    let total_interviews = records
        .iter()
        .map(|r| r.call_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let mut clusters: Vec<ThemeCluster> = Vec::new();
    for record in &records {
        for quote in &record.analysis.supporting_quotes {
            let tokens = theme_tokens(&quote.theme);
            let supporting = SupportingQuote {
                call_id: record.call_id.clone(),
                quote: quote.quote.trim().to_string(),
                quote_type: quote.quote_type,
                sentiment: quote.sentiment,
            };

            let best = clusters
                .iter_mut()
                .map(|c| (jaccard(&tokens, &c.tokens), c))
                .filter(|(score, _)| *score >= THEME_SIMILARITY_THRESHOLD)
                .max_by(|a, b| a.0.total_cmp(&b.0));

            match best {
                Some((_, cluster)) => {
                    cluster.calls.insert(record.call_id.clone());
                    cluster.quotes.push(supporting);
                }
                None => clusters.push(ThemeCluster {
                    theme: quote.theme.trim().to_string(),
                    tokens,
                    quotes: vec![supporting],
                    calls: BTreeSet::from([record.call_id.clone()]),
                }),
            }
        }
    }

    let mut ranked: Vec<(Importance, Vec<SupportingQuote>, ThemeCluster)> = clusters
        .into_iter()
        .filter(|c| c.calls.len() >= MIN_CALLS_PER_INSIGHT)
        .map(|c| {
            let importance = importance_for(c.calls.len(), total_interviews);
            (importance, c.representative_quotes(), c)
        })
        .filter(|(_, quotes, _)| {
            let calls: HashSet<&str> = quotes.iter().map(|q| q.call_id.as_str()).collect();
            quotes.len() >= MIN_QUOTES_PER_INSIGHT && calls.len() >= MIN_CALLS_PER_INSIGHT
        })
        .collect();
    ranked.sort_by(|(ia, _, a), (ib, _, b)| {
        ib.cmp(ia)
            .then(b.calls.len().cmp(&a.calls.len()))
            .then(b.quotes.len().cmp(&a.quotes.len()))
            .then(a.theme.cmp(&b.theme))
    });

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (importance, supporting_quotes, cluster))| {
            let interview_count = cluster.calls.len();
            let insight = format!(
                "{}: raised in {} of {} interviews, mostly {}",
                cluster.theme,
                interview_count,
                total_interviews,
                sentiment_label(cluster.dominant_sentiment())
            );
            CrossInterviewInsight {
                id: format!("ci_{}", index + 1),
                theme: cluster.theme.clone(),
                insight,
                importance,
                interview_count,
                supporting_quotes,
            }
        })
        .collect()
}

fn sentiment_label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "positive",
        Sentiment::Negative => "negative",
        Sentiment::Neutral => "neutral",
        Sentiment::Frustrated => "frustrated",
        Sentiment::Excited => "excited",
    }
}

/// 模型撰写的研究结论
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct SynthesisReport {
    /// 不超过150词的执行摘要
    pub executive_summary: String,
    pub objective_deliverables: Vec<ObjectiveDeliverable>,
}

pub struct InsightSynthesisTask {
    pub objective: String,
    pub interview_count: usize,
    pub insights: Vec<CrossInterviewInsight>,
}

impl InsightSynthesisTask {
    fn format_insights(&self) -> String {
        if self.insights.is_empty() {
            return "No theme was raised in more than one interview.".to_string();
        }
        let mut content = String::new();
        for (i, insight) in self.insights.iter().enumerate() {
            content.push_str(&format!(
                "{}. [{}] {}\n",
                i + 1,
                importance_label(insight.importance),
                insight.insight
            ));
            for quote in &insight.supporting_quotes {
                content.push_str(&format!(
                    "   - \"{}\" ({}, {})\n",
                    quote.quote,
                    quote.call_id,
                    sentiment_label(quote.sentiment)
                ));
            }
        }
        content
    }
}

fn importance_label(importance: Importance) -> &'static str {
    match importance {
        Importance::Low => "low",
        Importance::Medium => "medium",
        Importance::High => "high",
    }
}

impl StructuredTask for InsightSynthesisTask {
    type Output = SynthesisReport;

    fn task_name(&self) -> &'static str {
        "synthesize_insights"
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate {
            system_prompt: templates::INSIGHT_SYNTHESIS_SYSTEM,
            user_prompt: templates::INSIGHT_SYNTHESIS_USER,
        }
    }

    fn prompt_params(&self) -> TemplateParams {
        TemplateParams::new()
            .with("objective", self.objective.trim())
            .with("interview_count", self.interview_count)
            .with("insights", self.format_insights())
    }

    fn validate(&self, output: &SynthesisReport) -> Result<(), String> {
        if output.executive_summary.trim().is_empty() {
            return Err("executive_summary is empty".to_string());
        }
        output
            .objective_deliverables
            .iter()
            .try_for_each(ObjectiveDeliverable::check)
    }
}

/// 聚合某次访谈的全部分析记录，并把结论写回访谈记录
pub async fn synthesize_interview(
    context: &ServiceContext,
    interview_id: Uuid,
) -> ServiceResult<Interview> {
    let mut interview = context.store.get_interview(interview_id).await?;
    let records = latest_per_call(&context.store.list_analyses(interview_id).await?);
    if records.is_empty() {
        return Err(ServiceError::validation(format!(
            "interview {} has no analysed calls yet",
            interview_id
        )));
    }

    let insights = cluster_insights(&records);
    let known_calls: HashSet<String> = records.iter().map(|r| r.call_id.clone()).collect();
    tracing::info!(
        %interview_id,
        calls = known_calls.len(),
        insights = insights.len(),
        "clustered cross-interview insights"
    );

    let task = InsightSynthesisTask {
        objective: interview.objective.clone(),
        interview_count: known_calls.len(),
        insights: insights.clone(),
    };
    let report = task.execute(&context.llm_client).await?;

    let mut quotes: Vec<SupportingQuote> = Vec::new();
    for quote in insights.iter().flat_map(|i| &i.supporting_quotes) {
        if !quotes.contains(quote) {
            quotes.push(quote.clone());
        }
    }
    interview.insights = insights.iter().map(|i| i.insight.clone()).collect();
    interview.quotes = quotes;
    interview.cross_interview_insights = insights;
    interview.executive_summary = Some(report.executive_summary.trim().to_string());
    interview.objective_deliverables = report.objective_deliverables;
    interview.updated_at = chrono::Utc::now();

    interview
        .check_insight_references(&known_calls)
        .map_err(|reason| ServiceError::Store(anyhow::anyhow!(reason)))?;

    context.store.update_interview(interview).await
}
