use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 引用类型
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuoteType {
    Insight,
    PainPoint,
    Need,
    Behavior,
}

/// 情绪倾向
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Frustrated,
    Excited,
}

impl Sentiment {
    /// 情绪强度，用于挑选代表性引用
    pub fn intensity(&self) -> u8 {
        match self {
            Sentiment::Frustrated | Sentiment::Excited => 3,
            Sentiment::Negative | Sentiment::Positive => 2,
            Sentiment::Neutral => 1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    Medium,
    High,
}

/// 建议所属类别
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Product,
    Experience,
    Communication,
    Process,
    Pricing,
}

/// 情绪旅程阶段
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JourneyPhase {
    Beginning,
    Middle,
    End,
}

/// 受访者原话
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct Quote {
    /// 原话，逐字摘录
    pub quote: String,
    #[serde(rename = "type")]
    pub quote_type: QuoteType,
    pub sentiment: Sentiment,
    /// 所属主题，简短名词短语
    pub theme: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct KeyInsight {
    pub insight: String,
    pub importance: Importance,
}

/// 聚类后的主题
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct Theme {
    pub theme: String,
    /// 出现频度，1-5
    pub frequency: u8,
    pub sentiment: Sentiment,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct EmotionalMoment {
    pub phase: JourneyPhase,
    pub emotion: String,
    pub sentiment: Sentiment,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct Recommendation {
    pub recommendation: String,
    pub category: RecommendationCategory,
    pub importance: Importance,
}

/// 单次通话的结构化分析结果
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationAnalysis {
    /// 洞察价值评分，0-10
    pub insight_score: f64,
    pub summary: String,
    pub supporting_quotes: Vec<Quote>,
    pub key_insights: Vec<KeyInsight>,
    pub pain_points: Vec<String>,
    pub needs: Vec<String>,
    pub themes: Vec<Theme>,
    pub emotional_journey: Vec<EmotionalMoment>,
    pub recommendations: Vec<Recommendation>,
}

impl CommunicationAnalysis {
    pub const MIN_SCORE: f64 = 0.0;
    pub const MAX_SCORE: f64 = 10.0;

    /// 校验枚举之外的约束，返回首个违例的描述
    pub fn check(&self) -> Result<(), String> {
        if !self.insight_score.is_finite()
            || self.insight_score < Self::MIN_SCORE
            || self.insight_score > Self::MAX_SCORE
        {
            return Err(format!(
                "insightScore {} is outside [{}, {}]",
                self.insight_score,
                Self::MIN_SCORE,
                Self::MAX_SCORE
            ));
        }
        if self.summary.trim().is_empty() {
            return Err("summary is empty".to_string());
        }
        if let Some(quote) = self.supporting_quotes.iter().find(|q| q.quote.trim().is_empty()) {
            return Err(format!("quote under theme `{}` is empty", quote.theme));
        }
        if let Some(theme) = self
            .themes
            .iter()
            .find(|t| !(1..=5).contains(&t.frequency))
        {
            return Err(format!(
                "theme `{}` has frequency {} outside 1-5",
                theme.theme, theme.frequency
            ));
        }
        Ok(())
    }
}

/// 已持久化的分析记录，创建后不可修改
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub call_id: String,
    pub created_at: DateTime<Utc>,
    pub analysis: CommunicationAnalysis,
}

impl AnalysisRecord {
    pub fn new(interview_id: Uuid, call_id: String, analysis: CommunicationAnalysis) -> Self {
        Self {
            id: Uuid::new_v4(),
            interview_id,
            call_id,
            created_at: Utc::now(),
            analysis,
        }
    }
}
