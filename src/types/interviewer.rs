use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 访谈官人设特征，取值 1-5
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PersonaTraits {
    pub empathy: u8,
    pub exploration: u8,
    pub rapport: u8,
    pub speed: u8,
}

impl Default for PersonaTraits {
    fn default() -> Self {
        Self {
            empathy: 3,
            exploration: 3,
            rapport: 3,
            speed: 3,
        }
    }
}

impl PersonaTraits {
    pub fn check(&self) -> Result<(), String> {
        let traits = [
            ("empathy", self.empathy),
            ("exploration", self.exploration),
            ("rapport", self.rapport),
            ("speed", self.speed),
        ];
        match traits.iter().find(|(_, v)| !(1..=5).contains(v)) {
            Some((name, value)) => Err(format!("trait `{}` = {} is outside 1-5", name, value)),
            None => Ok(()),
        }
    }
}

/// 创建访谈官的请求
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewInterviewer {
    pub name: String,
    /// 语音服务中的Agent标识
    pub agent_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub traits: PersonaTraits,
}

impl NewInterviewer {
    pub fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("interviewer name is required".to_string());
        }
        if self.agent_id.trim().is_empty() {
            return Err("interviewer agent_id is required".to_string());
        }
        self.traits.check()
    }
}

/// 访谈官记录，`name` 全局唯一
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Interviewer {
    pub id: Uuid,
    pub agent_id: String,
    pub name: String,
    pub description: String,
    pub traits: PersonaTraits,
    pub created_at: DateTime<Utc>,
}

impl Interviewer {
    pub fn new(request: NewInterviewer) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent_id: request.agent_id,
            name: request.name.trim().to_string(),
            description: request.description,
            traits: request.traits,
            created_at: Utc::now(),
        }
    }

    /// 唯一性约束使用的规范化名称
    pub fn unique_key(name: &str) -> String {
        name.trim().to_lowercase()
    }
}

/// 与语音服务同步的统计
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStats {
    pub new_added: usize,
    pub deleted: usize,
    pub current_total: usize,
}
