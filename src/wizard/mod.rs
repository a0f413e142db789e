//! 访谈创建向导 - 与界面框架无关的有限状态机
//!
//! 步骤依次为 details -> generate -> questions -> distribute。
//! 状态机只决定能否进入某一步以及进入后需要触发的副作用，
//! 副作用（如调用大纲生成服务）由调用方执行后再回填结果。

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::i18n::Language;
use crate::services::outline::{GeneratedOutline, OutlineRequest};
use crate::types::interview::{NewInterview, Question, check_outline_alignment};

/// 向导步骤，顺序即流程顺序
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Details,
    Generate,
    Questions,
    Distribute,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Details,
        WizardStep::Generate,
        WizardStep::Questions,
        WizardStep::Distribute,
    ];

    pub fn route(&self) -> &'static str {
        match self {
            WizardStep::Details => "/create-interview",
            WizardStep::Generate => "/outline",
            WizardStep::Questions => "/questions",
            WizardStep::Distribute => "/distribute",
        }
    }

    pub fn from_route(route: &str) -> Option<Self> {
        let route = route.trim().trim_end_matches('/');
        Self::ALL.into_iter().find(|step| step.route() == route)
    }

    /// 当前步骤之前的全部步骤
    pub fn predecessors(&self) -> impl Iterator<Item = WizardStep> + '_ {
        Self::ALL.into_iter().take_while(move |step| step < self)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::Details => "details",
            WizardStep::Generate => "generate",
            WizardStep::Questions => "questions",
            WizardStep::Distribute => "distribute",
        };
        write!(f, "{}", name)
    }
}

/// 向导错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("unknown wizard route `{0}`")]
    UnknownRoute(String),

    #[error("an outline generation is already running: {0}")]
    Busy(String),

    #[error("no outline generation is running")]
    NotGenerating,

    #[error("question index {0} is out of range")]
    QuestionIndex(usize),

    #[error("question text must not be empty")]
    EmptyQuestion,

    #[error("outline is misaligned: {0}")]
    Misaligned(String),
}

/// 向导中正在编辑的访谈信息
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InterviewDraft {
    pub name: String,
    pub objective: String,
    pub question_count: u8,
    pub duration_mins: u32,
    pub is_anonymous: bool,
    pub language: Language,
    pub debug_language: Option<Language>,
    pub interviewer_id: Option<Uuid>,
}

impl Default for InterviewDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            objective: String::new(),
            question_count: 5,
            duration_mins: 10,
            is_anonymous: false,
            language: Language::default(),
            debug_language: None,
            interviewer_id: None,
        }
    }
}

/// 进入步骤后需要调用方执行的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    GenerateOutline(OutlineRequest),
}

/// 一次导航的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    /// 已进入目标步骤
    Entered {
        step: WizardStep,
        effect: Option<Effect>,
    },
    /// 前置条件不满足，被重定向到其他步骤
    Redirected {
        requested: WizardStep,
        to: WizardStep,
    },
    /// 越过未完成的步骤，状态保持不变
    Refused {
        requested: WizardStep,
        blocked_by: WizardStep,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WizardState {
    pub current: WizardStep,
    pub draft: InterviewDraft,
    pub draft_questions: Vec<Question>,
    pub localized_questions: Option<Vec<Question>>,
    pub completed_steps: BTreeSet<WizardStep>,
    /// 忙碌时的状态提示
    pub busy: Option<String>,
    pub last_error: Option<String>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new(InterviewDraft::default())
    }
}

impl WizardState {
    pub fn new(draft: InterviewDraft) -> Self {
        Self {
            current: WizardStep::Details,
            draft,
            draft_questions: Vec::new(),
            localized_questions: None,
            completed_steps: BTreeSet::new(),
            busy: None,
            last_error: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    /// 离开某一步骤所需的条件是否满足
    fn step_satisfied(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Details => !self.draft.name.trim().is_empty(),
            WizardStep::Generate => !self.draft_questions.is_empty() && !self.is_busy(),
            WizardStep::Questions => !self.draft_questions.is_empty(),
            WizardStep::Distribute => true,
        }
    }

    /// 导航到指定步骤
    pub fn navigate(&mut self, target: WizardStep) -> Navigation {
        if target == WizardStep::Generate && self.draft.name.trim().is_empty() {
            self.current = WizardStep::Details;
            return Navigation::Redirected {
                requested: target,
                to: WizardStep::Details,
            };
        }

        if target > self.current
            && let Some(blocked_by) = target.predecessors().find(|step| {
                let reached = *step == self.current || self.completed_steps.contains(step);
                !(reached && self.step_satisfied(*step))
            })
        {
            return Navigation::Refused {
                requested: target,
                blocked_by,
            };
        }

        self.completed_steps.extend(target.predecessors());
        self.current = target;

        let effect = match target {
            WizardStep::Generate if self.draft_questions.is_empty() && !self.is_busy() => {
                Some(Effect::GenerateOutline(self.outline_request()))
            }
            _ => None,
        };
        Navigation::Entered {
            step: target,
            effect,
        }
    }

    /// 按路由导航
    pub fn navigate_path(&mut self, route: &str) -> Result<Navigation, WizardError> {
        let step = WizardStep::from_route(route)
            .ok_or_else(|| WizardError::UnknownRoute(route.to_string()))?;
        Ok(self.navigate(step))
    }

    /// 当前草稿对应的大纲生成请求
    pub fn outline_request(&self) -> OutlineRequest {
        OutlineRequest {
            objective: self.draft.objective.clone(),
            language: Some(self.draft.language),
            question_count: Some(self.draft.question_count),
            debug_language: self.draft.debug_language,
            interview_id: None,
        }
    }

    /// 丢弃已生成的问题并重新请求生成
    pub fn regenerate(&mut self) -> Result<Effect, WizardError> {
        if let Some(message) = &self.busy {
            return Err(WizardError::Busy(message.clone()));
        }
        self.draft_questions.clear();
        self.localized_questions = None;
        self.completed_steps.retain(|step| *step < WizardStep::Generate);
        self.current = WizardStep::Generate;
        Ok(Effect::GenerateOutline(self.outline_request()))
    }

    pub fn begin_generation(&mut self, message: impl Into<String>) -> Result<(), WizardError> {
        if let Some(current) = &self.busy {
            return Err(WizardError::Busy(current.clone()));
        }
        self.busy = Some(message.into());
        self.last_error = None;
        Ok(())
    }

    /// 回填生成结果
    pub fn finish_generation(&mut self, outline: GeneratedOutline) -> Result<(), WizardError> {
        if self.busy.is_none() {
            return Err(WizardError::NotGenerating);
        }
        if let Some(localized) = &outline.localized_outline {
            check_outline_alignment(&outline.draft_outline, localized)
                .map_err(WizardError::Misaligned)?;
        }
        self.draft_questions = outline.draft_outline;
        self.localized_questions = outline.localized_outline;
        self.busy = None;
        Ok(())
    }

    pub fn fail_generation(&mut self, error: impl Into<String>) {
        self.busy = None;
        self.last_error = Some(error.into());
    }

    /// 修改问题正文；本地化版本保持原样，仅id对齐
    pub fn edit_question(&mut self, index: usize, text: &str) -> Result<(), WizardError> {
        if text.trim().is_empty() {
            return Err(WizardError::EmptyQuestion);
        }
        let question = self
            .draft_questions
            .get_mut(index)
            .ok_or(WizardError::QuestionIndex(index))?;
        question.text = text.trim().to_string();
        Ok(())
    }

    pub fn set_follow_up_count(&mut self, index: usize, count: u32) -> Result<(), WizardError> {
        self.draft_questions
            .get_mut(index)
            .ok_or(WizardError::QuestionIndex(index))?
            .follow_up_count = count;
        if let Some(localized) = self.localized_questions.as_mut()
            && let Some(question) = localized.get_mut(index)
        {
            question.follow_up_count = count;
        }
        Ok(())
    }

    /// 追加问题，本地化版本同步追加以保持对齐
    pub fn add_question(
        &mut self,
        text: &str,
        follow_up_count: u32,
    ) -> Result<Question, WizardError> {
        if text.trim().is_empty() {
            return Err(WizardError::EmptyQuestion);
        }
        let next_id = self
            .draft_questions
            .iter()
            .filter_map(|q| q.id.strip_prefix('q')?.parse::<usize>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let question = Question::new(format!("q{}", next_id), text.trim(), follow_up_count);
        self.draft_questions.push(question.clone());
        if let Some(localized) = self.localized_questions.as_mut() {
            localized.push(question.clone());
        }
        Ok(question)
    }

    pub fn remove_question(&mut self, index: usize) -> Result<Question, WizardError> {
        if index >= self.draft_questions.len() {
            return Err(WizardError::QuestionIndex(index));
        }
        let removed = self.draft_questions.remove(index);
        if let Some(localized) = self.localized_questions.as_mut()
            && index < localized.len()
        {
            localized.remove(index);
        }
        Ok(removed)
    }

    /// 在分发步骤生成创建访谈的请求
    pub fn to_new_interview(&self, organization_id: &str, user_id: &str) -> NewInterview {
        NewInterview {
            organization_id: organization_id.to_string(),
            user_id: user_id.to_string(),
            name: self.draft.name.trim().to_string(),
            objective: self.draft.objective.trim().to_string(),
            question_count: self.draft_questions.len().min(u8::MAX as usize) as u8,
            duration_mins: self.draft.duration_mins,
            is_anonymous: self.draft.is_anonymous,
            language: self.draft.language,
            interviewer_id: self.draft.interviewer_id,
        }
    }

    /// 当前编辑结果，可直接写入访谈草稿
    pub fn outline(&self) -> GeneratedOutline {
        GeneratedOutline {
            draft_outline: self.draft_questions.clone(),
            localized_outline: self.localized_questions.clone(),
        }
    }
}
