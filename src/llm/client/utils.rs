use crate::config::LLMConfig;

/// 超过该长度的提示词直接交给高质量模型
pub const LONG_PROMPT_BYTES: usize = 32 * 1024;

/// 选择首选模型及其兜底模型
pub fn evaluate_befitting_model(
    llm_config: &LLMConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> (String, Option<String>) {
    let prompt_bytes = system_prompt.len() + user_prompt.len();
    if prompt_bytes > LONG_PROMPT_BYTES {
        (llm_config.model_powerful.clone(), None)
    } else {
        (
            llm_config.model_efficient.clone(),
            Some(llm_config.model_powerful.clone()),
        )
    }
}
