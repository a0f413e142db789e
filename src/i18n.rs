use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 访谈语言
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default, JsonSchema)]
pub enum Language {
    #[serde(rename = "en")]
    #[default]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "nl")]
    Dutch,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "zh")]
    Chinese,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" | "en-us" | "en-gb" => Ok(Language::English),
            "es" | "spanish" | "español" | "es-es" => Ok(Language::Spanish),
            "fr" | "french" | "français" | "fr-fr" => Ok(Language::French),
            "de" | "german" | "deutsch" | "de-de" => Ok(Language::German),
            "pt" | "portuguese" | "português" | "pt-br" => Ok(Language::Portuguese),
            "it" | "italian" | "italiano" => Ok(Language::Italian),
            "nl" | "dutch" | "nederlands" => Ok(Language::Dutch),
            "ja" | "japanese" | "日本語" => Ok(Language::Japanese),
            "ko" | "korean" | "한국어" => Ok(Language::Korean),
            "zh" | "chinese" | "中文" | "zh-cn" => Ok(Language::Chinese),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

impl Language {
    /// ISO 639-1 语言代码
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Portuguese => "pt",
            Language::Italian => "it",
            Language::Dutch => "nl",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Chinese => "zh",
        }
    }

    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Español",
            Language::French => "Français",
            Language::German => "Deutsch",
            Language::Portuguese => "Português",
            Language::Italian => "Italiano",
            Language::Dutch => "Nederlands",
            Language::Japanese => "日本語",
            Language::Korean => "한국어",
            Language::Chinese => "中文",
        }
    }

    /// 英文名称，用于拼装提示词
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Portuguese => "Portuguese",
            Language::Italian => "Italian",
            Language::Dutch => "Dutch",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::Chinese => "Chinese (Simplified)",
        }
    }

    /// 获取语言的提示词指令
    pub fn prompt_instruction(&self) -> String {
        match self {
            Language::English => {
                "Write every interview question in natural, conversational English.".to_string()
            }
            other => format!(
                "Write every interview question in natural, conversational {}. Do not mix in English unless a product or brand name requires it.",
                other.english_name()
            ),
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Language::English,
            Language::Spanish,
            Language::French,
            Language::German,
            Language::Portuguese,
            Language::Italian,
            Language::Dutch,
            Language::Japanese,
            Language::Korean,
            Language::Chinese,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::Language;

    #[test]
    fn test_language_from_str_accepts_codes_and_names() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!("Español".parse::<Language>().unwrap(), Language::Spanish);
        assert_eq!("pt-BR".parse::<Language>().unwrap(), Language::Portuguese);
        assert_eq!(" zh ".parse::<Language>().unwrap(), Language::Chinese);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_serde_uses_codes() {
        let json = serde_json::to_string(&Language::German).unwrap();
        assert_eq!(json, "\"de\"");
        let parsed: Language = serde_json::from_str("\"ja\"").unwrap();
        assert_eq!(parsed, Language::Japanese);
    }

    #[test]
    fn test_display_round_trips_every_language() {
        for language in Language::all() {
            assert_eq!(language.to_string().parse::<Language>().unwrap(), *language);
        }
    }

    #[test]
    fn test_prompt_instruction_names_language() {
        assert!(Language::French.prompt_instruction().contains("French"));
        assert!(Language::English.prompt_instruction().contains("English"));
    }
}
