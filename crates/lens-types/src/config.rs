use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub llm: LlmConfig,
    #[serde(default)]
    pub models: ModelPresets,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub theme: Theme,
}

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub api_base: Option<String>,
}

impl LlmConfig {
    pub fn base_url(&self) -> &str {
        self.api_base
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }
}

/// Model identifiers the selector and voice adapters pick from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPresets {
    /// High-capability model for creative/analytical prompts
    pub reasoning: String,
    /// Mid-tier model used together with web search
    pub search: String,
    /// Low-latency model for short utterances
    pub fast: String,
    pub balanced: String,
    pub transcription: String,
    pub speech: String,
    /// Extended thinking budget granted to the reasoning model
    pub reasoning_budget: u32,
}

impl Default for ModelPresets {
    fn default() -> Self {
        Self {
            reasoning: "gemini-2.5-pro".to_string(),
            search: "gemini-2.5-flash".to_string(),
            fast: "gemini-flash-lite-latest".to_string(),
            balanced: "gemini-2.5-flash".to_string(),
            transcription: "gemini-2.5-flash".to_string(),
            speech: "gemini-2.5-flash-preview-tts".to_string(),
            reasoning_budget: 32768,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Local storage when the browser exposes it, memory otherwise
    #[default]
    Auto,
    Memory,
    LocalStorage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    NeonBlue,
    VioletFlux,
    CyberCrimson,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Theme::NeonBlue, Theme::VioletFlux, Theme::CyberCrimson]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::NeonBlue => "Neon Blue",
            Theme::VioletFlux => "Violet Flux",
            Theme::CyberCrimson => "Cyber Crimson",
        }
    }
}
