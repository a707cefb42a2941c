pub mod chat;
use serde::{ Deserialize, Serialize };
use std::str::FromStr;
use std::fmt;

/// Keys shipped in sample `.env` files. Treated the same as no key at all.
pub const PLACEHOLDER_API_KEYS: &[&str] = &[
    "your_openai_api_key_here",
    "your-api-key-here",
    "sk-placeholder",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmType {
    OpenAI,
    Groq,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseLlmTypeError {
    message: String,
}

impl fmt::Display for ParseLlmTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseLlmTypeError {}

impl LlmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmType::OpenAI => "openai",
            LlmType::Groq => "groq",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmType::OpenAI => "gpt-4o-mini",
            LlmType::Groq => "llama-3.1-8b-instant",
        }
    }

    /// Root of the OpenAI-compatible API; `/v1/chat/completions` is appended.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmType::OpenAI => "https://api.openai.com",
            LlmType::Groq => "https://api.groq.com/openai",
        }
    }
}

impl fmt::Display for LlmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LlmType {
    type Err = ParseLlmTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LlmType::OpenAI),
            "groq" => Ok(LlmType::Groq),
            _ =>
                Err(ParseLlmTypeError {
                    message: format!("Invalid LLM type: '{}'", s),
                }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub llm_type: LlmType,
    pub api_key: Option<String>,
    pub completion_model: Option<String>,
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_type: LlmType::OpenAI,
            api_key: None,
            completion_model: None,
            base_url: None,
        }
    }
}

/// Returns the key only when it is a real credential.
pub fn usable_api_key(raw: &str) -> Option<String> {
    let key = raw.trim();
    if key.is_empty() || PLACEHOLDER_API_KEYS.contains(&key) {
        None
    } else {
        Some(key.to_string())
    }
}
