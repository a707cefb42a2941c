use async_trait::async_trait;
use log::debug;
use reqwest::{Client as HttpClient, header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION}};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

use super::{ChatClient, CompletionRequest, CompletionResponse, WireMessage};
use crate::llm::LlmConfig;

/// Client for any service exposing the OpenAI chat-completions API
/// (OpenAI itself, Groq's `/openai` endpoint).
pub struct OpenAIChatClient {
    http: HttpClient,
    provider: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: WireMessage,
}

impl OpenAIChatClient {
    pub fn new(
        provider: impl Into<String>,
        api_key: String,
        model: String,
        base_url: String,
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| format!("Invalid API key format: {}", e))?
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            provider: provider.into(),
            model,
            base_url,
        })
    }

    /// Fills model and base URL from the provider's defaults when unset.
    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let provider = config.llm_type.to_string();
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| format!("{} API key is required", provider))?;

        Self::new(
            provider,
            api_key,
            config.completion_model
                .clone()
                .unwrap_or_else(|| config.llm_type.default_model().to_string()),
            config.base_url
                .clone()
                .unwrap_or_else(|| config.llm_type.default_base_url().to_string()),
        )
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(
        &self,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));

        let req = OpenAIChatRequest {
            model: self.model.clone(),
            messages: request.wire_messages(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!("Sending {} completion request to {}", self.provider, url);
        let resp = self.http.post(&url)
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json::<OpenAIResponse>()
            .await?;

        // No choices is an empty completion, not a failure.
        let content = resp.choices.into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(CompletionResponse { response: content })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
