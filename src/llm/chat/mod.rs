pub mod openai;

use async_trait::async_trait;
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;
use std::sync::Arc;
use super::{ LlmConfig, LlmType };
use self::openai::OpenAIChatClient;
use crate::models::chat::ChatRole;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    /// Earlier turns, oldest first. Only user and assistant roles are sent.
    pub history: Vec<(ChatRole, String)>,
    pub user_message: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

/// Message shape shared by the OpenAI-compatible chat-completions APIs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct WireMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionRequest {
    pub(crate) fn wire_messages(&self) -> Vec<WireMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(WireMessage {
            role: ChatRole::System.as_str().to_string(),
            content: Some(self.system_prompt.clone()),
        });
        for (role, content) in &self.history {
            messages.push(WireMessage {
                role: role.as_str().to_string(),
                content: Some(content.clone()),
            });
        }
        messages.push(WireMessage {
            role: ChatRole::User.as_str().to_string(),
            content: Some(self.user_message.clone()),
        });
        messages
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(
    config: &LlmConfig
) -> Result<Arc<dyn ChatClient>, Box<dyn StdError + Send + Sync>> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::OpenAI | LlmType::Groq => {
            let specific_client = OpenAIChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}
