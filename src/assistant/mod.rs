pub mod keywords;

use crate::cli::Args;
use crate::config::prompt::load_system_prompt;
use crate::error::ApiError;
use crate::llm::chat::{ ChatClient, CompletionRequest, new_client as new_chat_client };
use crate::llm::{ usable_api_key, LlmConfig, LlmType };
use crate::models::chat::{ ChatMessage, ChatMetadata, ChatReply, ChatRole };

use log::{ debug, info, warn };
use std::error::Error;
use std::sync::Arc;

pub const COMPLETION_TEMPERATURE: f32 = 0.7;
pub const COMPLETION_MAX_TOKENS: u32 = 500;
pub const COMPLETION_CONFIDENCE: f64 = 0.95;
pub const FALLBACK_CONFIDENCE: f64 = 0.9;
pub const EMPTY_COMPLETION_REPLY: &str =
    "I apologize, but I couldn't generate a response. Please try again.";

const HISTORY_FOR_PROMPT_LEN: usize = 6;

/// Answers chat widget messages, preferring the completion service and
/// degrading to the keyword tables in [`keywords`].
pub struct ChatResolver {
    chat_client: Option<Arc<dyn ChatClient>>,
    system_prompt: String,
}

impl ChatResolver {
    pub fn new(chat_client: Option<Arc<dyn ChatClient>>, system_prompt: impl Into<String>) -> Self {
        Self {
            chat_client,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn from_args(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let system_prompt = load_system_prompt(args.prompts_path.as_deref())?;

        let chat_client = match usable_api_key(&args.chat_api_key) {
            Some(api_key) => {
                let chat_config = LlmConfig {
                    llm_type: args.chat_llm_type
                        .parse::<LlmType>()
                        .map_err(|e| format!("Invalid chat LLM type: {}", e))?,
                    api_key: Some(api_key),
                    completion_model: args.chat_model.clone(),
                    base_url: args.chat_base_url.clone(),
                };
                let client = new_chat_client(&chat_config)?;
                info!(
                    "Chat client configured: Type={}, Model={}, BaseURL={}",
                    args.chat_llm_type,
                    client.get_model(),
                    client.get_base_url().as_deref().unwrap_or("adapter default")
                );
                Some(client)
            }
            None => {
                info!("No chat API key configured. Chat replies use keyword fallback only.");
                None
            }
        };

        Ok(Self::new(chat_client, system_prompt))
    }

    pub fn has_completion_client(&self) -> bool {
        self.chat_client.is_some()
    }

    pub async fn resolve(
        &self,
        message: &str,
        history: &[ChatMessage]
    ) -> Result<ChatReply, ApiError> {
        if message.is_empty() {
            return Err(ApiError::BadRequest("Message is required".to_string()));
        }

        let lowered = message.to_lowercase();
        let suggested_actions = keywords::suggested_actions(&lowered);

        let generated = match &self.chat_client {
            Some(client) =>
                match self.complete(client.as_ref(), message, history).await {
                    Ok(text) => Some(text),
                    Err(e) => {
                        warn!("Chat completion failed, using keyword fallback: {}", e);
                        None
                    }
                }
            None => None,
        };

        let (response, confidence) = match generated {
            Some(text) => (text, COMPLETION_CONFIDENCE),
            None => (keywords::fallback_answer(&lowered).to_string(), FALLBACK_CONFIDENCE),
        };

        Ok(ChatReply {
            response,
            metadata: ChatMetadata {
                confidence,
                suggested_actions,
            },
        })
    }

    async fn complete(
        &self,
        client: &dyn ChatClient,
        message: &str,
        history: &[ChatMessage]
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let request = CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            history: recent_turns(history),
            user_message: message.to_string(),
            temperature: COMPLETION_TEMPERATURE,
            max_tokens: COMPLETION_MAX_TOKENS,
        };
        debug!("Requesting completion with {} history turns", request.history.len());

        let completion = client.complete(&request).await?;
        if completion.response.is_empty() {
            return Ok(EMPTY_COMPLETION_REPLY.to_string());
        }
        Ok(completion.response)
    }
}

fn recent_turns(history: &[ChatMessage]) -> Vec<(ChatRole, String)> {
    let turns: Vec<(ChatRole, String)> = history
        .iter()
        .filter(|m| m.role != ChatRole::System && !m.content.is_empty())
        .map(|m| (m.role, m.content.clone()))
        .collect();
    let skip = turns.len().saturating_sub(HISTORY_FOR_PROMPT_LEN);
    turns.into_iter().skip(skip).collect()
}
