use super::lenient_text;
use chrono::{ DateTime, Utc };
use log::debug;
use serde::{ Deserialize, Deserializer, Serialize };
use serde_json::Value;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMetadata {
    pub confidence: f64,
    pub suggested_actions: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default = "new_message_id", deserialize_with = "lenient_id")]
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    #[serde(default = "Utc::now", deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_metadata")]
    pub metadata: Option<ChatMetadata>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }
}

fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error> where D: Deserializer<'de> {
    Ok(lenient_text(deserializer)?.unwrap_or_else(new_message_id))
}

/// RFC 3339 strings or epoch milliseconds. Anything else is stamped now.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where D: Deserializer<'de>
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::String(s) =>
            DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(Utc::now))
}

fn lenient_metadata<'de, D>(deserializer: D) -> Result<Option<ChatMetadata>, D::Error>
    where D: Deserializer<'de>
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Keeps the turns that read as chat messages and drops the rest.
fn lenient_history<'de, D>(deserializer: D) -> Result<Vec<ChatMessage>, D::Error>
    where D: Deserializer<'de>
{
    let Some(Value::Array(entries)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    let total = entries.len();
    let history: Vec<ChatMessage> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if history.len() < total {
        debug!("Dropped {} unreadable history turns", total - history.len());
    }
    Ok(history)
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_history")]
    pub history: Vec<ChatMessage>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub metadata: ChatMetadata,
}
