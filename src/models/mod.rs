pub mod chat;
pub mod contact;

use serde::{ Deserialize, Deserializer };
use serde_json::Value;

/// Scalar JSON as text. Numbers and booleans keep their JSON spelling;
/// null, arrays and objects have no text form.
pub(crate) fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `deserialize_with` helper for free-text fields browsers may post as
/// numbers. Shapes with no text form read as absent instead of failing.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where D: Deserializer<'de>
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_text))
}
