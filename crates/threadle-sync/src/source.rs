use crate::{Result, SyncError};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationPage {
    pub records: Vec<Value>,
}

/// A remote, 1-based paged feed of conversation records.
pub trait ConversationSource {
    fn source_name(&self) -> &str;
    fn fetch_page(&mut self, page: u32, page_size: u32) -> Result<ConversationPage>;
}

/// Pulls the record list out of a conversation listing.
///
/// Accepts `{"data": {"payload": [...]}}`, `{"payload": [...]}` or a bare array.
pub fn parse_conversation_page(value: Value) -> Result<ConversationPage> {
    let records = match value {
        Value::Array(records) => records,
        Value::Object(mut map) => {
            let payload = match map.remove("data") {
                Some(Value::Object(mut data)) => data.remove("payload"),
                Some(Value::Array(records)) => Some(Value::Array(records)),
                _ => map.remove("payload"),
            };
            match payload {
                Some(Value::Array(records)) => records,
                Some(Value::Null) => Vec::new(),
                _ => {
                    return Err(SyncError::Parse(
                        "conversation listing has no payload array".to_string(),
                    ))
                }
            }
        }
        other => {
            return Err(SyncError::Parse(format!(
                "unexpected conversation listing: {}",
                json_kind(&other)
            )))
        }
    };
    Ok(ConversationPage { records })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
