use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Phone,
    Identifier,
    SourceId,
}

/// A nested key path into a loosely structured conversation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath {
    pub keys: &'static [&'static str],
    pub kind: FieldKind,
}

impl FieldPath {
    const fn new(keys: &'static [&'static str], kind: FieldKind) -> Self {
        Self { keys, kind }
    }

    /// Returns the raw text at this path, or `None` if any hop is missing,
    /// null, or the leaf is not a non-blank string.
    pub fn get<'a>(&self, record: &'a Value) -> Option<&'a str> {
        lookup(record, self.keys)
    }

    pub fn label(&self) -> String {
        self.keys.join(".")
    }
}

/// Where a phone number may hide in a conversation, most reliable first.
pub const PHONE_FIELDS: [FieldPath; 10] = [
    FieldPath::new(&["sender", "phone_number"], FieldKind::Phone),
    FieldPath::new(&["sender", "identifier"], FieldKind::Identifier),
    FieldPath::new(&["contact", "phone_number"], FieldKind::Phone),
    FieldPath::new(&["contact", "identifier"], FieldKind::Identifier),
    FieldPath::new(&["meta", "sender", "phone_number"], FieldKind::Phone),
    FieldPath::new(&["meta", "sender", "identifier"], FieldKind::Identifier),
    FieldPath::new(&["additional_attributes", "phone_number"], FieldKind::Phone),
    FieldPath::new(&["additional_attributes", "wa_id"], FieldKind::Identifier),
    FieldPath::new(&["last_non_activity_message", "source_id"], FieldKind::SourceId),
    FieldPath::new(&["contact_inbox", "source_id"], FieldKind::SourceId),
];

const CHANNEL_FIELDS: [&[&str]; 3] = [
    &["meta", "channel"],
    &["channel"],
    &["inbox", "channel_type"],
];

/// Record id as text; numeric ids are rendered in decimal.
pub fn record_id(record: &Value) -> Option<String> {
    match record.as_object()?.get("id")? {
        Value::String(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

pub fn record_channel(record: &Value) -> Option<&str> {
    CHANNEL_FIELDS.iter().find_map(|keys| lookup(record, keys))
}

fn lookup<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a str> {
    let mut current = record;
    for key in keys {
        current = current.as_object()?.get(*key)?;
    }
    current.as_str().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{record_channel, record_id, FieldKind, PHONE_FIELDS};
    use serde_json::json;

    #[test]
    fn field_path_walks_nested_objects() {
        let record = json!({"meta": {"sender": {"identifier": "5491165442102@messaging.net"}}});
        let field = PHONE_FIELDS[5];
        assert_eq!(field.kind, FieldKind::Identifier);
        assert_eq!(field.label(), "meta.sender.identifier");
        assert_eq!(field.get(&record), Some("5491165442102@messaging.net"));
    }

    #[test]
    fn field_path_tolerates_nulls_and_wrong_shapes() {
        let record = json!({
            "sender": null,
            "contact": "not an object",
            "meta": {"sender": {"phone_number": 5491165442102_i64}},
            "additional_attributes": {"phone_number": "   "}
        });
        for field in PHONE_FIELDS {
            assert!(field.get(&record).is_none(), "{}", field.label());
        }
        assert!(PHONE_FIELDS[0].get(&json!([1, 2, 3])).is_none());
    }

    #[test]
    fn record_id_accepts_numbers_and_strings() {
        assert_eq!(record_id(&json!({"id": 42})).as_deref(), Some("42"));
        assert_eq!(record_id(&json!({"id": " abc "})).as_deref(), Some("abc"));
        assert!(record_id(&json!({"id": null})).is_none());
        assert!(record_id(&json!({})).is_none());
        assert!(record_id(&json!("id")).is_none());
    }

    #[test]
    fn record_channel_prefers_meta_channel() {
        let record = json!({
            "meta": {"channel": "Channel::Whatsapp"},
            "channel": "Channel::Email",
        });
        assert_eq!(record_channel(&record), Some("Channel::Whatsapp"));
        let record = json!({"inbox": {"channel_type": "Channel::Api"}});
        assert_eq!(record_channel(&record), Some("Channel::Api"));
        assert!(record_channel(&json!({})).is_none());
    }
}
