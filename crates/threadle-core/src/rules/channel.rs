use crate::domain::record::record_channel;
use serde_json::Value;

pub const DEFAULT_CHANNEL: &str = "Channel::Whatsapp";

/// Restricts a search to conversations on the given channel types.
///
/// An empty filter accepts everything; otherwise records without a channel
/// are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelFilter {
    allowed: Vec<String>,
}

impl ChannelFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn only<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = channels
            .into_iter()
            .map(|channel| channel.as_ref().trim().to_string())
            .filter(|channel| !channel.is_empty())
            .collect();
        Self { allowed }
    }

    pub fn is_any(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn channels(&self) -> &[String] {
        &self.allowed
    }

    pub fn accepts(&self, record: &Value) -> bool {
        if self.is_any() {
            return true;
        }
        let Some(channel) = record_channel(record) else {
            return false;
        };
        let channel = channel.trim();
        self.allowed
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(channel))
    }
}

#[cfg(test)]
mod tests {
    use super::{ChannelFilter, DEFAULT_CHANNEL};
    use serde_json::json;

    #[test]
    fn any_accepts_records_without_channel() {
        assert!(ChannelFilter::any().accepts(&json!({})));
    }

    #[test]
    fn only_matches_case_insensitively() {
        let filter = ChannelFilter::only([DEFAULT_CHANNEL]);
        assert!(filter.accepts(&json!({"meta": {"channel": "channel::whatsapp"}})));
        assert!(!filter.accepts(&json!({"meta": {"channel": "Channel::Email"}})));
        assert!(!filter.accepts(&json!({"id": 1})));
    }

    #[test]
    fn only_ignores_blank_entries() {
        let filter = ChannelFilter::only(["", "  "]);
        assert!(filter.is_any());
    }
}
