use serde_json::Value;

/// Shortest digit run still treated as a phone number.
pub const MIN_PHONE_DIGITS: usize = 6;

const VENDOR_PREFIXES: [&str; 2] = ["waid:", "whatsapp:"];

/// Reduces any textual phone representation to its bare digits.
///
/// JID domains (`number@domain`) and `WAID:`/`whatsapp:` prefixes are dropped
/// before formatting is stripped. Returns `None` when fewer than
/// [`MIN_PHONE_DIGITS`] digits survive.
pub fn normalize_phone(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let local = match trimmed.split_once('@') {
        Some((head, _domain)) => head,
        None => trimmed,
    };
    let local = strip_vendor_prefix(local.trim_start());

    let digits: String = local.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.len() < MIN_PHONE_DIGITS {
        return None;
    }
    Some(digits)
}

/// Same as [`normalize_phone`] for loosely typed values; only strings qualify.
pub fn normalize_phone_value(value: &Value) -> Option<String> {
    value.as_str().and_then(normalize_phone)
}

fn strip_vendor_prefix(value: &str) -> &str {
    for prefix in VENDOR_PREFIXES {
        if let Some(head) = value.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                return &value[prefix.len()..];
            }
        }
    }
    value
}
