use crate::domain::phone::normalize_phone;
use crate::domain::record::{FieldKind, PHONE_FIELDS};
use crate::error::{CoreError, Result};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BestPhone {
    /// Normalized phone from the most reliable field that yielded one.
    pub phone: Option<String>,
    /// First raw identifier-style value, which need not be a phone at all.
    pub identifier: Option<String>,
    /// Raw text `phone` was derived from.
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub candidates: Vec<String>,
    pub best: BestPhone,
}

/// Walks [`PHONE_FIELDS`] once, collecting every raw value and picking the best.
///
/// The walk never stops early: later match tiers look at the whole pool, not
/// just the winner.
pub fn extract(record: &Value) -> Result<Extraction> {
    if !record.is_object() {
        return Err(CoreError::RecordNotObject);
    }

    let mut out = Extraction::default();
    for field in PHONE_FIELDS {
        let Some(raw) = field.get(record) else {
            continue;
        };
        out.candidates.push(raw.to_string());

        if field.kind == FieldKind::Identifier && out.best.identifier.is_none() {
            out.best.identifier = Some(raw.to_string());
        }
        if out.best.phone.is_none() {
            if let Some(phone) = normalize_phone(raw) {
                out.best.phone = Some(phone);
                out.best.raw = Some(raw.to_string());
            }
        }
    }
    Ok(out)
}

pub fn extract_candidates(record: &Value) -> Result<Vec<String>> {
    extract(record).map(|extraction| extraction.candidates)
}

pub fn best_of(record: &Value) -> Result<BestPhone> {
    extract(record).map(|extraction| extraction.best)
}
