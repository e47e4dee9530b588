use crate::domain::phone::normalize_phone;
use crate::domain::record::record_id;
use crate::rules::extract::{extract, Extraction};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub record: Value,
    pub best_phone: Option<String>,
    pub best_identifier: Option<String>,
    pub best_phone_raw: Option<String>,
    pub phone_candidates: Vec<String>,
}

/// Derives phone attributes for one fetched record. Never fails: a record the
/// extractor cannot read comes back with every derived field empty.
pub fn enrich(record: Value) -> EnrichedRecord {
    match extract(&record) {
        Ok(Extraction { candidates, best }) => EnrichedRecord {
            record,
            best_phone: best.phone,
            best_identifier: best.identifier,
            best_phone_raw: best.raw,
            phone_candidates: candidates,
        },
        Err(err) => {
            let id = record_id(&record);
            warn!(
                record_id = id.as_deref().unwrap_or("-"),
                error = %err,
                "phone extraction failed"
            );
            EnrichedRecord {
                record,
                best_phone: None,
                best_identifier: None,
                best_phone_raw: None,
                phone_candidates: Vec::new(),
            }
        }
    }
}

impl EnrichedRecord {
    pub fn id(&self) -> Option<String> {
        record_id(&self.record)
    }

    /// Normalized phones to match on: the best phone first, then every other
    /// usable candidate, without repeats.
    pub fn match_phones(&self) -> Vec<String> {
        let mut phones: Vec<String> = Vec::new();
        let normalized = self
            .phone_candidates
            .iter()
            .filter_map(|raw| normalize_phone(raw));
        for phone in self.best_phone.clone().into_iter().chain(normalized) {
            if !phones.contains(&phone) {
                phones.push(phone);
            }
        }
        phones
    }

    /// The source record with derived attributes attached as extra keys.
    ///
    /// Keys the record already carries are left alone; non-object records are
    /// returned unchanged.
    pub fn into_value(self) -> Value {
        let EnrichedRecord {
            mut record,
            best_phone,
            best_identifier,
            best_phone_raw,
            phone_candidates,
        } = self;
        if let Value::Object(map) = &mut record {
            let derived = [
                ("best_phone", Value::from(best_phone)),
                ("best_identifier", Value::from(best_identifier)),
                ("best_phone_raw", Value::from(best_phone_raw)),
                ("phone_candidates", Value::from(phone_candidates)),
            ];
            for (key, value) in derived {
                map.entry(key).or_insert(value);
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::enrich;
    use serde_json::json;

    #[test]
    fn enrich_copies_extraction_results() {
        let record = json!({
            "id": 7,
            "meta": {"sender": {"identifier": "5491165442102@messaging.net"}},
            "contact_inbox": {"source_id": "WAID:5491199990000"},
        });
        let enriched = enrich(record.clone());
        assert_eq!(enriched.record, record);
        assert_eq!(enriched.id().as_deref(), Some("7"));
        assert_eq!(enriched.best_phone.as_deref(), Some("5491165442102"));
        assert_eq!(
            enriched.best_identifier.as_deref(),
            Some("5491165442102@messaging.net")
        );
        assert_eq!(enriched.phone_candidates.len(), 2);
        assert_eq!(
            enriched.match_phones(),
            vec!["5491165442102".to_string(), "5491199990000".to_string()]
        );
    }

    #[test]
    fn enrich_survives_unreadable_records() {
        let enriched = enrich(json!(["not", "a", "record"]));
        assert!(enriched.best_phone.is_none());
        assert!(enriched.best_identifier.is_none());
        assert!(enriched.best_phone_raw.is_none());
        assert!(enriched.phone_candidates.is_empty());
        assert!(enriched.match_phones().is_empty());
    }

    #[test]
    fn into_value_attaches_derived_fields_without_overwriting() {
        let record = json!({
            "id": 1,
            "best_phone": "kept",
            "sender": {"phone_number": "+5491165442102"},
        });
        let value = enrich(record).into_value();
        assert_eq!(value["best_phone"], "kept");
        assert_eq!(value["best_phone_raw"], "+5491165442102");
        assert!(value["best_identifier"].is_null());
        assert_eq!(value["phone_candidates"], json!(["+5491165442102"]));
    }
}
