//! Normalization of the analysis service's callback payload.
//!
//! Upstream relays sometimes double-encode the offerings object, and
//! sometimes nest it one level under an `offerings` key. Exactly three
//! shapes are accepted: a raw object, a JSON-string of an object, and a
//! JSON-string of `{offerings, notes}`. Anything else is rejected rather
//! than guessed at.

use joblead_core::offerings;
use joblead_storage::ClassificationUpdate;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallbackError {
    #[error("Offerings must be an object/array")]
    BadShape,
    #[error("Invalid offering key: {0}")]
    InvalidKey(String),
}

/// Flatten the offerings payload into a validated classification update.
///
/// Every key must belong to the offering catalog; one unknown key rejects
/// the whole payload so a partial result is never applied. Notes found
/// inside a double-encoded wrapper only fill in a missing top-level notes
/// value.
pub fn normalize_classification(
    offerings_value: &Value,
    notes: Option<String>,
) -> Result<ClassificationUpdate, CallbackError> {
    let mut notes = notes;

    let flat: Map<String, Value> = match offerings_value {
        Value::Object(map) => map.clone(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(decoded)) => match decoded.get("offerings") {
                Some(Value::Object(inner)) => {
                    if notes.is_none() {
                        if let Some(Value::String(wrapped)) = decoded.get("notes") {
                            notes = Some(wrapped.clone());
                        }
                    }
                    inner.clone()
                }
                _ => decoded,
            },
            _ => return Err(CallbackError::BadShape),
        },
        _ => return Err(CallbackError::BadShape),
    };

    let mut flags = Vec::with_capacity(flat.len());
    for (key, value) in &flat {
        let Some(offering) = offerings::get(key) else {
            return Err(CallbackError::InvalidKey(key.clone()));
        };
        flags.push((offering.key, is_truthy(value)));
    }

    Ok(ClassificationUpdate { flags, notes })
}

/// Truthiness the way the upstream service's loosely typed payloads expect:
/// false, 0, "", "0", null, and empty arrays are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_object_passes_through() {
        let update = normalize_classification(
            &json!({"governance_policy": 1, "technology_tools": false}),
            Some("looks relevant".into()),
        )
        .unwrap();
        assert_eq!(update.notes.as_deref(), Some("looks relevant"));
        assert!(update.flags.contains(&("governance_policy", true)));
        assert!(update.flags.contains(&("technology_tools", false)));
    }

    #[test]
    fn unknown_key_rejects_the_whole_payload() {
        let err = normalize_classification(
            &json!({"sustainability_reporting": true, "bogus_key": false}),
            None,
        )
        .unwrap_err();
        assert_eq!(err, CallbackError::InvalidKey("bogus_key".into()));
    }

    #[test]
    fn json_string_of_object_is_decoded() {
        let encoded = json!({"regulatory_compliance": true}).to_string();
        let update = normalize_classification(&Value::String(encoded), None).unwrap();
        assert_eq!(update.flags, vec![("regulatory_compliance", true)]);
        assert_eq!(update.notes, None);
    }

    #[test]
    fn wrapped_json_string_unnests_and_fills_notes() {
        let encoded = json!({
            "offerings": {"esg_ratings_rankings": 1},
            "notes": "from the wrapper"
        })
        .to_string();

        let update = normalize_classification(&Value::String(encoded), None).unwrap();
        assert_eq!(update.flags, vec![("esg_ratings_rankings", true)]);
        assert_eq!(update.notes.as_deref(), Some("from the wrapper"));

        // Top-level notes win over the wrapper's.
        let encoded = json!({
            "offerings": {"esg_ratings_rankings": 1},
            "notes": "from the wrapper"
        })
        .to_string();
        let update =
            normalize_classification(&Value::String(encoded), Some("top-level".into())).unwrap();
        assert_eq!(update.notes.as_deref(), Some("top-level"));
    }

    #[test]
    fn non_object_shapes_are_rejected() {
        assert_eq!(
            normalize_classification(&json!([1, 2]), None).unwrap_err(),
            CallbackError::BadShape
        );
        assert_eq!(
            normalize_classification(&Value::String("not json".into()), None).unwrap_err(),
            CallbackError::BadShape
        );
        assert_eq!(
            normalize_classification(&Value::String("[true]".into()), None).unwrap_err(),
            CallbackError::BadShape
        );
        assert_eq!(
            normalize_classification(&json!(7), None).unwrap_err(),
            CallbackError::BadShape
        );
    }

    #[test]
    fn truthiness_follows_loose_payload_rules() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn empty_offerings_object_yields_no_flags() {
        let update = normalize_classification(&json!({}), None).unwrap();
        assert!(update.flags.is_empty());
    }
}
