//! The edit-job allow-list: a closed table mapping field names to typed
//! setters. Column names in generated SQL only ever come from this table,
//! never from caller input.

use chrono::NaiveDate;
use joblead_core::{dates, JobStatus};
use serde_json::{Map, Value};
use thiserror::Error;

/// How each allow-listed field binds into the UPDATE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(Option<String>),
    Int(i64),
    Date(Option<NaiveDate>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateError {
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

#[derive(Debug, Clone, Copy)]
enum Setter {
    Text,
    FitScore,
    Date,
    Status,
}

/// Every field the edit operation may touch. Anything else in the request
/// is silently dropped.
const ALLOWED_FIELDS: &[(&str, Setter)] = &[
    ("company", Setter::Text),
    ("role_title", Setter::Text),
    ("location", Setter::Text),
    ("industry", Setter::Text),
    ("employment_type", Setter::Text),
    ("status", Setter::Status),
    ("posted_date", Setter::Date),
    ("last_seen_date", Setter::Date),
    ("revenue_tier", Setter::Text),
    ("revenue_estimate", Setter::Text),
    ("parent_company", Setter::Text),
    ("fit_score", Setter::FitScore),
    ("confidence", Setter::Text),
    ("verification_level", Setter::Text),
    ("engagement_type", Setter::Text),
    ("job_description", Setter::Text),
    ("job_overview", Setter::Text),
    ("why_now", Setter::Text),
    ("recommended_angle", Setter::Text),
    ("source_link", Setter::Text),
];

/// Filtered, typed update set. Empty means the request contained no
/// allow-listed fields and must be rejected by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldUpdates {
    pub(crate) sets: Vec<(&'static str, BindValue)>,
}

impl FieldUpdates {
    /// Filter a raw update mapping down to the allow-list, coercing each
    /// value through its field's setter. Unknown keys are dropped without
    /// comment; a bad status value rejects the whole request.
    pub fn from_json(updates: &Map<String, Value>) -> Result<FieldUpdates, UpdateError> {
        let mut sets = Vec::new();
        for (column, setter) in ALLOWED_FIELDS {
            let Some(value) = updates.get(*column) else {
                continue;
            };
            let bound = match setter {
                Setter::Text => BindValue::Text(value_to_text(value)),
                Setter::FitScore => BindValue::Int(coerce_fit_score(value)),
                Setter::Date => BindValue::Date(
                    value_to_text(value)
                        .as_deref()
                        .and_then(dates::parse_flexible),
                ),
                Setter::Status => {
                    let raw = value_to_text(value).unwrap_or_default();
                    let status = JobStatus::parse(&raw)
                        .ok_or_else(|| UpdateError::InvalidStatus(raw.clone()))?;
                    BindValue::Text(Some(status.as_str().to_string()))
                }
            };
            sets.push((*column, bound));
        }
        Ok(FieldUpdates { sets })
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// The field names that survived filtering, in allow-list order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sets.iter().map(|(column, _)| *column)
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Mirrors the ingestion coercion: integers pass, floats truncate, numeric
/// strings parse, everything else is 0.
fn coerce_fit_score(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map(|f| f as i64).unwrap_or(0),
        _ => 0,
    }
}
