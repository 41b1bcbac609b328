//! The job importer: JSON in, persisted jobs + contacts out, analysis
//! notification on the way past.

use std::sync::Arc;

use joblead_core::{dates, JobStatus, NewContact, NewJob};
use joblead_notify::{AnalysisNotifier, AnalysisRequest};
use joblead_storage::{InsertOutcome, JobStore};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, warn};

use crate::normalize::{lookup_variant, normalize_fields};
use crate::sanitize::clean_object;

/// What one import call reports back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

impl ImportReport {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            count: 0,
        }
    }
}

enum RowOutcome {
    Inserted(i64),
    Duplicate,
}

#[derive(Debug, Error)]
enum RowError {
    #[error("not a job object")]
    NotAnObject,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("database error")]
    Database,
}

pub struct JobImporter {
    store: JobStore,
    notifier: Arc<dyn AnalysisNotifier>,
}

impl JobImporter {
    pub fn new(store: JobStore, notifier: Arc<dyn AnalysisNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Import one job object or an array of job objects from raw JSON text.
    ///
    /// Rows are processed independently; one bad row is recorded in the
    /// aggregate message and never aborts its siblings. `success` is true
    /// iff at least one row was imported.
    pub async fn import_from_json(&self, raw: &str) -> ImportReport {
        let data: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => return ImportReport::failure(format!("Invalid JSON format: {err}")),
        };

        let rows = match data {
            Value::Array(items) if items.is_empty() => {
                return ImportReport::failure("No jobs found in JSON");
            }
            Value::Array(items) => items,
            Value::Object(map) if !map.is_empty() => vec![Value::Object(map)],
            _ => {
                return ImportReport::failure(
                    "JSON must be a job object or array of job objects",
                );
            }
        };

        let mut imported = 0usize;
        let mut skipped = 0usize;
        let mut errors: Vec<String> = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            match self.insert_row(row).await {
                Ok(RowOutcome::Inserted(_)) => imported += 1,
                Ok(RowOutcome::Duplicate) => skipped += 1,
                Err(err) => errors.push(format!("Row {}: {}", index + 1, err)),
            }
        }

        let mut message = format!("Successfully imported {imported} job(s)");
        if skipped > 0 {
            message.push_str(&format!(", skipped {skipped} duplicate(s)"));
        }
        if !errors.is_empty() {
            message.push_str(&format!(". Errors: {}", errors.join("; ")));
        }

        ImportReport {
            success: imported > 0,
            message,
            count: imported,
        }
    }

    async fn insert_row(&self, row: &Value) -> Result<RowOutcome, RowError> {
        let Value::Object(raw) = row else {
            return Err(RowError::NotAnObject);
        };

        let fields = clean_object(normalize_fields(raw));

        let company = field_string(&fields, "Company").ok_or(RowError::MissingField("Company"))?;
        let role_title =
            field_string(&fields, "Role Title").ok_or(RowError::MissingField("Role Title"))?;

        let job = NewJob {
            company,
            role_title,
            location: field_string(&fields, "Location"),
            job_description: field_string(&fields, "Job Description"),
            job_overview: field_string(&fields, "Job Overview"),
            why_now: field_string(&fields, "Why Now"),
            recommended_angle: field_string(&fields, "Recommended Angle"),
            industry: field_string(&fields, "Industry"),
            employment_type: field_string(&fields, "Employment Type"),
            engagement_type: field_string(&fields, "Engagement Type"),
            parent_company: field_string(&fields, "Parent Company"),
            posted_date: field_string(&fields, "Posted/Updated Date")
                .as_deref()
                .and_then(dates::parse_flexible),
            last_seen_date: field_string(&fields, "Last Seen Date")
                .as_deref()
                .and_then(dates::parse_flexible),
            fit_score: fields.get("Fit Score").map(coerce_fit_score).unwrap_or(0),
            confidence: field_string(&fields, "Confidence"),
            verification_level: field_string(&fields, "Verification Level"),
            revenue_tier: field_string(&fields, "Revenue Tier"),
            revenue_estimate: field_string(&fields, "Revenue Estimate"),
            revenue_confidence: field_string(&fields, "Revenue Confidence"),
            source_link: field_string(&fields, "Source Link"),
            status: field_string(&fields, "Status")
                .as_deref()
                .and_then(JobStatus::parse)
                .unwrap_or_default(),
        };

        let contacts = collect_contacts(fields.get("Likely Buyers/Managers"));

        let outcome = self
            .store
            .insert_job_with_contacts(&job, &contacts)
            .await
            .map_err(|err| {
                error!(company = %job.company, error = %err, "job insert failed");
                RowError::Database
            })?;

        let job_id = match outcome {
            InsertOutcome::Inserted(id) => id,
            InsertOutcome::Duplicate => return Ok(RowOutcome::Duplicate),
        };

        // Relay for AI analysis; why-now stands in when there is no
        // description. A failed send never fails the import.
        let description = job
            .job_description
            .clone()
            .or_else(|| job.why_now.clone());
        let request = AnalysisRequest {
            job_id,
            company: job.company.clone(),
            role_title: job.role_title.clone(),
            job_description: description,
        };
        if let Err(err) = self.notifier.notify(&request).await {
            warn!(job_id, error = %err, "analysis notification failed");
        }

        Ok(RowOutcome::Inserted(job_id))
    }
}

fn field_string(fields: &Map<String, Value>, key: &str) -> Option<String> {
    value_to_string(fields.get(key)?)
}

fn value_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn coerce_fit_score(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map(|f| f as i64).unwrap_or(0),
        _ => 0,
    }
}

/// The contacts field accepts a single object or an array of objects.
/// Entries without a name are silently dropped.
fn collect_contacts(value: Option<&Value>) -> Vec<NewContact> {
    let Some(value) = value else {
        return Vec::new();
    };

    let entries: Vec<&Map<String, Value>> = match value {
        Value::Object(map) => vec![map],
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| {
            let name = contact_field(entry, &["Name", "name"])?;
            Some(NewContact {
                name,
                title: contact_field(entry, &["Title", "title", "Job Title"]),
                confidence: contact_field(entry, &["Confidence", "confidence", "Confidence Level"]),
                source: contact_field(entry, &["Source", "source", "URL"]),
            })
        })
        .collect()
}

fn contact_field(entry: &Map<String, Value>, variants: &[&str]) -> Option<String> {
    lookup_variant(entry, variants).and_then(value_to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use joblead_notify::NotifyError;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<AnalysisRequest>>,
    }

    #[async_trait]
    impl AnalysisNotifier for RecordingNotifier {
        async fn notify(&self, request: &AnalysisRequest) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl AnalysisNotifier for FailingNotifier {
        async fn notify(&self, _request: &AnalysisRequest) -> Result<(), NotifyError> {
            Err(NotifyError::HttpStatus(503))
        }
    }

    async fn importer_with(notifier: Arc<dyn AnalysisNotifier>) -> (JobImporter, JobStore) {
        let store = JobStore::in_memory().await.expect("open in-memory db");
        store.migrate().await.expect("migrate");
        (JobImporter::new(store.clone(), notifier), store)
    }

    async fn importer() -> (JobImporter, JobStore) {
        importer_with(Arc::new(RecordingNotifier::default())).await
    }

    #[tokio::test]
    async fn invalid_json_is_rejected_without_persistence() {
        let (importer, store) = importer().await;
        let report = importer.import_from_json("{not json").await;
        assert!(!report.success);
        assert!(report.message.starts_with("Invalid JSON format:"));
        assert_eq!(report.count, 0);
        assert!(store.list_jobs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_object_input_is_rejected() {
        let (importer, _) = importer().await;
        let report = importer.import_from_json("42").await;
        assert_eq!(
            report.message,
            "JSON must be a job object or array of job objects"
        );
        let report = importer.import_from_json("[]").await;
        assert_eq!(report.message, "No jobs found in JSON");
        let report = importer.import_from_json("{}").await;
        assert!(!report.success);
    }

    #[tokio::test]
    async fn single_object_imports_with_synonyms_and_cleanup() {
        let (importer, store) = importer().await;
        let payload = json!({
            "Organization": "Acme Corp [oai_citation:1‡news.example.com]",
            "Position": "Sustainability Lead",
            "sector": "Manufacturing",
            "posted_date": "March 1, 2024",
            "score": "8",
            "job status": "awaiting APPROVAL",
            "url": "(https://x.com/job?utm_source=feed&lang=en)"
        });

        let report = importer.import_from_json(&payload.to_string()).await;
        assert!(report.success, "{}", report.message);
        assert_eq!(report.count, 1);
        assert_eq!(report.message, "Successfully imported 1 job(s)");

        let rows = store.list_jobs().await.unwrap();
        assert_eq!(rows.len(), 1);
        let job = store.get_job(rows[0].id).await.unwrap().unwrap();
        assert_eq!(job.company, "Acme Corp");
        assert_eq!(job.industry.as_deref(), Some("Manufacturing"));
        assert_eq!(
            job.posted_date.map(dates::to_canonical),
            Some("2024-03-01".to_string())
        );
        assert_eq!(job.fit_score, 8);
        assert_eq!(job.status.as_str(), "Awaiting approval");
        assert_eq!(job.source_link.as_deref(), Some("https://x.com/job?lang=en"));
    }

    #[tokio::test]
    async fn second_import_of_same_pair_skips_duplicate() {
        let (importer, _) = importer().await;
        let payload = json!({"Company": "Acme Corp", "Role Title": "ESG Lead"}).to_string();

        let first = importer.import_from_json(&payload).await;
        assert!(first.success);
        assert_eq!(first.count, 1);

        let second = importer.import_from_json(&payload).await;
        assert!(!second.success);
        assert_eq!(second.count, 0);
        assert!(second.message.contains("skipped 1 duplicate"), "{}", second.message);
    }

    #[tokio::test]
    async fn bad_row_does_not_abort_siblings() {
        let (importer, store) = importer().await;
        let payload = json!([
            {"Company": "Acme Corp", "Role Title": "ESG Lead"},
            {"Role Title": "Missing Company"},
            {"Company": "Globex", "Role Title": "Reporting Manager"}
        ]);

        let report = importer.import_from_json(&payload.to_string()).await;
        assert!(report.success);
        assert_eq!(report.count, 2);
        assert!(report.message.contains("Row 2:"), "{}", report.message);
        assert!(!report.message.contains("Row 1:"));
        assert!(!report.message.contains("Row 3:"));
        assert_eq!(store.list_jobs().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn nameless_contacts_are_silently_dropped() {
        let (importer, store) = importer().await;
        let payload = json!({
            "Company": "Acme Corp",
            "Role Title": "ESG Lead",
            "Contacts": [
                {"Name": "Dana Reyes", "Title": "CFO"},
                {"Title": "Anonymous Director"},
                {"name": "Lee Park"}
            ]
        });

        let report = importer.import_from_json(&payload.to_string()).await;
        assert!(report.success);

        let rows = store.list_jobs().await.unwrap();
        let contacts = store.contacts_for(rows[0].id).await.unwrap();
        let names: Vec<_> = contacts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Dana Reyes", "Lee Park"]);
    }

    #[tokio::test]
    async fn single_contact_object_is_wrapped() {
        let (importer, store) = importer().await;
        let payload = json!({
            "Company": "Acme Corp",
            "Role Title": "ESG Lead",
            "Likely Buyers/Managers": {"Name": "Solo Contact", "Confidence Level": "High"}
        });

        importer.import_from_json(&payload.to_string()).await;
        let rows = store.list_jobs().await.unwrap();
        let contacts = store.contacts_for(rows[0].id).await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name, "Solo Contact");
        assert_eq!(contacts[0].confidence.as_deref(), Some("High"));
    }

    #[tokio::test]
    async fn notifier_receives_description_with_why_now_fallback() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (importer, _) = importer_with(notifier.clone()).await;

        let payload = json!([
            {
                "Company": "Acme Corp",
                "Role Title": "ESG Lead",
                "Job Description": "Own the reporting program"
            },
            {
                "Company": "Globex",
                "Role Title": "Reporting Manager",
                "Why Now": "New CSRD exposure"
            }
        ]);
        importer.import_from_json(&payload.to_string()).await;

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0].job_description.as_deref(),
            Some("Own the reporting program")
        );
        assert_eq!(sent[1].job_description.as_deref(), Some("New CSRD exposure"));
    }

    #[tokio::test]
    async fn notifier_failure_does_not_fail_the_import() {
        let (importer, store) = importer_with(Arc::new(FailingNotifier)).await;
        let payload = json!({"Company": "Acme Corp", "Role Title": "ESG Lead"});

        let report = importer.import_from_json(&payload.to_string()).await;
        assert!(report.success, "{}", report.message);
        assert_eq!(report.count, 1);
        assert_eq!(store.list_jobs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn non_object_row_is_a_row_error() {
        let (importer, _) = importer().await;
        let payload = json!([{"Company": "Acme Corp", "Role Title": "ESG Lead"}, "stray"]);
        let report = importer.import_from_json(&payload.to_string()).await;
        assert!(report.success);
        assert_eq!(report.count, 1);
        assert!(report.message.contains("Row 2: not a job object"));
    }
}
