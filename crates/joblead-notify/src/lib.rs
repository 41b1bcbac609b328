//! Outbound boundary: relaying freshly imported jobs to the external
//! AI-analysis service.
//!
//! The call is best-effort by contract. Callers log failures and move on;
//! there is no retry and a failed send never fails an import.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "joblead/0.1";

/// What the importer hands the notifier for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub job_id: i64,
    pub company: String,
    pub role_title: String,
    pub job_description: Option<String>,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("analysis webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("analysis webhook returned HTTP {0}")]
    HttpStatus(u16),
}

/// Seam between the importer and the analysis service. Always present on
/// the importer; deployments without a configured webhook get
/// [`NoopNotifier`] instead of a missing collaborator.
#[async_trait]
pub trait AnalysisNotifier: Send + Sync {
    async fn notify(&self, request: &AnalysisRequest) -> Result<(), NotifyError>;
}

/// POSTs the analysis payload to the configured webhook, including the
/// callback URL the service should answer on.
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: String,
    callback_url: String,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    job_id: i64,
    company: &'a str,
    role_title: &'a str,
    job_description: Option<&'a str>,
    callback_url: &'a str,
}

impl WebhookNotifier {
    pub fn new(
        webhook_url: impl Into<String>,
        callback_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
            callback_url: callback_url.into(),
        })
    }
}

#[async_trait]
impl AnalysisNotifier for WebhookNotifier {
    async fn notify(&self, request: &AnalysisRequest) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            job_id: request.job_id,
            company: &request.company,
            role_title: &request.role_title,
            job_description: request.job_description.as_deref(),
            callback_url: &self.callback_url,
        };

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::HttpStatus(status.as_u16()));
        }

        info!(job_id = request.job_id, "sent job for AI analysis");
        Ok(())
    }
}

/// Stands in when no analysis webhook is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl AnalysisNotifier for NoopNotifier {
    async fn notify(&self, request: &AnalysisRequest) -> Result<(), NotifyError> {
        debug!(
            job_id = request.job_id,
            "analysis webhook not configured; skipping"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_notifier_always_succeeds() {
        let notifier = NoopNotifier;
        let request = AnalysisRequest {
            job_id: 1,
            company: "Acme Corp".into(),
            role_title: "Head of Sustainability".into(),
            job_description: None,
        };
        assert!(notifier.notify(&request).await.is_ok());
    }

    #[test]
    fn payload_serializes_with_callback_url() {
        let payload = WebhookPayload {
            job_id: 7,
            company: "Acme Corp",
            role_title: "ESG Lead",
            job_description: Some("reporting overhaul"),
            callback_url: "http://localhost:8000/api/webhook",
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["job_id"], 7);
        assert_eq!(value["callback_url"], "http://localhost:8000/api/webhook");
        assert_eq!(value["job_description"], "reporting overhaul");
    }
}
