//! Process configuration, read once at startup and injected from there.

use std::sync::Arc;
use std::time::Duration;

use joblead_notify::{AnalysisNotifier, NoopNotifier, WebhookNotifier, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_port: u16,
    pub public_base_url: String,
    pub analysis_webhook_url: Option<String>,
    pub webhook_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let listen_port = std::env::var("JOBLEAD_LISTEN_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8000);
        Self {
            database_url: std::env::var("JOBLEAD_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:joblead.db".to_string()),
            listen_port,
            public_base_url: std::env::var("JOBLEAD_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{listen_port}")),
            analysis_webhook_url: std::env::var("JOBLEAD_ANALYSIS_WEBHOOK_URL").ok(),
            webhook_timeout_secs: std::env::var("JOBLEAD_WEBHOOK_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Where the analysis service posts its results back.
    pub fn callback_url(&self) -> String {
        format!(
            "{}/api/webhook",
            self.public_base_url.trim_end_matches('/')
        )
    }

    /// The configured notifier, or a no-op one when no webhook URL is set.
    pub fn build_notifier(&self) -> anyhow::Result<Arc<dyn AnalysisNotifier>> {
        match &self.analysis_webhook_url {
            Some(url) => Ok(Arc::new(WebhookNotifier::new(
                url.clone(),
                self.callback_url(),
                Duration::from_secs(self.webhook_timeout_secs),
            )?)),
            None => Ok(Arc::new(NoopNotifier)),
        }
    }
}
