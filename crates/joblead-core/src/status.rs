//! Job pipeline status values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of pipeline states a job moves through. Canonical casing
/// is what gets stored and rendered; inbound values are matched
/// case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    New,
    #[serde(rename = "Awaiting approval")]
    AwaitingApproval,
    #[serde(rename = "Create Email")]
    CreateEmail,
    #[serde(rename = "Not interested")]
    NotInterested,
    #[serde(rename = "Email sent")]
    EmailSent,
    #[serde(rename = "Email Opened")]
    EmailOpened,
    #[serde(rename = "Responded to Email")]
    RespondedToEmail,
}

impl JobStatus {
    /// All statuses in display order.
    pub const ALL: [JobStatus; 7] = [
        JobStatus::New,
        JobStatus::AwaitingApproval,
        JobStatus::CreateEmail,
        JobStatus::NotInterested,
        JobStatus::EmailSent,
        JobStatus::EmailOpened,
        JobStatus::RespondedToEmail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::New => "New",
            JobStatus::AwaitingApproval => "Awaiting approval",
            JobStatus::CreateEmail => "Create Email",
            JobStatus::NotInterested => "Not interested",
            JobStatus::EmailSent => "Email sent",
            JobStatus::EmailOpened => "Email Opened",
            JobStatus::RespondedToEmail => "Responded to Email",
        }
    }

    /// Case-insensitive lookup, returning the canonically cased status.
    pub fn parse(input: &str) -> Option<JobStatus> {
        let wanted = input.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_canonicalizes() {
        assert_eq!(JobStatus::parse("not interested"), Some(JobStatus::NotInterested));
        assert_eq!(JobStatus::parse("NOT INTERESTED"), Some(JobStatus::NotInterested));
        assert_eq!(
            JobStatus::parse("not interested").unwrap().as_str(),
            "Not interested"
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(JobStatus::parse("archived"), None);
        assert_eq!(JobStatus::parse(""), None);
    }

    #[test]
    fn default_is_new() {
        assert_eq!(JobStatus::default(), JobStatus::New);
    }
}
