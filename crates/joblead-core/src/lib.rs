//! Core domain model for the JobLead tracker.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod dates;
pub mod offerings;
pub mod status;

pub use offerings::{Offering, OfferingFlags, OFFERINGS};
pub use status::JobStatus;

/// A persisted lead opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub company: String,
    pub role_title: String,
    pub location: Option<String>,
    pub job_description: Option<String>,
    pub job_overview: Option<String>,
    pub why_now: Option<String>,
    pub recommended_angle: Option<String>,
    pub industry: Option<String>,
    pub employment_type: Option<String>,
    pub engagement_type: Option<String>,
    pub parent_company: Option<String>,
    pub posted_date: Option<NaiveDate>,
    pub last_seen_date: Option<NaiveDate>,
    pub fit_score: i64,
    pub confidence: Option<String>,
    pub verification_level: Option<String>,
    pub revenue_tier: Option<String>,
    pub revenue_estimate: Option<String>,
    pub revenue_confidence: Option<String>,
    pub source_link: Option<String>,
    pub status: JobStatus,
    pub offerings: OfferingFlags,
    pub ai_analysis_notes: Option<String>,
    pub ai_analyzed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insertable job draft produced by the ingestion pipeline, before an id
/// exists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewJob {
    pub company: String,
    pub role_title: String,
    pub location: Option<String>,
    pub job_description: Option<String>,
    pub job_overview: Option<String>,
    pub why_now: Option<String>,
    pub recommended_angle: Option<String>,
    pub industry: Option<String>,
    pub employment_type: Option<String>,
    pub engagement_type: Option<String>,
    pub parent_company: Option<String>,
    pub posted_date: Option<NaiveDate>,
    pub last_seen_date: Option<NaiveDate>,
    pub fit_score: i64,
    pub confidence: Option<String>,
    pub verification_level: Option<String>,
    pub revenue_tier: Option<String>,
    pub revenue_estimate: Option<String>,
    pub revenue_confidence: Option<String>,
    pub source_link: Option<String>,
    pub status: JobStatus,
}

/// A likely buyer/decision-maker attached to one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub job_id: i64,
    pub name: String,
    pub title: Option<String>,
    pub confidence: Option<String>,
    pub source: Option<String>,
}

/// Insertable contact draft. Entries without a name never reach this type;
/// the importer drops them before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub title: Option<String>,
    pub confidence: Option<String>,
    pub source: Option<String>,
}
