//! HTML pages: dashboard, job detail, upload form.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use joblead_core::{dates, Contact, Job, JobStatus};
use serde::Deserialize;

use crate::urls::{domain_of, ensure_protocol};
use crate::AppState;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    jobs: Vec<DashboardRow>,
}

struct DashboardRow {
    id: i64,
    company: String,
    role_title: String,
    contact_name: String,
    contact_title: String,
    status_options: Vec<StatusOption>,
}

struct StatusOption {
    value: &'static str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "upload.html")]
struct UploadTemplate {
    message: String,
    message_class: String,
}

#[derive(Template)]
#[template(path = "job_detail.html")]
struct DetailTemplate {
    company: String,
    role_title: String,
    location: String,
    industry: String,
    status: String,
    posted_date: String,
    last_seen_date: String,
    revenue_tier: String,
    revenue_estimate: String,
    parent_company: String,
    fit_score: String,
    confidence: String,
    verification_level: String,
    engagement_type: String,
    employment_type: String,
    job_description: String,
    job_overview: String,
    why_now: String,
    recommended_angle: String,
    has_analysis: bool,
    analyzed_at: String,
    detected_offerings: Vec<&'static str>,
    analysis_notes: String,
    contacts: Vec<ContactView>,
    has_source: bool,
    source_href: String,
    source_domain: String,
}

struct ContactView {
    name: String,
    title: String,
    confidence: String,
    has_source: bool,
    source_href: String,
    source_domain: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadForm {
    json_data: String,
}

pub async fn dashboard(State(state): State<AppState>) -> Response {
    let rows = match state.store.list_jobs().await {
        Ok(rows) => rows,
        Err(err) => return server_error(err),
    };

    let jobs = rows
        .into_iter()
        .map(|row| DashboardRow {
            id: row.id,
            company: row.company,
            role_title: row.role_title,
            contact_name: row.contact_name.unwrap_or_else(|| NOT_AVAILABLE.into()),
            contact_title: row.contact_title.unwrap_or_else(|| NOT_AVAILABLE.into()),
            status_options: JobStatus::ALL
                .iter()
                .map(|status| StatusOption {
                    value: status.as_str(),
                    selected: *status == row.status,
                })
                .collect(),
        })
        .collect();

    render(DashboardTemplate { jobs })
}

pub async fn job_detail(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let job = match state.store.get_job(id).await {
        Ok(Some(job)) => job,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, Html("Job not found".to_string())).into_response();
        }
        Err(err) => return server_error(err),
    };
    let contacts = match state.store.contacts_for(id).await {
        Ok(contacts) => contacts,
        Err(err) => return server_error(err),
    };

    render(detail_view(job, contacts))
}

pub async fn upload_form() -> Response {
    render(UploadTemplate {
        message: String::new(),
        message_class: String::new(),
    })
}

pub async fn upload_submit(
    State(state): State<AppState>,
    Form(form): Form<UploadForm>,
) -> Response {
    let raw = form.json_data.trim();
    if raw.is_empty() {
        return render(UploadTemplate {
            message: "Please paste JSON data".into(),
            message_class: "error".into(),
        });
    }

    let report = state.importer.import_from_json(raw).await;
    render(UploadTemplate {
        message: report.message,
        message_class: if report.success { "success" } else { "error" }.into(),
    })
}

fn detail_view(job: Job, contacts: Vec<Contact>) -> DetailTemplate {
    let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.into());
    let date_or_na =
        |value: Option<chrono::NaiveDate>| value.map(dates::to_canonical).unwrap_or_else(|| NOT_AVAILABLE.into());

    let detected_offerings = job
        .offerings
        .entries()
        .filter(|(_, set)| *set)
        .filter_map(|(key, _)| joblead_core::offerings::get(key))
        .map(|offering| offering.full_label)
        .collect();

    let (has_source, source_href, source_domain) = link_parts(job.source_link.as_deref());

    DetailTemplate {
        company: job.company,
        role_title: job.role_title,
        location: or_na(job.location),
        industry: or_na(job.industry),
        status: job.status.as_str().to_string(),
        posted_date: date_or_na(job.posted_date),
        last_seen_date: date_or_na(job.last_seen_date),
        revenue_tier: or_na(job.revenue_tier),
        revenue_estimate: or_na(job.revenue_estimate),
        parent_company: or_na(job.parent_company),
        fit_score: job.fit_score.to_string(),
        confidence: or_na(job.confidence),
        verification_level: or_na(job.verification_level),
        engagement_type: or_na(job.engagement_type),
        employment_type: or_na(job.employment_type),
        job_description: job.job_description.unwrap_or_default(),
        job_overview: job.job_overview.unwrap_or_default(),
        why_now: or_na(job.why_now),
        recommended_angle: or_na(job.recommended_angle),
        has_analysis: job.ai_analyzed_at.is_some(),
        analyzed_at: job
            .ai_analyzed_at
            .map(|ts| ts.format("%b %-d, %Y %-I:%M %p").to_string())
            .unwrap_or_default(),
        detected_offerings,
        analysis_notes: job.ai_analysis_notes.unwrap_or_default(),
        contacts: contacts
            .into_iter()
            .map(|contact| {
                let (has_source, source_href, source_domain) =
                    link_parts(contact.source.as_deref());
                ContactView {
                    name: contact.name,
                    title: contact.title.unwrap_or_else(|| NOT_AVAILABLE.into()),
                    confidence: contact.confidence.unwrap_or_else(|| NOT_AVAILABLE.into()),
                    has_source,
                    source_href,
                    source_domain,
                }
            })
            .collect(),
        has_source,
        source_href,
        source_domain,
    }
}

fn link_parts(source: Option<&str>) -> (bool, String, String) {
    match source {
        Some(raw) if !raw.is_empty() => {
            let href = ensure_protocol(raw);
            let domain = domain_of(&href);
            (true, href, domain)
        }
        _ => (false, String::new(), String::new()),
    }
}

fn render<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => server_error(err),
    }
}

fn server_error(err: impl std::fmt::Display) -> Response {
    tracing::error!(error = %err, "page render failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("Server error".to_string()),
    )
        .into_response()
}
