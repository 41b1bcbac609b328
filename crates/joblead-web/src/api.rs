//! JSON endpoints: import, webhook callback, status update, field update.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use joblead_core::JobStatus;
use joblead_ingest::normalize_classification;
use joblead_storage::FieldUpdates;
use serde_json::{json, Map, Value};
use tracing::{debug, error};

use crate::AppState;

fn reject(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({"success": false, "message": message.into()})),
    )
        .into_response()
}

/// Storage failures surface as a generic message; detail goes to the log
/// only.
fn database_error(err: impl std::fmt::Display) -> Response {
    error!(error = %err, "storage failure");
    reject(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
}

fn parse_object_body(body: &str) -> Option<Map<String, Value>> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .as_object()
        .cloned()
}

/// Callers send ids as numbers or numeric strings; anything else resolves
/// to an id that cannot exist.
fn coerce_job_id(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

pub async fn import(State(state): State<AppState>, body: String) -> Response {
    let report = state.importer.import_from_json(&body).await;
    Json(report).into_response()
}

pub async fn webhook_receive(State(state): State<AppState>, body: String) -> Response {
    debug!(payload = %body, "webhook received");

    let Some(data) = parse_object_body(&body) else {
        return reject(
            StatusCode::BAD_REQUEST,
            "Missing required fields (job_id or offerings)",
        );
    };
    let (Some(job_id), Some(offerings)) = (data.get("job_id"), data.get("offerings")) else {
        return reject(
            StatusCode::BAD_REQUEST,
            "Missing required fields (job_id or offerings)",
        );
    };

    let notes = data
        .get("notes")
        .and_then(Value::as_str)
        .map(str::to_string);
    let update = match normalize_classification(offerings, notes) {
        Ok(update) => update,
        Err(err) => return reject(StatusCode::BAD_REQUEST, err.to_string()),
    };

    let job_id = coerce_job_id(job_id);
    match state.store.apply_classification(job_id, &update).await {
        Ok(true) => {
            let updated: Vec<&str> = update.flags.iter().map(|(key, _)| *key).collect();
            Json(json!({
                "success": true,
                "message": "AI analysis saved successfully",
                "job_id": job_id,
                "offerings_updated": updated,
            }))
            .into_response()
        }
        Ok(false) => reject(StatusCode::NOT_FOUND, "Job not found"),
        Err(err) => database_error(err),
    }
}

pub async fn update_status(State(state): State<AppState>, body: String) -> Response {
    let Some(data) = parse_object_body(&body) else {
        return reject(StatusCode::BAD_REQUEST, "Missing required fields");
    };
    let (Some(job_id), Some(raw_status)) = (
        data.get("job_id"),
        data.get("status").and_then(Value::as_str),
    ) else {
        return reject(StatusCode::BAD_REQUEST, "Missing required fields");
    };

    let Some(new_status) = JobStatus::parse(raw_status) else {
        return reject(
            StatusCode::BAD_REQUEST,
            format!("Invalid status: {raw_status}"),
        );
    };

    let job_id = coerce_job_id(job_id);
    match state.store.update_status(job_id, new_status).await {
        Ok(Some(transition)) => {
            state
                .status_hook
                .on_transition(job_id, transition.old_status, transition.new_status);
            Json(json!({
                "success": true,
                "message": "Status updated successfully",
                "old_status": transition.old_status.as_str(),
                "new_status": transition.new_status.as_str(),
            }))
            .into_response()
        }
        Ok(None) => reject(StatusCode::NOT_FOUND, "Job not found"),
        Err(err) => database_error(err),
    }
}

pub async fn update_job(State(state): State<AppState>, body: String) -> Response {
    let Some(data) = parse_object_body(&body) else {
        return reject(StatusCode::BAD_REQUEST, "Missing required fields");
    };
    let (Some(job_id), Some(updates)) = (
        data.get("job_id"),
        data.get("updates").and_then(Value::as_object),
    ) else {
        return reject(StatusCode::BAD_REQUEST, "Missing required fields");
    };

    let updates = match FieldUpdates::from_json(updates) {
        Ok(updates) => updates,
        Err(err) => return reject(StatusCode::BAD_REQUEST, err.to_string()),
    };
    if updates.is_empty() {
        return reject(StatusCode::BAD_REQUEST, "No valid fields to update");
    }

    let job_id = coerce_job_id(job_id);
    match state.store.update_fields(job_id, &updates).await {
        Ok(Some(affected_rows)) => {
            let updated_fields: Vec<&str> = updates.fields().collect();
            debug!(job_id, fields = ?updated_fields, "job updated");
            Json(json!({
                "success": true,
                "message": "Job updated successfully",
                "affected_rows": affected_rows,
                "updated_fields": updated_fields,
            }))
            .into_response()
        }
        Ok(None) => reject(StatusCode::NOT_FOUND, "Job not found"),
        Err(err) => database_error(err),
    }
}
