//! The `JobStore`: every query the application runs, behind typed methods.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use joblead_core::{Contact, Job, JobStatus, NewContact, NewJob, OfferingFlags, OFFERINGS};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::updates::{BindValue, FieldUpdates};
use crate::Result;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company TEXT NOT NULL,
    role_title TEXT NOT NULL,
    location TEXT,
    job_description TEXT,
    job_overview TEXT,
    why_now TEXT,
    recommended_angle TEXT,
    industry TEXT,
    employment_type TEXT,
    engagement_type TEXT,
    parent_company TEXT,
    posted_date TEXT,
    last_seen_date TEXT,
    fit_score INTEGER NOT NULL DEFAULT 0,
    confidence TEXT,
    verification_level TEXT,
    revenue_tier TEXT,
    revenue_estimate TEXT,
    revenue_confidence TEXT,
    source_link TEXT,
    status TEXT NOT NULL DEFAULT 'New',
    sustainability_reporting INTEGER NOT NULL DEFAULT 0,
    data_management_esg INTEGER NOT NULL DEFAULT 0,
    esg_strategy_roadmapping INTEGER NOT NULL DEFAULT 0,
    regulatory_compliance INTEGER NOT NULL DEFAULT 0,
    esg_ratings_rankings INTEGER NOT NULL DEFAULT 0,
    stakeholder_engagement INTEGER NOT NULL DEFAULT 0,
    governance_policy INTEGER NOT NULL DEFAULT 0,
    technology_tools INTEGER NOT NULL DEFAULT 0,
    ai_analysis_notes TEXT,
    ai_analyzed_at TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_jobs_company_role
    ON jobs(company, role_title);

CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id INTEGER NOT NULL REFERENCES jobs(id),
    name TEXT NOT NULL,
    title TEXT,
    confidence TEXT,
    source TEXT
);

CREATE INDEX IF NOT EXISTS idx_contacts_job ON contacts(job_id);
"#;

/// Result of one insertion attempt through the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    Duplicate,
}

/// Dashboard row: a job plus its primary (first) contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub id: i64,
    pub company: String,
    pub role_title: String,
    pub status: JobStatus,
    pub contact_name: Option<String>,
    pub contact_title: Option<String>,
}

/// Outcome of a successful status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub old_status: JobStatus,
    pub new_status: JobStatus,
}

/// Classification result validated against the offering catalog, ready to
/// apply to a job. Flag keys are always catalog constants, never caller
/// input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationUpdate {
    pub flags: Vec<(&'static str, bool)>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Private in-memory database, used by tests and the one-shot CLI
    /// import path. One connection: each in-memory connection is its own
    /// database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Exact, case-sensitive (company, role_title) lookup.
    pub async fn find_duplicate(&self, company: &str, role_title: &str) -> Result<Option<i64>> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM jobs WHERE company = ?1 AND role_title = ?2 LIMIT 1",
        )
        .bind(company)
        .bind(role_title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }

    /// Insert a job and its contacts as one transaction.
    ///
    /// The duplicate check runs inside the transaction; a concurrent import
    /// that slips past it trips the unique index instead, and both paths
    /// report [`InsertOutcome::Duplicate`].
    pub async fn insert_job_with_contacts(
        &self,
        job: &NewJob,
        contacts: &[NewContact],
    ) -> Result<InsertOutcome> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM jobs WHERE company = ?1 AND role_title = ?2 LIMIT 1",
        )
        .bind(&job.company)
        .bind(&job.role_title)
        .fetch_optional(&mut *tx)
        .await?;
        if existing.is_some() {
            return Ok(InsertOutcome::Duplicate);
        }

        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO jobs (
                company, role_title, job_description, job_overview, location,
                posted_date, last_seen_date, employment_type, why_now,
                verification_level, confidence, revenue_tier, revenue_estimate,
                revenue_confidence, fit_score, engagement_type,
                recommended_angle, industry, source_link, parent_company, status
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21
            )
            RETURNING id
            "#,
        )
        .bind(&job.company)
        .bind(&job.role_title)
        .bind(&job.job_description)
        .bind(&job.job_overview)
        .bind(&job.location)
        .bind(job.posted_date)
        .bind(job.last_seen_date)
        .bind(&job.employment_type)
        .bind(&job.why_now)
        .bind(&job.verification_level)
        .bind(&job.confidence)
        .bind(&job.revenue_tier)
        .bind(&job.revenue_estimate)
        .bind(&job.revenue_confidence)
        .bind(job.fit_score)
        .bind(&job.engagement_type)
        .bind(&job.recommended_angle)
        .bind(&job.industry)
        .bind(&job.source_link)
        .bind(&job.parent_company)
        .bind(job.status.as_str())
        .fetch_one(&mut *tx)
        .await;

        let job_id = match inserted {
            Ok(id) => id,
            Err(err) if is_unique_violation(&err) => return Ok(InsertOutcome::Duplicate),
            Err(err) => return Err(err.into()),
        };

        for contact in contacts {
            sqlx::query(
                "INSERT INTO contacts (job_id, name, title, confidence, source)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(job_id)
            .bind(&contact.name)
            .bind(&contact.title)
            .bind(&contact.confidence)
            .bind(&contact.source)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(InsertOutcome::Inserted(job_id))
    }

    pub async fn get_job(&self, id: i64) -> Result<Option<Job>> {
        let row = sqlx::query("SELECT * FROM jobs WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_job(&r)).transpose()
    }

    pub async fn job_exists(&self, id: i64) -> Result<bool> {
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM jobs WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn contacts_for(&self, job_id: i64) -> Result<Vec<Contact>> {
        let rows = sqlx::query(
            "SELECT id, job_id, name, title, confidence, source
             FROM contacts WHERE job_id = ?1 ORDER BY id",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Contact {
                    id: row.try_get("id")?,
                    job_id: row.try_get("job_id")?,
                    name: row.try_get("name")?,
                    title: row.try_get("title")?,
                    confidence: row.try_get("confidence")?,
                    source: row.try_get("source")?,
                })
            })
            .collect()
    }

    /// All jobs, newest first, each with its first contact for the
    /// dashboard table.
    pub async fn list_jobs(&self) -> Result<Vec<JobSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT j.id, j.company, j.role_title, j.status,
                   c.name AS contact_name, c.title AS contact_title
              FROM jobs j
              LEFT JOIN contacts c ON c.id = (
                  SELECT id FROM contacts WHERE job_id = j.id ORDER BY id LIMIT 1
              )
             ORDER BY j.created_at DESC, j.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let status: String = row.try_get("status")?;
                Ok(JobSummary {
                    id: row.try_get("id")?,
                    company: row.try_get("company")?,
                    role_title: row.try_get("role_title")?,
                    status: JobStatus::parse(&status).unwrap_or_default(),
                    contact_name: row.try_get("contact_name")?,
                    contact_title: row.try_get("contact_title")?,
                })
            })
            .collect()
    }

    /// Store the new status, returning the transition, or `None` when the
    /// job does not exist. Input is already canonicalized by
    /// [`JobStatus::parse`].
    pub async fn update_status(
        &self,
        id: i64,
        new_status: JobStatus,
    ) -> Result<Option<StatusTransition>> {
        let old: Option<String> =
            sqlx::query_scalar("SELECT status FROM jobs WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        let Some(old) = old else {
            return Ok(None);
        };

        sqlx::query("UPDATE jobs SET status = ?1 WHERE id = ?2")
            .bind(new_status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Some(StatusTransition {
            old_status: JobStatus::parse(&old).unwrap_or_default(),
            new_status,
        }))
    }

    /// Apply an analysis callback: set the present flags, overwrite notes
    /// when given, and always stamp `ai_analyzed_at`. Last write wins.
    /// Returns false when the job does not exist.
    pub async fn apply_classification(
        &self,
        id: i64,
        update: &ClassificationUpdate,
    ) -> Result<bool> {
        if !self.job_exists(id).await? {
            return Ok(false);
        }

        let mut set_clauses: Vec<String> = update
            .flags
            .iter()
            .map(|(key, _)| format!("{key} = ?"))
            .collect();
        if update.notes.is_some() {
            set_clauses.push("ai_analysis_notes = ?".to_string());
        }
        set_clauses.push("ai_analyzed_at = ?".to_string());

        let sql = format!("UPDATE jobs SET {} WHERE id = ?", set_clauses.join(", "));
        let mut query = sqlx::query(&sql);
        for (_, value) in &update.flags {
            query = query.bind(if *value { 1i64 } else { 0i64 });
        }
        if let Some(notes) = &update.notes {
            query = query.bind(notes);
        }
        query = query.bind(Utc::now());
        query.bind(id).execute(&self.pool).await?;

        debug!(job_id = id, flags = update.flags.len(), "AI analysis applied");
        Ok(true)
    }

    /// Apply an allow-listed field update. Returns the affected row count,
    /// or `None` when the job does not exist. The caller guarantees
    /// `updates` is non-empty.
    pub async fn update_fields(&self, id: i64, updates: &FieldUpdates) -> Result<Option<u64>> {
        if !self.job_exists(id).await? {
            return Ok(None);
        }

        let set_clause = updates
            .sets
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE jobs SET {set_clause} WHERE id = ?");

        let mut query = sqlx::query(&sql);
        for (_, value) in &updates.sets {
            query = match value {
                BindValue::Text(text) => query.bind(text.clone()),
                BindValue::Int(n) => query.bind(*n),
                BindValue::Date(date) => query.bind(*date),
            };
        }
        let result = query.bind(id).execute(&self.pool).await?;
        Ok(Some(result.rows_affected()))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().map(|db| db.kind()),
        Some(sqlx::error::ErrorKind::UniqueViolation)
    )
}

fn row_to_job(row: &SqliteRow) -> Result<Job> {
    let status: String = row.try_get("status")?;
    let mut offerings = OfferingFlags::default();
    for offering in &OFFERINGS {
        let flag: i64 = row.try_get(offering.key)?;
        offerings.set(offering.key, flag != 0);
    }

    let posted_date: Option<NaiveDate> = row.try_get("posted_date")?;
    let last_seen_date: Option<NaiveDate> = row.try_get("last_seen_date")?;
    let ai_analyzed_at: Option<DateTime<Utc>> = row.try_get("ai_analyzed_at")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Job {
        id: row.try_get("id")?,
        company: row.try_get("company")?,
        role_title: row.try_get("role_title")?,
        location: row.try_get("location")?,
        job_description: row.try_get("job_description")?,
        job_overview: row.try_get("job_overview")?,
        why_now: row.try_get("why_now")?,
        recommended_angle: row.try_get("recommended_angle")?,
        industry: row.try_get("industry")?,
        employment_type: row.try_get("employment_type")?,
        engagement_type: row.try_get("engagement_type")?,
        parent_company: row.try_get("parent_company")?,
        posted_date,
        last_seen_date,
        fit_score: row.try_get("fit_score")?,
        confidence: row.try_get("confidence")?,
        verification_level: row.try_get("verification_level")?,
        revenue_tier: row.try_get("revenue_tier")?,
        revenue_estimate: row.try_get("revenue_estimate")?,
        revenue_confidence: row.try_get("revenue_confidence")?,
        source_link: row.try_get("source_link")?,
        status: JobStatus::parse(&status).unwrap_or_default(),
        offerings,
        ai_analysis_notes: row.try_get("ai_analysis_notes")?,
        ai_analyzed_at,
        created_at,
    })
}
