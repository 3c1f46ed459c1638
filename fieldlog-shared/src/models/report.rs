/// Activity report model and database operations
///
/// Reports are the core unit of work: one row per visit, phone call, or
/// email a staff member logs against a client.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE report_type AS ENUM ('visit', 'phone', 'email');
///
/// CREATE TABLE reports (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
///     report_type report_type NOT NULL,
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Submitting a visit-type report also advances the client's
/// `last_visited_at`; both writes happen in one transaction so the dashboard
/// never sees a visit without the matching timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Kind of sales activity a report records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "report_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// In-person visit (advances the client's last_visited_at)
    Visit,

    /// Phone call
    Phone,

    /// Email exchange
    Email,
}

impl ReportType {
    /// Converts type to string for display and export
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Visit => "visit",
            ReportType::Phone => "phone",
            ReportType::Email => "email",
        }
    }
}

/// An activity report
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    /// Unique report ID (UUID v4)
    pub id: Uuid,

    /// Author (authenticated user who filed the report)
    pub user_id: Uuid,

    /// Client the activity was performed against
    pub client_id: Uuid,

    /// Kind of activity
    pub report_type: ReportType,

    /// Free-text body: outcome, notes, follow-ups
    pub content: String,

    /// When the report was filed
    pub created_at: DateTime<Utc>,

    /// When the report was last edited
    pub updated_at: DateTime<Utc>,
}

/// Input for submitting a new report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReport {
    /// Author user ID
    pub user_id: Uuid,

    /// Target client ID
    pub client_id: Uuid,

    /// Kind of activity
    pub report_type: ReportType,

    /// Report body (must be non-empty; validated at the API layer)
    pub content: String,
}

/// Input for editing an existing report
///
/// Only non-None fields are updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReport {
    /// New activity kind
    pub report_type: Option<ReportType>,

    /// New body text
    pub content: Option<String>,
}

/// A report joined with its client's name, for the personal report list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReportWithClient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub report_type: ReportType,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Name of the client the report was filed against
    pub client_name: String,
}

/// A report joined with its author's display name, for the history timeline
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReportWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub report_type: ReportType,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Display name of the author (None if the profile is missing)
    pub author_name: Option<String>,
}

/// One row of the CSV export: report plus both joined names
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportExportRow {
    pub created_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub client_name: String,
    pub report_type: ReportType,
    pub content: String,
}

impl Report {
    /// Submits a new report
    ///
    /// Inserts the report and, for visit-type reports, advances the client's
    /// `last_visited_at` to the report's timestamp. Both writes run in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the client or user doesn't exist (foreign key
    /// violation) or the database is unreachable.
    pub async fn submit(pool: &PgPool, data: CreateReport) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (user_id, client_id, report_type, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, client_id, report_type, content, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.client_id)
        .bind(data.report_type)
        .bind(data.content)
        .fetch_one(&mut *tx)
        .await?;

        if report.report_type == ReportType::Visit {
            sqlx::query(
                r#"
                UPDATE clients
                SET last_visited_at = $2
                WHERE id = $1
                "#,
            )
            .bind(report.client_id)
            .bind(report.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(report)
    }

    /// Finds a report by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, user_id, client_id, report_type, content, created_at, updated_at
            FROM reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(report)
    }

    /// Lists one user's reports with client names, newest first
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<ReportWithClient>, sqlx::Error> {
        let reports = sqlx::query_as::<_, ReportWithClient>(
            r#"
            SELECT r.id, r.user_id, r.client_id, r.report_type, r.content,
                   r.created_at, r.updated_at, c.name AS client_name
            FROM reports r
            JOIN clients c ON c.id = r.client_id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(reports)
    }

    /// Lists all reports for one client with author names, newest first
    ///
    /// This is the cross-team history timeline: any authenticated user can
    /// read it.
    pub async fn list_by_client(
        pool: &PgPool,
        client_id: Uuid,
    ) -> Result<Vec<ReportWithAuthor>, sqlx::Error> {
        let reports = sqlx::query_as::<_, ReportWithAuthor>(
            r#"
            SELECT r.id, r.user_id, r.client_id, r.report_type, r.content,
                   r.created_at, r.updated_at, p.name AS author_name
            FROM reports r
            LEFT JOIN profiles p ON p.id = r.user_id
            WHERE r.client_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(pool)
        .await?;

        Ok(reports)
    }

    /// Edits an existing report's type and/or content
    ///
    /// Returns the updated report, or None if it doesn't exist. Authorship
    /// checks belong to the caller.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateReport,
    ) -> Result<Option<Self>, sqlx::Error> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            UPDATE reports
            SET report_type = COALESCE($2, report_type),
                content = COALESCE($3, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, client_id, report_type, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.report_type)
        .bind(data.content)
        .fetch_optional(pool)
        .await?;

        Ok(report)
    }

    /// Deletes a report by ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts reports filed at or after `since` (None = all reports)
    pub async fn count_since(
        pool: &PgPool,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = match since {
            Some(ts) => {
                sqlx::query_as("SELECT COUNT(*) FROM reports WHERE created_at >= $1")
                    .bind(ts)
                    .fetch_one(pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM reports")
                    .fetch_one(pool)
                    .await?
            }
        };

        Ok(count)
    }

    /// Lists every report with author and client names, oldest first
    ///
    /// Feeds the dashboard CSV export.
    pub async fn list_for_export(pool: &PgPool) -> Result<Vec<ReportExportRow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ReportExportRow>(
            r#"
            SELECT r.created_at, p.name AS author_name, c.name AS client_name,
                   r.report_type, r.content
            FROM reports r
            JOIN clients c ON c.id = r.client_id
            LEFT JOIN profiles p ON p.id = r.user_id
            ORDER BY r.created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
