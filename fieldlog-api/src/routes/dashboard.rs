/// Leader dashboard endpoints
///
/// Aggregates team activity and flags dormant clients. Both endpoints are
/// gated on the leader role.
///
/// # Endpoints
///
/// - `GET /v1/dashboard` - Counts plus dormant-client list
/// - `GET /v1/dashboard/export` - All reports as CSV

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use fieldlog_shared::{
    auth::{authorization, middleware::AuthContext},
    models::{client::Client, report::Report},
};
use serde::Serialize;

/// A client is dormant when its last visit is older than this
const DORMANT_AFTER_DAYS: i64 = 14;

/// Dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Reports filed since midnight UTC
    pub reports_today: i64,

    /// Reports filed in the last 7 days
    pub reports_this_week: i64,

    /// All reports ever filed
    pub reports_total: i64,

    /// Clients with no visit in the last 14 days, never-visited first
    pub dormant_clients: Vec<DormantClient>,
}

/// A dormant client entry
#[derive(Debug, Serialize)]
pub struct DormantClient {
    /// Client ID
    pub id: String,

    /// Client name
    pub name: String,

    /// Last recorded visit (None if never visited)
    pub last_visited_at: Option<DateTime<Utc>>,

    /// Whole days since the last visit (None if never visited)
    pub days_since_visit: Option<i64>,
}

/// Team activity summary with dormant-client alerts
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a leader
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<DashboardResponse>> {
    authorization::require_leader(&state.db, auth.user_id).await?;

    let now = Utc::now();
    let midnight = now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc();

    let reports_today = Report::count_since(&state.db, Some(midnight)).await?;
    let reports_this_week = Report::count_since(&state.db, Some(now - Duration::days(7))).await?;
    let reports_total = Report::count_since(&state.db, None).await?;

    let cutoff = now - Duration::days(DORMANT_AFTER_DAYS);
    let dormant_clients = Client::list_dormant(&state.db, cutoff)
        .await?
        .into_iter()
        .map(|c| DormantClient {
            id: c.id.to_string(),
            name: c.name,
            last_visited_at: c.last_visited_at,
            days_since_visit: c.last_visited_at.map(|ts| (now - ts).num_days()),
        })
        .collect();

    Ok(Json(DashboardResponse {
        reports_today,
        reports_this_week,
        reports_total,
        dormant_clients,
    }))
}

/// Exports every report as CSV, oldest first
///
/// Columns: date, author, client, type, content. Served as an attachment.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a leader
pub async fn export_csv(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<impl IntoResponse> {
    authorization::require_leader(&state.db, auth.user_id).await?;

    let rows = Report::list_for_export(&state.db).await?;

    let mut csv = String::from("date,author,client,type,content\n");
    for row in &rows {
        write_csv_row(
            &mut csv,
            &[
                &row.created_at.to_rfc3339(),
                row.author_name.as_deref().unwrap_or(""),
                &row.client_name,
                row.report_type.as_str(),
                &row.content,
            ],
        );
    }

    tracing::info!(rows = rows.len(), "exported report CSV");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"reports.csv\"",
            ),
        ],
        csv,
    ))
}

/// Appends one RFC 4180 record
///
/// Fields containing commas, quotes, or newlines are quoted, with embedded
/// quotes doubled.
fn write_csv_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }

        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields_unquoted() {
        let mut out = String::new();
        write_csv_row(&mut out, &["2026-01-01", "Kim", "Acme", "visit", "done"]);
        assert_eq!(out, "2026-01-01,Kim,Acme,visit,done\n");
    }

    #[test]
    fn test_commas_and_quotes_escaped() {
        let mut out = String::new();
        write_csv_row(&mut out, &["a,b", "said \"hi\"", "plain"]);
        assert_eq!(out, "\"a,b\",\"said \"\"hi\"\"\",plain\n");
    }

    #[test]
    fn test_newlines_quoted() {
        let mut out = String::new();
        write_csv_row(&mut out, &["line1\nline2"]);
        assert_eq!(out, "\"line1\nline2\"\n");
    }

    #[test]
    fn test_empty_fields() {
        let mut out = String::new();
        write_csv_row(&mut out, &["", "x", ""]);
        assert_eq!(out, ",x,\n");
    }
}
