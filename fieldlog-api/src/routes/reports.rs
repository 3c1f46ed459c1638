/// Activity report endpoints
///
/// # Endpoints
///
/// - `POST /v1/reports` - File a report (visits advance the client's
///   last-visited timestamp)
/// - `GET /v1/reports` - The caller's reports, newest first
/// - `PATCH /v1/reports/:id` - Edit a report (author or leader)
/// - `DELETE /v1/reports/:id` - Delete a report (author or leader)
/// - `GET /v1/clients/:id/reports` - Cross-team history for one client

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use fieldlog_shared::{
    auth::{authorization, middleware::AuthContext},
    models::{
        client::Client,
        report::{CreateReport, Report, ReportType, ReportWithAuthor, ReportWithClient, UpdateReport},
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create report request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    /// Client the activity was with
    pub client_id: Uuid,

    /// Kind of activity
    pub report_type: ReportType,

    /// Report body
    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
}

/// Update report request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReportRequest {
    /// New activity kind, if changing
    pub report_type: Option<ReportType>,

    /// New body, if changing
    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: Option<String>,
}

/// Files a new report for the calling user
///
/// Visit reports also advance the client's `last_visited_at`, in the same
/// transaction as the insert.
///
/// # Errors
///
/// - `404 Not Found`: Unknown client
/// - `422 Unprocessable Entity`: Empty or oversized content
pub async fn create_report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateReportRequest>,
) -> ApiResult<(StatusCode, Json<Report>)> {
    req.validate().map_err(ApiError::from_validation)?;

    Client::find_by_id(&state.db, req.client_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

    let report = Report::submit(
        &state.db,
        CreateReport {
            user_id: auth.user_id,
            client_id: req.client_id,
            report_type: req.report_type,
            content: req.content,
        },
    )
    .await?;

    tracing::info!(report_id = %report.id, client_id = %req.client_id, "report filed");

    Ok((StatusCode::CREATED, Json(report)))
}

/// Lists the caller's reports with client names, newest first
pub async fn list_my_reports(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<ReportWithClient>>> {
    let reports = Report::list_by_user(&state.db, auth.user_id).await?;

    Ok(Json(reports))
}

/// Full history for one client across the whole team, newest first
///
/// Readable by any authenticated user; this is the before-the-visit context
/// view.
///
/// # Errors
///
/// - `404 Not Found`: Unknown client
pub async fn client_history(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> ApiResult<Json<Vec<ReportWithAuthor>>> {
    Client::find_by_id(&state.db, client_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

    let reports = Report::list_by_client(&state.db, client_id).await?;

    Ok(Json(reports))
}

/// Edits a report's type and/or content
///
/// Only the author or a leader may edit.
///
/// # Errors
///
/// - `403 Forbidden`: Neither author nor leader
/// - `404 Not Found`: Unknown report
pub async fn update_report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(report_id): Path<Uuid>,
    Json(req): Json<UpdateReportRequest>,
) -> ApiResult<Json<Report>> {
    req.validate().map_err(ApiError::from_validation)?;

    let existing = Report::find_by_id(&state.db, report_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Report not found".to_string()))?;

    authorization::require_author_or_leader(&state.db, auth.user_id, existing.user_id).await?;

    let updated = Report::update(
        &state.db,
        report_id,
        UpdateReport {
            report_type: req.report_type,
            content: req.content,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Report not found".to_string()))?;

    Ok(Json(updated))
}

/// Deletes a report
///
/// Only the author or a leader may delete.
pub async fn delete_report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(report_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let existing = Report::find_by_id(&state.db, report_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Report not found".to_string()))?;

    authorization::require_author_or_leader(&state.db, auth.user_id, existing.user_id).await?;

    Report::delete(&state.db, report_id).await?;

    tracing::info!(report_id = %report_id, "report deleted");

    Ok(StatusCode::NO_CONTENT)
}
