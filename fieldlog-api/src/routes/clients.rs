/// Client directory endpoints
///
/// Search feeds the debounced search box; resolve is the submit-time
/// lookup-or-create; lookup and create exist so remote callers can run the
/// same resolution algorithm locally over HTTP.
///
/// # Endpoints
///
/// - `GET /v1/clients/search?q=<pattern>&limit=<n>` - Substring search
/// - `GET /v1/clients/lookup?name=<name>` - Exact-name lookup
/// - `POST /v1/clients` - Create a client (409 on duplicate name)
/// - `POST /v1/clients/resolve` - Lookup-or-create by name

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use fieldlog_shared::{
    directory::{postgres::PgDirectory, ClientRecord, Directory, SEARCH_LIMIT},
    resolver,
};
use serde::{Deserialize, Serialize};

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Substring to match against client names
    pub q: String,

    /// Maximum results, clamped to [`SEARCH_LIMIT`]
    pub limit: Option<i64>,
}

/// Exact-lookup query parameters
#[derive(Debug, Deserialize)]
pub struct LookupParams {
    /// Exact client name (case-insensitive)
    pub name: String,
}

/// Create client request
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    /// Client name
    pub name: String,
}

/// Resolve request
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    /// Typed client name
    pub name: String,

    /// Search results visible to the user at submit time
    #[serde(default)]
    pub current_results: Vec<ClientRecord>,
}

/// Resolve response
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    /// The client the name resolved to
    pub client: ClientRecord,

    /// Whether this request created the client
    pub created: bool,
}

/// Substring search over client names
///
/// Returns at most five matches regardless of the requested limit.
pub async fn search_clients(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<ClientRecord>>> {
    let limit = params.limit.unwrap_or(SEARCH_LIMIT).clamp(1, SEARCH_LIMIT);

    let directory = PgDirectory::new(state.db.clone());
    let results = directory.search(params.q.trim(), limit).await?;

    Ok(Json(results))
}

/// Case-insensitive exact-name lookup
///
/// # Errors
///
/// - `404 Not Found`: No client with that name
pub async fn lookup_client(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> ApiResult<Json<ClientRecord>> {
    let directory = PgDirectory::new(state.db.clone());

    let client = directory
        .find_exact(&params.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

    Ok(Json(client))
}

/// Creates a client
///
/// # Errors
///
/// - `409 Conflict`: A client with this name already exists
/// - `422 Unprocessable Entity`: Empty name
pub async fn create_client(
    State(state): State<AppState>,
    Json(req): Json<CreateClientRequest>,
) -> ApiResult<(StatusCode, Json<ClientRecord>)> {
    let directory = PgDirectory::new(state.db.clone());
    let client = directory.insert(&req.name).await?;

    tracing::info!(client_id = %client.id, "created client");

    Ok((StatusCode::CREATED, Json(client)))
}

/// Resolves a typed name to exactly one client, creating it if needed
///
/// Safe under concurrent submissions of the same name: the loser of the
/// insert race is redirected to the winner's row.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Empty name
/// - `503 Service Unavailable`: Client vanished mid-race, retry
pub async fn resolve_client(
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> ApiResult<Json<ResolveResponse>> {
    let directory = PgDirectory::new(state.db.clone());

    let resolution = resolver::resolve(&directory, &req.name, &req.current_results).await?;

    Ok(Json(ResolveResponse {
        client: resolution.client,
        created: resolution.created,
    }))
}
