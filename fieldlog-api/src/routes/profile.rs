/// Own-profile endpoints
///
/// # Endpoints
///
/// - `GET /v1/profile` - Fetch the caller's profile
/// - `PATCH /v1/profile` - Update the caller's display name

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use fieldlog_shared::{
    auth::middleware::AuthContext,
    models::profile::{Profile, ProfileRole},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// User ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Access role
    pub role: ProfileRole,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            name: profile.name,
            role: profile.role,
        }
    }
}

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Returns the caller's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = Profile::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile.into()))
}

/// Updates the caller's display name
///
/// Role changes are not accepted here; leaders are promoted directly in the
/// database.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let profile = Profile::update_name(&state.db, auth.user_id, &req.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile.into()))
}
