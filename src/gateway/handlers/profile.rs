//! Profile handlers: registration, lookup, search, update and deletion
//!
//! Balance changes never happen here - only profile fields move. The
//! transfer endpoint lives in the transfer handler.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, ApiResult, ok};
use crate::models::{CreateProfileRequest, Profile, ProfileView, UpdateProfileRequest};
use crate::store::{collections, get_typed, insert_typed, replace_typed};

#[derive(Debug, Deserialize)]
pub struct ProfileSearchParams {
    /// Case-insensitive first-name substring match
    pub search: Option<String>,
}

/// GET /api/v1/profile/{pid}
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(pid): Path<Uuid>,
) -> ApiResult<ProfileView> {
    let (profile, _) =
        get_typed::<Profile>(state.store.as_ref(), collections::PROFILE, &pid.to_string()).await?;
    ok(ProfileView::from(&profile))
}

/// GET /api/v1/profile/list
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProfileSearchParams>,
) -> ApiResult<Vec<ProfileView>> {
    let rows = state.store.scan(collections::PROFILE).await?;

    let mut items: Vec<ProfileView> = rows
        .into_iter()
        .filter_map(|(_, value)| serde_json::from_value::<Profile>(value).ok())
        .filter(|p| match &params.search {
            Some(needle) => p
                .first_name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        })
        .map(|p| ProfileView::from(&p))
        .collect();
    items.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));

    if items.is_empty() {
        return ApiError::not_found("no profiles matched").into_err();
    }
    ok(items)
}

/// POST /api/v1/profile
///
/// The server assigns the identity. The email must be unused; the check is
/// best-effort at this layer (the dataset treats emails as unique but the
/// store does not index them).
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProfileView>>), ApiError> {
    req.validate().map_err(|e| ApiError::bad_request(e.to_string()))?;

    let rows = state.store.scan(collections::PROFILE).await?;
    let taken = rows
        .into_iter()
        .filter_map(|(_, value)| serde_json::from_value::<Profile>(value).ok())
        .any(|p| p.email.eq_ignore_ascii_case(&req.email));
    if taken {
        return Err(ApiError::conflict(format!(
            "a profile with email '{}' already exists",
            req.email
        )));
    }

    let pid = Uuid::new_v4();
    let profile = req.into_profile(pid);
    insert_typed(
        state.store.as_ref(),
        collections::PROFILE,
        &pid.to_string(),
        &profile,
    )
    .await?;

    tracing::info!("Profile created: {pid}");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ProfileView::from(&profile))),
    ))
}

/// PUT /api/v1/profile/{pid}
///
/// Field-level update. Identity and balance are preserved.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(pid): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<ProfileView> {
    req.validate().map_err(|e| ApiError::bad_request(e.to_string()))?;

    let key = pid.to_string();
    let (existing, cas) =
        get_typed::<Profile>(state.store.as_ref(), collections::PROFILE, &key).await?;

    let updated = req.apply_to(&existing);
    replace_typed(state.store.as_ref(), collections::PROFILE, &key, &updated, cas).await?;
    ok(ProfileView::from(&updated))
}

/// DELETE /api/v1/profile/{pid}
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(pid): Path<Uuid>,
) -> ApiResult<Uuid> {
    state
        .store
        .remove(collections::PROFILE, &pid.to_string())
        .await?;
    tracing::info!("Profile deleted: {pid}");
    ok(pid)
}
