//! Route handlers: key-value CRUD

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, ApiResult, ok};
use crate::models::{CreateRouteRequest, Route};
use crate::store::{collections, get_typed, insert_typed, replace_typed};

/// GET /api/v1/route/{id}
pub async fn get_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Route> {
    let (route, _) = get_typed::<Route>(state.store.as_ref(), collections::ROUTE, &id).await?;
    ok(route)
}

/// POST /api/v1/route/{id}
pub async fn create_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Route>>), ApiError> {
    let route = req.into_route();
    insert_typed(state.store.as_ref(), collections::ROUTE, &id, &route).await?;

    tracing::info!("Route created: {id}");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(route))))
}

/// PUT /api/v1/route/{id}
pub async fn update_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateRouteRequest>,
) -> ApiResult<Route> {
    let (_, cas) = get_typed::<Route>(state.store.as_ref(), collections::ROUTE, &id).await?;

    let route = req.into_route();
    replace_typed(state.store.as_ref(), collections::ROUTE, &id, &route, cas).await?;
    ok(route)
}

/// DELETE /api/v1/route/{id}
pub async fn delete_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    state.store.remove(collections::ROUTE, &id).await?;
    tracing::info!("Route deleted: {id}");
    ok(id)
}
