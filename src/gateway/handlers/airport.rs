//! Airport handlers: key-value CRUD plus list and direct-connections queries

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, ApiResult, ok};
use crate::models::{Airport, CreateAirportRequest, Route};
use crate::store::{collections, get_typed, insert_typed, replace_typed};

#[derive(Debug, Deserialize)]
pub struct AirportListParams {
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DirectConnectionsParams {
    /// Source airport FAA code (e.g. "SFO")
    pub airport: String,
}

/// GET /api/v1/airport/list
pub async fn list_airports(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AirportListParams>,
) -> ApiResult<Vec<Airport>> {
    let rows = state.store.scan(collections::AIRPORT).await?;

    let mut items: Vec<Airport> = rows
        .into_iter()
        .filter_map(|(_, value)| serde_json::from_value(value).ok())
        .collect();

    if let Some(country) = &params.country {
        items.retain(|a| a.country.eq_ignore_ascii_case(country));
    }
    items.sort_by(|a, b| a.airport_name.cmp(&b.airport_name));

    if items.is_empty() {
        return ApiError::not_found("no airports matched").into_err();
    }
    ok(items)
}

/// GET /api/v1/airport/direct-connections
///
/// Destination airport codes reachable non-stop from the given airport.
pub async fn direct_connections(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DirectConnectionsParams>,
) -> ApiResult<Vec<String>> {
    let routes = state.store.scan(collections::ROUTE).await?;

    let mut destinations: Vec<String> = routes
        .into_iter()
        .filter_map(|(_, value)| serde_json::from_value::<Route>(value).ok())
        .filter(|r| r.source_airport.eq_ignore_ascii_case(&params.airport) && r.stops == 0)
        .map(|r| r.destination_airport)
        .collect();
    destinations.sort();
    destinations.dedup();

    if destinations.is_empty() {
        return ApiError::not_found("no direct connections").into_err();
    }
    ok(destinations)
}

/// GET /api/v1/airport/{id}
pub async fn get_airport(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Airport> {
    let (airport, _) =
        get_typed::<Airport>(state.store.as_ref(), collections::AIRPORT, &id).await?;
    ok(airport)
}

/// POST /api/v1/airport/{id}
pub async fn create_airport(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateAirportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Airport>>), ApiError> {
    let airport = req.into_airport();
    insert_typed(state.store.as_ref(), collections::AIRPORT, &id, &airport).await?;

    tracing::info!("Airport created: {id}");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(airport))))
}

/// PUT /api/v1/airport/{id}
pub async fn update_airport(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateAirportRequest>,
) -> ApiResult<Airport> {
    let (_, cas) = get_typed::<Airport>(state.store.as_ref(), collections::AIRPORT, &id).await?;

    let airport = req.into_airport();
    replace_typed(state.store.as_ref(), collections::AIRPORT, &id, &airport, cas).await?;
    ok(airport)
}

/// DELETE /api/v1/airport/{id}
pub async fn delete_airport(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    state.store.remove(collections::AIRPORT, &id).await?;
    tracing::info!("Airport deleted: {id}");
    ok(id)
}
