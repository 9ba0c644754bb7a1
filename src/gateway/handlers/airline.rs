//! Airline handlers: key-value CRUD plus the list and to-airport queries

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, ApiResult, ok};
use crate::models::{Airline, CreateAirlineRequest, Route};
use crate::store::{collections, get_typed, insert_typed, replace_typed};

#[derive(Debug, Deserialize)]
pub struct AirlineListParams {
    /// Optional country filter (e.g. "France", "United States")
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToAirportParams {
    /// Destination airport FAA code (e.g. "SFO", "JFK")
    pub airport: String,
}

/// GET /api/v1/airline/list
///
/// List airlines, optionally filtered by country, ordered by name.
pub async fn list_airlines(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AirlineListParams>,
) -> ApiResult<Vec<Airline>> {
    let rows = state.store.scan(collections::AIRLINE).await?;

    let mut items: Vec<Airline> = rows
        .into_iter()
        .filter_map(|(_, value)| serde_json::from_value(value).ok())
        .collect();

    if let Some(country) = &params.country {
        items.retain(|a| a.country.eq_ignore_ascii_case(country));
    }
    items.sort_by(|a, b| a.name.cmp(&b.name));

    if items.is_empty() {
        return ApiError::not_found("no airlines matched").into_err();
    }
    ok(items)
}

/// GET /api/v1/airline/to-airport
///
/// Airlines flying to the given destination airport, resolved through the
/// route collection.
pub async fn airlines_to_airport(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ToAirportParams>,
) -> ApiResult<Vec<Airline>> {
    let routes = state.store.scan(collections::ROUTE).await?;

    let mut airline_ids: Vec<String> = routes
        .into_iter()
        .filter_map(|(_, value)| serde_json::from_value::<Route>(value).ok())
        .filter(|r| r.destination_airport.eq_ignore_ascii_case(&params.airport))
        .map(|r| r.airline_id)
        .collect();
    airline_ids.sort();
    airline_ids.dedup();

    let mut items = Vec::with_capacity(airline_ids.len());
    for id in airline_ids {
        // Routes may reference airlines that are not in the store; skip those
        if let Ok((airline, _)) =
            get_typed::<Airline>(state.store.as_ref(), collections::AIRLINE, &id).await
        {
            items.push(airline);
        }
    }
    items.sort_by(|a, b| a.name.cmp(&b.name));

    if items.is_empty() {
        return ApiError::not_found("no airlines fly there").into_err();
    }
    ok(items)
}

/// GET /api/v1/airline/{id}
pub async fn get_airline(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Airline> {
    let (airline, _) =
        get_typed::<Airline>(state.store.as_ref(), collections::AIRLINE, &id).await?;
    ok(airline)
}

/// POST /api/v1/airline/{id}
pub async fn create_airline(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateAirlineRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Airline>>), ApiError> {
    let airline = req.into_airline();
    insert_typed(state.store.as_ref(), collections::AIRLINE, &id, &airline).await?;

    tracing::info!("Airline created: {id}");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(airline))))
}

/// PUT /api/v1/airline/{id}
///
/// Replace conditioned on the version read here, so a racing update is
/// reported as a write conflict instead of silently lost.
pub async fn update_airline(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateAirlineRequest>,
) -> ApiResult<Airline> {
    let (_, cas) = get_typed::<Airline>(state.store.as_ref(), collections::AIRLINE, &id).await?;

    let airline = req.into_airline();
    replace_typed(state.store.as_ref(), collections::AIRLINE, &id, &airline, cas).await?;
    ok(airline)
}

/// DELETE /api/v1/airline/{id}
pub async fn delete_airline(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    state.store.remove(collections::AIRLINE, &id).await?;
    tracing::info!("Airline deleted: {id}");
    ok(id)
}
