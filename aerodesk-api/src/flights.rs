use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use aerodesk_core::flight::{Flight, FlightUpdate};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
struct FlightListQuery {
    q: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/flights", get(list_flights).post(create_flight))
        .route(
            "/v1/flights/{number}",
            get(get_flight).put(update_flight).delete(delete_flight),
        )
}

async fn list_flights(
    State(state): State<AppState>,
    Query(query): Query<FlightListQuery>,
) -> Result<Json<Vec<Flight>>, AppError> {
    let flights = match query.q.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => state.flights.search(term).await?,
        _ => state.flights.list().await?,
    };
    Ok(Json(flights))
}

async fn get_flight(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<Flight>, AppError> {
    let flight = state
        .flights
        .find(&number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("flight {} not found", number)))?;
    Ok(Json(flight))
}

async fn create_flight(
    State(state): State<AppState>,
    Json(flight): Json<Flight>,
) -> Result<(StatusCode, Json<Flight>), AppError> {
    validate_flight_fields(
        &flight.flight_number,
        &flight.departure_location,
        &flight.arrival_location,
        &flight.gate,
    )?;

    // Gate and flight-number conflicts surface from the store as 409s.
    state.flights.create(&flight).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

async fn update_flight(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Json(update): Json<FlightUpdate>,
) -> Result<StatusCode, AppError> {
    validate_flight_fields(
        &update.flight_number,
        &update.departure_location,
        &update.arrival_location,
        &update.gate,
    )?;

    state
        .flights
        .find(&number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("flight {} not found", number)))?;

    state.flights.update(&number, &update).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_flight(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .flights
        .find(&number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("flight {} not found", number)))?;

    state.flights.delete_cascade(&number).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate_flight_fields(
    flight_number: &str,
    departure_location: &str,
    arrival_location: &str,
    gate: &str,
) -> Result<(), AppError> {
    if flight_number.trim().is_empty() {
        return Err(AppError::Validation("Flight number cannot be empty".to_string()));
    }
    if departure_location.trim().is_empty() {
        return Err(AppError::Validation(
            "Departure location cannot be empty".to_string(),
        ));
    }
    if arrival_location.trim().is_empty() {
        return Err(AppError::Validation(
            "Arrival location cannot be empty".to_string(),
        ));
    }
    if gate.trim().is_empty() {
        return Err(AppError::Validation("Gate cannot be empty".to_string()));
    }
    Ok(())
}
