use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use aerodesk_checkin::{CabinSection, SeatState};
use aerodesk_core::boarding::BoardingRecord;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
struct CommitCheckInRequest {
    passenger_id: String,
    flight_number: String,
    seat_label: String,
    baggage_allowance_kg: Option<i32>,
}

#[derive(Debug, Serialize)]
struct CheckInResponse {
    boarding: BoardingRecord,
    passenger_name: String,
}

#[derive(Debug, Serialize)]
struct SeatView {
    label: String,
    section: CabinSection,
    state: SeatState,
}

#[derive(Debug, Serialize)]
struct SeatMapResponse {
    flight_number: String,
    gate: String,
    route: String,
    seats: Vec<SeatView>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/flights/{number}/seatmap", get(seat_map))
        .route("/v1/checkins", post(commit_check_in))
        .route("/v1/checkins/{boarding_id}", delete(cancel_check_in))
}

/// Current occupancy for one flight, rendered straight from the seat map.
async fn seat_map(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<SeatMapResponse>, AppError> {
    let mut desk = state.desk();
    let flight = desk.lookup_flight(&number).await?;

    let seats = desk
        .seat_map()
        .seats()
        .map(|(label, section, seat_state)| SeatView {
            label: label.to_string(),
            section,
            state: seat_state,
        })
        .collect();

    Ok(Json(SeatMapResponse {
        flight_number: flight.flight_number.clone(),
        gate: flight.gate.clone(),
        route: flight.route(),
        seats,
    }))
}

/// Runs the whole check-in workflow for one request: passenger lookup, flight
/// lookup with seat-map load, seat selection, then the guarded commit.
async fn commit_check_in(
    State(state): State<AppState>,
    Json(req): Json<CommitCheckInRequest>,
) -> Result<(StatusCode, Json<CheckInResponse>), AppError> {
    let mut desk = state.desk();

    let passenger = desk.lookup_passenger(&req.passenger_id).await?;
    desk.lookup_flight(&req.flight_number).await?;
    desk.select_seat(&req.seat_label)?;

    let boarding = desk
        .commit_selected(&req.passenger_id, req.baggage_allowance_kg)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckInResponse {
            boarding,
            passenger_name: passenger.full_name(),
        }),
    ))
}

/// The explicit seat-release path: deletes one boarding record and its
/// services row.
async fn cancel_check_in(
    State(state): State<AppState>,
    Path(boarding_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut desk = state.desk();
    desk.cancel_check_in(boarding_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
