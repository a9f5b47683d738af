use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use aerodesk_core::boarding::BoardingRecord;
use aerodesk_core::passenger::{Passenger, PassengerUpdate};
use aerodesk_shared::pii::Masked;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
struct CreatePassengerRequest {
    passenger_id: String,
    first_name: String,
    last_name: String,
    gender: String,
    birth_date: NaiveDate,
    phone_number: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/passengers", get(list_passengers).post(create_passenger))
        .route(
            "/v1/passengers/{id}",
            get(get_passenger).put(update_passenger).delete(delete_passenger),
        )
        .route("/v1/passengers/{id}/boardings", get(list_boardings))
}

async fn list_passengers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Passenger>>, AppError> {
    Ok(Json(state.passengers.list().await?))
}

async fn get_passenger(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Passenger>, AppError> {
    let passenger = state
        .passengers
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("passenger {} not found", id)))?;
    Ok(Json(passenger))
}

async fn create_passenger(
    State(state): State<AppState>,
    Json(req): Json<CreatePassengerRequest>,
) -> Result<(StatusCode, Json<Passenger>), AppError> {
    if req.passenger_id.trim().is_empty()
        || req.first_name.trim().is_empty()
        || req.last_name.trim().is_empty()
        || req.gender.trim().is_empty()
        || req.phone_number.trim().is_empty()
    {
        return Err(AppError::Validation(
            "All fields must be filled out".to_string(),
        ));
    }

    let passenger = Passenger {
        passenger_id: req.passenger_id.trim().to_string(),
        first_name: req.first_name,
        last_name: req.last_name,
        gender: req.gender,
        birth_date: req.birth_date,
        phone_number: Masked(req.phone_number),
    };

    // Duplicate id and duplicate phone surface from the store as 409s.
    state.passengers.create(&passenger).await?;
    Ok((StatusCode::CREATED, Json(passenger)))
}

async fn update_passenger(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<PassengerUpdate>,
) -> Result<StatusCode, AppError> {
    state
        .passengers
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("passenger {} not found", id)))?;

    state.passengers.update(&id, &update).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Removes the passenger together with their boarding and service records,
/// children first.
async fn delete_passenger(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .passengers
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("passenger {} not found", id)))?;

    state.passengers.delete_cascade(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_boardings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BoardingRecord>>, AppError> {
    state
        .passengers
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("passenger {} not found", id)))?;

    Ok(Json(state.boardings.list_for_passenger(&id).await?))
}
