use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use aerodesk_core::service::{LuggageTier, ServiceRecord};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
struct UpsertServicesRequest {
    extra_drink: bool,
    extra_meal: bool,
    suit_center: bool,
    #[serde(default)]
    extra_luggage: LuggageTier,
    #[serde(default)]
    description: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/v1/boardings/{boarding_id}/services",
        get(get_services).put(upsert_services),
    )
}

async fn get_services(
    State(state): State<AppState>,
    Path(boarding_id): Path<i64>,
) -> Result<Json<ServiceRecord>, AppError> {
    state
        .boardings
        .find(boarding_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("boarding record {} not found", boarding_id)))?;

    let record = state.services.find(boarding_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "no services recorded for boarding {}",
            boarding_id
        ))
    })?;

    Ok(Json(record))
}

/// Insert-or-replace, keyed on the boarding id. Services can be sold any time
/// after check-in, independently of the boarding record itself.
async fn upsert_services(
    State(state): State<AppState>,
    Path(boarding_id): Path<i64>,
    Json(req): Json<UpsertServicesRequest>,
) -> Result<StatusCode, AppError> {
    state
        .boardings
        .find(boarding_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("boarding record {} not found", boarding_id)))?;

    state
        .services
        .upsert(&ServiceRecord {
            boarding_id,
            extra_drink: req.extra_drink,
            extra_meal: req.extra_meal,
            suit_center: req.suit_center,
            extra_luggage: req.extra_luggage,
            description: req.description,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
