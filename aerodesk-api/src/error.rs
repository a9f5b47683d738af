use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use aerodesk_checkin::CheckInError;
use aerodesk_core::repository::StoreError;

#[derive(Debug)]
pub enum AppError {
    Authentication(String),
    Authorization(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Authorization(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unavailable(msg) => {
                tracing::warn!("Store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Store temporarily unavailable, please retry".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(kind) => AppError::Conflict(kind.to_string()),
            StoreError::Unavailable(msg) => AppError::Unavailable(msg),
            StoreError::Database(msg) => AppError::Internal(msg),
        }
    }
}

impl From<CheckInError> for AppError {
    fn from(err: CheckInError) -> Self {
        match &err {
            CheckInError::PassengerNotFound(_)
            | CheckInError::FlightNotFound(_)
            | CheckInError::BoardingNotFound(_) => AppError::NotFound(err.to_string()),
            CheckInError::NoActiveFlight
            | CheckInError::NoSeatSelected
            | CheckInError::UnknownSeat(_) => AppError::Validation(err.to_string()),
            CheckInError::SeatUnavailable(_)
            | CheckInError::SeatTaken(_)
            | CheckInError::DuplicateCheckIn => AppError::Conflict(err.to_string()),
            CheckInError::StoreUnavailable(msg) => AppError::Unavailable(msg.clone()),
            CheckInError::Store(msg) => AppError::Internal(msg.clone()),
        }
    }
}
