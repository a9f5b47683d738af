use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A committed check-in: one passenger, one flight, one seat.
///
/// Uniqueness of (flight_number, seat_label) and of (passenger_id,
/// flight_number) is enforced by the store, not by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardingRecord {
    pub boarding_id: i64,
    pub passenger_id: String,
    pub flight_number: String,
    pub seat_label: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub baggage_allowance_kg: i32,
}

/// Insert payload; the store assigns the boarding id.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBoarding {
    pub passenger_id: String,
    pub flight_number: String,
    pub seat_label: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub baggage_allowance_kg: i32,
}
