use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled flight, keyed by its public flight number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub flight_number: String,
    pub departure_location: String,
    pub arrival_location: String,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub gate: String,
}

impl Flight {
    /// "ORIGIN - DESTINATION" summary shown on the check-in screen.
    pub fn route(&self) -> String {
        format!("{} - {}", self.departure_location, self.arrival_location)
    }
}

/// Replacement values for the edit flow. The flight number may change; boarding
/// records referencing the old number are renumbered by the store in the same
/// transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightUpdate {
    pub flight_number: String,
    pub departure_location: String,
    pub arrival_location: String,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub gate: String,
}
