use aerodesk_shared::pii::Masked;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered customer. `passenger_id` is the identity document number the
/// desk asks for, so it is the natural key rather than a surrogate id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub passenger_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: NaiveDate,
    pub phone_number: Masked<String>,
}

impl Passenger {
    /// Display name shown to the desk agent for confirmation.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Replacement values for the edit flow. The passenger id itself is immutable.
#[derive(Debug, Clone, Deserialize)]
pub struct PassengerUpdate {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: NaiveDate,
    pub phone_number: Masked<String>,
}
