use std::sync::Arc;

use aerodesk_checkin::{CheckInDesk, DeskSettings, SeatLayout};
use aerodesk_core::repository::{
    BoardingRepository, EmployeeRepository, FlightRepository, PassengerRepository,
    ServiceRepository,
};

#[derive(Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub expiration_seconds: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub passengers: Arc<dyn PassengerRepository>,
    pub flights: Arc<dyn FlightRepository>,
    pub boardings: Arc<dyn BoardingRepository>,
    pub services: Arc<dyn ServiceRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub layout: Arc<SeatLayout>,
    pub auth: AuthSettings,
    pub desk_settings: DeskSettings,
}

impl AppState {
    /// A fresh desk session scoped to one request. The HTTP surface is
    /// stateless; correctness relies on the commit-time invariants, not on
    /// session affinity.
    pub fn desk(&self) -> CheckInDesk {
        CheckInDesk::new(
            self.passengers.clone(),
            self.flights.clone(),
            self.boardings.clone(),
            (*self.layout).clone(),
            self.desk_settings.clone(),
        )
    }
}
