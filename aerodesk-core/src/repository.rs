use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;

use crate::boarding::{BoardingRecord, NewBoarding};
use crate::employee::{Employee, EmployeeUpdate};
use crate::flight::{Flight, FlightUpdate};
use crate::passenger::{Passenger, PassengerUpdate};
use crate::service::ServiceRecord;

/// Which uniqueness rule a rejected write collided with. The store reports
/// conflicts by kind so callers never have to parse driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// (flight_number, seat_label) already has a boarding record.
    SeatTaken,
    /// (passenger_id, flight_number) already has a boarding record.
    DuplicateCheckIn,
    DuplicatePassengerId,
    DuplicatePhoneNumber,
    DuplicateFlightNumber,
    /// Another flight departs from the same gate at the same time.
    GateOccupied,
    DuplicateEmployeeId,
    DuplicateEmail,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConflictKind::SeatTaken => "seat already taken",
            ConflictKind::DuplicateCheckIn => "passenger already checked in",
            ConflictKind::DuplicatePassengerId => "passenger id already registered",
            ConflictKind::DuplicatePhoneNumber => "phone number already registered",
            ConflictKind::DuplicateFlightNumber => "flight number already exists",
            ConflictKind::GateOccupied => "gate occupied at that departure time",
            ConflictKind::DuplicateEmployeeId => "employee id already used",
            ConflictKind::DuplicateEmail => "email already registered",
        };
        f.write_str(name)
    }
}

/// Errors crossing the persistence boundary.
///
/// `Unavailable` is retryable; `Conflict` is a definitive rejection. Raw
/// driver errors are flattened into `Database` and never leak upward.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("uniqueness conflict: {0}")]
    Conflict(ConflictKind),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Passenger records. `create` enforces unique passenger id and phone number.
#[async_trait]
pub trait PassengerRepository: Send + Sync {
    async fn find(&self, passenger_id: &str) -> StoreResult<Option<Passenger>>;

    async fn list(&self) -> StoreResult<Vec<Passenger>>;

    async fn create(&self, passenger: &Passenger) -> StoreResult<()>;

    async fn update(&self, passenger_id: &str, update: &PassengerUpdate) -> StoreResult<()>;

    /// Deletes the passenger and its dependents in dependency order:
    /// services, then boarding records, then the passenger row.
    async fn delete_cascade(&self, passenger_id: &str) -> StoreResult<()>;
}

/// Flight records. `create` enforces a unique flight number and rejects a
/// second flight at the same gate with the same scheduled departure.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn find(&self, flight_number: &str) -> StoreResult<Option<Flight>>;

    async fn list(&self) -> StoreResult<Vec<Flight>>;

    /// Substring match on flight number and both locations.
    async fn search(&self, term: &str) -> StoreResult<Vec<Flight>>;

    async fn create(&self, flight: &Flight) -> StoreResult<()>;

    /// Applies the update; if the flight number changes, boarding records
    /// referencing the old number are renumbered in the same transaction.
    async fn update(&self, flight_number: &str, update: &FlightUpdate) -> StoreResult<()>;

    /// Deletes the flight and its dependents in dependency order:
    /// services, then boarding records, then the flight row.
    async fn delete_cascade(&self, flight_number: &str) -> StoreResult<()>;
}

/// Boarding (check-in) records. `insert` is the atomic arbiter of the two
/// uniqueness invariants: a losing insert returns `Conflict(SeatTaken)` or
/// `Conflict(DuplicateCheckIn)` regardless of what pre-checks observed.
#[async_trait]
pub trait BoardingRepository: Send + Sync {
    async fn list_occupied_seats(&self, flight_number: &str) -> StoreResult<HashSet<String>>;

    async fn find(&self, boarding_id: i64) -> StoreResult<Option<BoardingRecord>>;

    async fn find_for_passenger(
        &self,
        passenger_id: &str,
        flight_number: &str,
    ) -> StoreResult<Option<BoardingRecord>>;

    async fn find_for_seat(
        &self,
        flight_number: &str,
        seat_label: &str,
    ) -> StoreResult<Option<BoardingRecord>>;

    async fn list_for_passenger(&self, passenger_id: &str) -> StoreResult<Vec<BoardingRecord>>;

    async fn insert(&self, record: &NewBoarding) -> StoreResult<BoardingRecord>;

    /// Removes one boarding record and its services row. Used by the explicit
    /// cancel-check-in path, not by the parent cascades.
    async fn delete(&self, boarding_id: i64) -> StoreResult<()>;
}

/// Ancillary services, one row per boarding record.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn find(&self, boarding_id: i64) -> StoreResult<Option<ServiceRecord>>;

    /// Insert-or-replace keyed on boarding id. The boarding record must exist.
    async fn upsert(&self, record: &ServiceRecord) -> StoreResult<()>;
}

/// Staff accounts for the desk client.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn find(&self, employee_id: i64) -> StoreResult<Option<Employee>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Employee>>;

    async fn create(&self, employee: &Employee) -> StoreResult<()>;

    async fn update(&self, employee_id: i64, update: &EmployeeUpdate) -> StoreResult<()>;
}
