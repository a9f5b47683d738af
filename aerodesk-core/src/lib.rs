pub mod boarding;
pub mod employee;
pub mod flight;
pub mod passenger;
pub mod repository;
pub mod service;

pub use boarding::{BoardingRecord, NewBoarding};
pub use employee::{Employee, EmployeeUpdate};
pub use flight::{Flight, FlightUpdate};
pub use passenger::{Passenger, PassengerUpdate};
pub use repository::{
    BoardingRepository, ConflictKind, EmployeeRepository, FlightRepository, PassengerRepository,
    ServiceRepository, StoreError, StoreResult,
};
pub use service::{LuggageTier, ServiceRecord};
