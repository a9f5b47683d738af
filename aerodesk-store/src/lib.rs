pub mod app_config;
pub mod boarding_repo;
pub mod database;
pub mod employee_repo;
pub mod error;
pub mod flight_repo;
pub mod memory;
pub mod passenger_repo;
pub mod service_repo;

pub use boarding_repo::PostgresBoardingRepository;
pub use database::DbClient;
pub use employee_repo::PostgresEmployeeRepository;
pub use flight_repo::PostgresFlightRepository;
pub use memory::MemoryStore;
pub use passenger_repo::PostgresPassengerRepository;
pub use service_repo::PostgresServiceRepository;
