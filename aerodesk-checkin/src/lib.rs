pub mod desk;
pub mod layout;
pub mod seatmap;

pub use desk::{CheckInDesk, CheckInError, CheckInRequest, DeskSettings};
pub use layout::{CabinSection, CabinSpec, LayoutError, SeatLayout};
pub use seatmap::{SeatMap, SeatMapError, SeatState};
