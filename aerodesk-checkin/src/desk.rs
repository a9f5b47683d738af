use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::timeout;
use tracing::info;

use aerodesk_core::boarding::{BoardingRecord, NewBoarding};
use aerodesk_core::flight::Flight;
use aerodesk_core::passenger::Passenger;
use aerodesk_core::repository::{
    BoardingRepository, ConflictKind, FlightRepository, PassengerRepository, StoreError,
    StoreResult,
};

use crate::layout::SeatLayout;
use crate::seatmap::{SeatMap, SeatMapError};

/// Per-desk knobs, sourced from configuration.
#[derive(Debug, Clone)]
pub struct DeskSettings {
    /// Upper bound on any single persistence call.
    pub store_timeout: Duration,
    /// Baggage allowance written when the request does not specify one.
    pub default_baggage_kg: i32,
}

impl Default for DeskSettings {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(2500),
            default_baggage_kg: 20,
        }
    }
}

/// Everything needed to commit one check-in. Departure and arrival are
/// snapshots of the flight schedule at commit time.
#[derive(Debug, Clone)]
pub struct CheckInRequest {
    pub passenger_id: String,
    pub flight_number: String,
    pub seat_label: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub baggage_allowance_kg: Option<i32>,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckInError {
    #[error("passenger {0} not found")]
    PassengerNotFound(String),

    #[error("flight {0} not found")]
    FlightNotFound(String),

    #[error("boarding record {0} not found")]
    BoardingNotFound(i64),

    #[error("no flight loaded at this desk")]
    NoActiveFlight,

    #[error("no seat selected")]
    NoSeatSelected,

    #[error("unknown seat label {0}")]
    UnknownSeat(String),

    #[error("seat {0} is not available")]
    SeatUnavailable(String),

    #[error("seat {0} is already taken on this flight")]
    SeatTaken(String),

    #[error("passenger has already checked in for this flight")]
    DuplicateCheckIn,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("store error: {0}")]
    Store(String),
}

/// One agent's check-in session: gateway handles, the seat map for the
/// currently loaded flight, and the discrete workflow operations. All state
/// mutation goes through here; renderers only read `seat_map()`.
pub struct CheckInDesk {
    passengers: Arc<dyn PassengerRepository>,
    flights: Arc<dyn FlightRepository>,
    boardings: Arc<dyn BoardingRepository>,
    seat_map: SeatMap,
    active_flight: Option<Flight>,
    settings: DeskSettings,
}

impl CheckInDesk {
    pub fn new(
        passengers: Arc<dyn PassengerRepository>,
        flights: Arc<dyn FlightRepository>,
        boardings: Arc<dyn BoardingRepository>,
        layout: SeatLayout,
        settings: DeskSettings,
    ) -> Self {
        Self {
            passengers,
            flights,
            boardings,
            seat_map: SeatMap::new(layout),
            active_flight: None,
            settings,
        }
    }

    pub fn seat_map(&self) -> &SeatMap {
        &self.seat_map
    }

    pub fn active_flight(&self) -> Option<&Flight> {
        self.active_flight.as_ref()
    }

    /// Looks up a passenger for confirmation before check-in.
    pub async fn lookup_passenger(&self, passenger_id: &str) -> Result<Passenger, CheckInError> {
        self.call(self.passengers.find(passenger_id))
            .await
            .map_err(store_err)?
            .ok_or_else(|| CheckInError::PassengerNotFound(passenger_id.to_string()))
    }

    /// Looks up a flight and makes it the desk's active flight. The seat map
    /// is fully reset and reloaded, since occupancy is flight-scoped.
    pub async fn lookup_flight(&mut self, flight_number: &str) -> Result<Flight, CheckInError> {
        let flight = self
            .call(self.flights.find(flight_number))
            .await
            .map_err(store_err)?
            .ok_or_else(|| CheckInError::FlightNotFound(flight_number.to_string()))?;

        self.seat_map.reset();
        self.active_flight = Some(flight.clone());
        self.reload_occupancy().await?;
        Ok(flight)
    }

    /// Re-reads occupancy for the active flight into the seat map.
    pub async fn refresh(&mut self) -> Result<(), CheckInError> {
        if self.active_flight.is_none() {
            return Err(CheckInError::NoActiveFlight);
        }
        self.reload_occupancy().await
    }

    /// Records the pending seat choice. The seat must currently be Free.
    pub fn select_seat(&mut self, label: &str) -> Result<(), CheckInError> {
        if self.active_flight.is_none() {
            return Err(CheckInError::NoActiveFlight);
        }
        self.seat_map.select(label).map_err(|err| match err {
            SeatMapError::UnknownSeat(label) => CheckInError::UnknownSeat(label),
            SeatMapError::SeatUnavailable(label) => CheckInError::SeatUnavailable(label),
        })
    }

    /// Commits the desk's pending selection for the given passenger, using
    /// the active flight's schedule as the boarding snapshot.
    pub async fn commit_selected(
        &mut self,
        passenger_id: &str,
        baggage_allowance_kg: Option<i32>,
    ) -> Result<BoardingRecord, CheckInError> {
        let flight = self
            .active_flight
            .clone()
            .ok_or(CheckInError::NoActiveFlight)?;
        let seat_label = self
            .seat_map
            .selected()
            .ok_or(CheckInError::NoSeatSelected)?
            .to_string();

        self.commit_check_in(CheckInRequest {
            passenger_id: passenger_id.to_string(),
            flight_number: flight.flight_number.clone(),
            seat_label,
            departure: flight.scheduled_departure,
            arrival: flight.scheduled_arrival,
            baggage_allowance_kg,
        })
        .await
    }

    /// Commits one check-in.
    ///
    /// The two pre-checks give definitive early rejections, but the insert is
    /// the atomic arbiter: another desk can win the seat between the checks
    /// and the write, in which case the store's conflict is translated here
    /// and the seat map reloaded so the agent sees current truth.
    pub async fn commit_check_in(
        &mut self,
        request: CheckInRequest,
    ) -> Result<BoardingRecord, CheckInError> {
        let existing = self
            .call(
                self.boardings
                    .find_for_passenger(&request.passenger_id, &request.flight_number),
            )
            .await
            .map_err(store_err)?;
        if existing.is_some() {
            return Err(CheckInError::DuplicateCheckIn);
        }

        let taken = self
            .call(
                self.boardings
                    .find_for_seat(&request.flight_number, &request.seat_label),
            )
            .await
            .map_err(store_err)?;
        if taken.is_some() {
            self.reload_occupancy().await?;
            return Err(CheckInError::SeatTaken(request.seat_label));
        }

        let record = NewBoarding {
            passenger_id: request.passenger_id.clone(),
            flight_number: request.flight_number.clone(),
            seat_label: request.seat_label.clone(),
            departure: request.departure,
            arrival: request.arrival,
            baggage_allowance_kg: request
                .baggage_allowance_kg
                .unwrap_or(self.settings.default_baggage_kg),
        };

        let committed = match self.call(self.boardings.insert(&record)).await {
            Ok(committed) => committed,
            Err(StoreError::Conflict(ConflictKind::SeatTaken)) => {
                self.reload_occupancy().await?;
                return Err(CheckInError::SeatTaken(request.seat_label));
            }
            Err(StoreError::Conflict(ConflictKind::DuplicateCheckIn)) => {
                return Err(CheckInError::DuplicateCheckIn);
            }
            Err(err) => return Err(store_err(err)),
        };

        info!(
            boarding_id = committed.boarding_id,
            flight = %committed.flight_number,
            seat = %committed.seat_label,
            "check-in committed"
        );

        self.seat_map.clear_selection();
        self.reload_if_active(&request.flight_number).await?;
        Ok(committed)
    }

    /// Deletes one boarding record (the explicit seat-release path) and
    /// reloads the seat map if the record belongs to the active flight.
    pub async fn cancel_check_in(&mut self, boarding_id: i64) -> Result<(), CheckInError> {
        let record = self
            .call(self.boardings.find(boarding_id))
            .await
            .map_err(store_err)?
            .ok_or(CheckInError::BoardingNotFound(boarding_id))?;

        self.call(self.boardings.delete(boarding_id))
            .await
            .map_err(store_err)?;

        info!(
            boarding_id,
            flight = %record.flight_number,
            seat = %record.seat_label,
            "check-in cancelled"
        );

        self.reload_if_active(&record.flight_number).await?;
        Ok(())
    }

    async fn reload_if_active(&mut self, flight_number: &str) -> Result<(), CheckInError> {
        let matches = self
            .active_flight
            .as_ref()
            .map(|f| f.flight_number == flight_number)
            .unwrap_or(false);
        if matches {
            self.reload_occupancy().await?;
        }
        Ok(())
    }

    async fn reload_occupancy(&mut self) -> Result<(), CheckInError> {
        let flight_number = match &self.active_flight {
            Some(flight) => flight.flight_number.clone(),
            None => return Ok(()),
        };
        let occupied = self
            .call(self.boardings.list_occupied_seats(&flight_number))
            .await
            .map_err(store_err)?;
        self.seat_map.apply_occupancy(&occupied);
        Ok(())
    }

    /// Bounds a persistence call; an elapsed timeout is indistinguishable
    /// from an unreachable store as far as the agent is concerned.
    async fn call<T, F>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match timeout(self.settings.store_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Unavailable(format!(
                "store call exceeded {}ms",
                self.settings.store_timeout.as_millis()
            ))),
        }
    }
}

fn store_err(err: StoreError) -> CheckInError {
    match err {
        StoreError::Unavailable(msg) => CheckInError::StoreUnavailable(msg),
        StoreError::Conflict(kind) => CheckInError::Store(kind.to_string()),
        StoreError::Database(msg) => CheckInError::Store(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CabinSpec, SeatLayout};
    use crate::seatmap::SeatState;
    use aerodesk_shared::pii::Masked;
    use aerodesk_store::memory::MemoryStore;
    use chrono::TimeZone;

    fn layout() -> SeatLayout {
        SeatLayout::from_cabins(
            &CabinSpec {
                first_row: 1,
                last_row: 4,
                letters: "ABCD".to_string(),
            },
            &CabinSpec {
                first_row: 5,
                last_row: 30,
                letters: "ABCDEF".to_string(),
            },
        )
        .unwrap()
    }

    fn passenger(id: &str, first: &str, last: &str) -> Passenger {
        Passenger {
            passenger_id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            gender: "F".to_string(),
            birth_date: chrono::NaiveDate::from_ymd_opt(1985, 6, 1).unwrap(),
            phone_number: Masked(format!("555{}", id)),
        }
    }

    fn flight(number: &str) -> Flight {
        Flight {
            flight_number: number.to_string(),
            departure_location: "IST".to_string(),
            arrival_location: "AMS".to_string(),
            scheduled_departure: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
            scheduled_arrival: Utc.with_ymd_and_hms(2025, 3, 14, 13, 5, 0).unwrap(),
            gate: "B12".to_string(),
        }
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        PassengerRepository::create(&*store, &passenger("P1001", "Nadia", "Okafor"))
            .await
            .unwrap();
        PassengerRepository::create(&*store, &passenger("P1002", "Jonas", "Berg"))
            .await
            .unwrap();
        FlightRepository::create(&*store, &flight("FL200")).await.unwrap();
        store
    }

    fn desk(store: &Arc<MemoryStore>) -> CheckInDesk {
        CheckInDesk::new(
            store.clone(),
            store.clone(),
            store.clone(),
            layout(),
            DeskSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_full_check_in_scenario() {
        let store = seeded_store().await;
        let mut desk = desk(&store);

        let found = desk.lookup_passenger("P1001").await.unwrap();
        assert_eq!(found.full_name(), "Nadia Okafor");

        desk.lookup_flight("FL200").await.unwrap();
        desk.select_seat("12A").unwrap();
        let record = desk.commit_selected("P1001", None).await.unwrap();
        assert_eq!(record.seat_label, "12A");
        assert_eq!(record.baggage_allowance_kg, 20);

        // The committed seat shows Occupied after the automatic reload.
        assert_eq!(desk.seat_map().state("12A"), Some(SeatState::Occupied));

        // A second agent picking the same seat after reload is rejected.
        let mut other = self::desk(&store);
        other.lookup_flight("FL200").await.unwrap();
        let err = other.select_seat("12A").unwrap_err();
        assert!(matches!(err, CheckInError::SeatUnavailable(_)));

        // The same passenger cannot check in twice, regardless of seat.
        other.select_seat("14C").unwrap();
        let err = other.commit_selected("P1001", None).await.unwrap_err();
        assert!(matches!(err, CheckInError::DuplicateCheckIn));
    }

    #[tokio::test]
    async fn test_occupied_set_matches_boarding_records() {
        let store = seeded_store().await;
        let mut desk = desk(&store);
        desk.lookup_flight("FL200").await.unwrap();

        for (pid, seat) in [("P1001", "1A"), ("P1002", "7F")] {
            desk.select_seat(seat).unwrap();
            desk.commit_selected(pid, None).await.unwrap();
        }

        let from_store = store.list_occupied_seats("FL200").await.unwrap();
        assert_eq!(desk.seat_map().occupied(), from_store);
    }

    #[tokio::test]
    async fn test_concurrent_commits_exactly_one_wins() {
        let store = seeded_store().await;
        let mut first = desk(&store);
        let mut second = desk(&store);
        first.lookup_flight("FL200").await.unwrap();
        second.lookup_flight("FL200").await.unwrap();
        first.select_seat("5B").unwrap();
        second.select_seat("5B").unwrap();

        let (a, b) = tokio::join!(
            first.commit_selected("P1001", None),
            second.commit_selected("P1002", None),
        );

        let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(successes, 1);
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser.unwrap_err(), CheckInError::SeatTaken(_)));
    }

    #[tokio::test]
    async fn test_cancel_releases_seat() {
        let store = seeded_store().await;
        let mut desk = desk(&store);
        desk.lookup_flight("FL200").await.unwrap();
        desk.select_seat("2C").unwrap();
        let record = desk.commit_selected("P1001", None).await.unwrap();
        assert_eq!(desk.seat_map().state("2C"), Some(SeatState::Occupied));

        desk.cancel_check_in(record.boarding_id).await.unwrap();
        assert_eq!(desk.seat_map().state("2C"), Some(SeatState::Free));
        assert!(store
            .find_for_seat("FL200", "2C")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_cancel_unknown_boarding() {
        let store = seeded_store().await;
        let mut desk = desk(&store);
        let err = desk.cancel_check_in(9999).await.unwrap_err();
        assert!(matches!(err, CheckInError::BoardingNotFound(9999)));
    }

    #[tokio::test]
    async fn test_lookup_unknown_passenger_and_flight() {
        let store = seeded_store().await;
        let mut desk = desk(&store);
        assert!(matches!(
            desk.lookup_passenger("nope").await.unwrap_err(),
            CheckInError::PassengerNotFound(_)
        ));
        assert!(matches!(
            desk.lookup_flight("FL999").await.unwrap_err(),
            CheckInError::FlightNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_select_requires_loaded_flight() {
        let store = seeded_store().await;
        let mut desk = desk(&store);
        assert!(matches!(
            desk.select_seat("12A").unwrap_err(),
            CheckInError::NoActiveFlight
        ));
    }

    #[tokio::test]
    async fn test_commit_with_explicit_request_bypasses_selection() {
        let store = seeded_store().await;
        let mut desk = desk(&store);
        let flight = desk.lookup_flight("FL200").await.unwrap();

        let record = desk
            .commit_check_in(CheckInRequest {
                passenger_id: "P1002".to_string(),
                flight_number: "FL200".to_string(),
                seat_label: "30F".to_string(),
                departure: flight.scheduled_departure,
                arrival: flight.scheduled_arrival,
                baggage_allowance_kg: Some(32),
            })
            .await
            .unwrap();
        assert_eq!(record.baggage_allowance_kg, 32);
        assert_eq!(desk.seat_map().state("30F"), Some(SeatState::Occupied));
    }

    mod stalled_store {
        use super::*;
        use async_trait::async_trait;

        /// A flight repository that never answers in time.
        struct StalledFlights;

        #[async_trait]
        impl FlightRepository for StalledFlights {
            async fn find(&self, _: &str) -> StoreResult<Option<Flight>> {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(None)
            }
            async fn list(&self) -> StoreResult<Vec<Flight>> {
                unimplemented!()
            }
            async fn search(&self, _: &str) -> StoreResult<Vec<Flight>> {
                unimplemented!()
            }
            async fn create(&self, _: &Flight) -> StoreResult<()> {
                unimplemented!()
            }
            async fn update(
                &self,
                _: &str,
                _: &aerodesk_core::flight::FlightUpdate,
            ) -> StoreResult<()> {
                unimplemented!()
            }
            async fn delete_cascade(&self, _: &str) -> StoreResult<()> {
                unimplemented!()
            }
        }

        #[tokio::test]
        async fn test_slow_store_surfaces_as_unavailable() {
            let store = Arc::new(MemoryStore::new());
            let mut desk = CheckInDesk::new(
                store.clone(),
                Arc::new(StalledFlights),
                store,
                layout(),
                DeskSettings {
                    store_timeout: Duration::from_millis(20),
                    ..DeskSettings::default()
                },
            );
            let err = desk.lookup_flight("FL200").await.unwrap_err();
            assert!(matches!(err, CheckInError::StoreUnavailable(_)));
        }
    }
}
