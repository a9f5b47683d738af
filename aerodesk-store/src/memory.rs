use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use aerodesk_core::boarding::{BoardingRecord, NewBoarding};
use aerodesk_core::employee::{Employee, EmployeeUpdate};
use aerodesk_core::flight::{Flight, FlightUpdate};
use aerodesk_core::passenger::{Passenger, PassengerUpdate};
use aerodesk_core::repository::{
    BoardingRepository, ConflictKind, EmployeeRepository, FlightRepository, PassengerRepository,
    ServiceRepository, StoreError, StoreResult,
};
use aerodesk_core::service::ServiceRecord;

#[derive(Default)]
struct Inner {
    passengers: HashMap<String, Passenger>,
    flights: HashMap<String, Flight>,
    boardings: HashMap<i64, BoardingRecord>,
    services: HashMap<i64, ServiceRecord>,
    employees: HashMap<i64, Employee>,
    next_boarding_id: i64,
}

/// In-memory implementation of every gateway trait, with the same conflict
/// semantics as the Postgres store. One mutex guards all tables, which makes
/// each operation atomic the way a database transaction would be.
///
/// Used by workflow and API tests, and usable as a throwaway local backend.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_boarding_id: 1,
                ..Inner::default()
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PassengerRepository for MemoryStore {
    async fn find(&self, passenger_id: &str) -> StoreResult<Option<Passenger>> {
        let inner = self.inner.lock().await;
        Ok(inner.passengers.get(passenger_id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Passenger>> {
        let inner = self.inner.lock().await;
        let mut all: Vec<Passenger> = inner.passengers.values().cloned().collect();
        all.sort_by(|a, b| a.passenger_id.cmp(&b.passenger_id));
        Ok(all)
    }

    async fn create(&self, passenger: &Passenger) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.passengers.contains_key(&passenger.passenger_id) {
            return Err(StoreError::Conflict(ConflictKind::DuplicatePassengerId));
        }
        if inner
            .passengers
            .values()
            .any(|p| p.phone_number == passenger.phone_number)
        {
            return Err(StoreError::Conflict(ConflictKind::DuplicatePhoneNumber));
        }
        inner
            .passengers
            .insert(passenger.passenger_id.clone(), passenger.clone());
        Ok(())
    }

    async fn update(&self, passenger_id: &str, update: &PassengerUpdate) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if let Some(existing) = inner.passengers.get_mut(passenger_id) {
            existing.first_name = update.first_name.clone();
            existing.last_name = update.last_name.clone();
            existing.gender = update.gender.clone();
            existing.birth_date = update.birth_date;
            existing.phone_number = update.phone_number.clone();
        }
        Ok(())
    }

    async fn delete_cascade(&self, passenger_id: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        let boarding_ids: Vec<i64> = inner
            .boardings
            .values()
            .filter(|b| b.passenger_id == passenger_id)
            .map(|b| b.boarding_id)
            .collect();
        for id in boarding_ids {
            inner.services.remove(&id);
            inner.boardings.remove(&id);
        }
        inner.passengers.remove(passenger_id);
        Ok(())
    }
}

#[async_trait]
impl FlightRepository for MemoryStore {
    async fn find(&self, flight_number: &str) -> StoreResult<Option<Flight>> {
        let inner = self.inner.lock().await;
        Ok(inner.flights.get(flight_number).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Flight>> {
        let inner = self.inner.lock().await;
        let mut all: Vec<Flight> = inner.flights.values().cloned().collect();
        all.sort_by_key(|f| f.scheduled_departure);
        Ok(all)
    }

    async fn search(&self, term: &str) -> StoreResult<Vec<Flight>> {
        let needle = term.to_lowercase();
        let inner = self.inner.lock().await;
        let mut hits: Vec<Flight> = inner
            .flights
            .values()
            .filter(|f| {
                f.flight_number.to_lowercase().contains(&needle)
                    || f.departure_location.to_lowercase().contains(&needle)
                    || f.arrival_location.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        hits.sort_by_key(|f| f.scheduled_departure);
        Ok(hits)
    }

    async fn create(&self, flight: &Flight) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.flights.contains_key(&flight.flight_number) {
            return Err(StoreError::Conflict(ConflictKind::DuplicateFlightNumber));
        }
        if inner
            .flights
            .values()
            .any(|f| f.gate == flight.gate && f.scheduled_departure == flight.scheduled_departure)
        {
            return Err(StoreError::Conflict(ConflictKind::GateOccupied));
        }
        inner
            .flights
            .insert(flight.flight_number.clone(), flight.clone());
        Ok(())
    }

    async fn update(&self, flight_number: &str, update: &FlightUpdate) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.flights.remove(flight_number).is_none() {
            return Ok(());
        }
        if update.flight_number != flight_number {
            // Renumber dependent boarding records along with the flight.
            for boarding in inner.boardings.values_mut() {
                if boarding.flight_number == flight_number {
                    boarding.flight_number = update.flight_number.clone();
                }
            }
        }
        inner.flights.insert(
            update.flight_number.clone(),
            Flight {
                flight_number: update.flight_number.clone(),
                departure_location: update.departure_location.clone(),
                arrival_location: update.arrival_location.clone(),
                scheduled_departure: update.scheduled_departure,
                scheduled_arrival: update.scheduled_arrival,
                gate: update.gate.clone(),
            },
        );
        Ok(())
    }

    async fn delete_cascade(&self, flight_number: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        let boarding_ids: Vec<i64> = inner
            .boardings
            .values()
            .filter(|b| b.flight_number == flight_number)
            .map(|b| b.boarding_id)
            .collect();
        for id in boarding_ids {
            inner.services.remove(&id);
            inner.boardings.remove(&id);
        }
        inner.flights.remove(flight_number);
        Ok(())
    }
}

#[async_trait]
impl BoardingRepository for MemoryStore {
    async fn list_occupied_seats(&self, flight_number: &str) -> StoreResult<HashSet<String>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .boardings
            .values()
            .filter(|b| b.flight_number == flight_number)
            .map(|b| b.seat_label.clone())
            .collect())
    }

    async fn find(&self, boarding_id: i64) -> StoreResult<Option<BoardingRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner.boardings.get(&boarding_id).cloned())
    }

    async fn find_for_passenger(
        &self,
        passenger_id: &str,
        flight_number: &str,
    ) -> StoreResult<Option<BoardingRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .boardings
            .values()
            .find(|b| b.passenger_id == passenger_id && b.flight_number == flight_number)
            .cloned())
    }

    async fn find_for_seat(
        &self,
        flight_number: &str,
        seat_label: &str,
    ) -> StoreResult<Option<BoardingRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .boardings
            .values()
            .find(|b| b.flight_number == flight_number && b.seat_label == seat_label)
            .cloned())
    }

    async fn list_for_passenger(&self, passenger_id: &str) -> StoreResult<Vec<BoardingRecord>> {
        let inner = self.inner.lock().await;
        let mut records: Vec<BoardingRecord> = inner
            .boardings
            .values()
            .filter(|b| b.passenger_id == passenger_id)
            .cloned()
            .collect();
        records.sort_by_key(|b| b.boarding_id);
        Ok(records)
    }

    async fn insert(&self, record: &NewBoarding) -> StoreResult<BoardingRecord> {
        // Both uniqueness checks and the insert happen under one lock, which
        // gives this store the same atomicity as the Postgres constraints.
        let mut inner = self.inner.lock().await;
        if inner
            .boardings
            .values()
            .any(|b| b.flight_number == record.flight_number && b.seat_label == record.seat_label)
        {
            return Err(StoreError::Conflict(ConflictKind::SeatTaken));
        }
        if inner.boardings.values().any(|b| {
            b.passenger_id == record.passenger_id && b.flight_number == record.flight_number
        }) {
            return Err(StoreError::Conflict(ConflictKind::DuplicateCheckIn));
        }

        let boarding_id = inner.next_boarding_id;
        inner.next_boarding_id += 1;
        let committed = BoardingRecord {
            boarding_id,
            passenger_id: record.passenger_id.clone(),
            flight_number: record.flight_number.clone(),
            seat_label: record.seat_label.clone(),
            departure: record.departure,
            arrival: record.arrival,
            baggage_allowance_kg: record.baggage_allowance_kg,
        };
        inner.boardings.insert(boarding_id, committed.clone());
        Ok(committed)
    }

    async fn delete(&self, boarding_id: i64) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.services.remove(&boarding_id);
        inner.boardings.remove(&boarding_id);
        Ok(())
    }
}

#[async_trait]
impl ServiceRepository for MemoryStore {
    async fn find(&self, boarding_id: i64) -> StoreResult<Option<ServiceRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner.services.get(&boarding_id).cloned())
    }

    async fn upsert(&self, record: &ServiceRecord) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.services.insert(record.boarding_id, record.clone());
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn find(&self, employee_id: i64) -> StoreResult<Option<Employee>> {
        let inner = self.inner.lock().await;
        Ok(inner.employees.get(&employee_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Employee>> {
        let inner = self.inner.lock().await;
        Ok(inner.employees.values().find(|e| e.email == email).cloned())
    }

    async fn create(&self, employee: &Employee) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.employees.contains_key(&employee.employee_id) {
            return Err(StoreError::Conflict(ConflictKind::DuplicateEmployeeId));
        }
        if inner.employees.values().any(|e| e.email == employee.email) {
            return Err(StoreError::Conflict(ConflictKind::DuplicateEmail));
        }
        inner
            .employees
            .insert(employee.employee_id, employee.clone());
        Ok(())
    }

    async fn update(&self, employee_id: i64, update: &EmployeeUpdate) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if let Some(existing) = inner.employees.get_mut(&employee_id) {
            existing.first_name = update.first_name.clone();
            existing.last_name = update.last_name.clone();
            existing.email = update.email.clone();
            existing.role = update.role.clone();
            existing.password = update.password.clone();
        }
        Ok(())
    }
}
