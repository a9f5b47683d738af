use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use aerodesk_core::flight::{Flight, FlightUpdate};
use aerodesk_core::repository::{FlightRepository, StoreResult};

use crate::error::map_sqlx_err;

pub struct PostgresFlightRepository {
    pool: PgPool,
}

impl PostgresFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    flight_number: String,
    departure_location: String,
    arrival_location: String,
    scheduled_departure: DateTime<Utc>,
    scheduled_arrival: DateTime<Utc>,
    gate: String,
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        Flight {
            flight_number: row.flight_number,
            departure_location: row.departure_location,
            arrival_location: row.arrival_location,
            scheduled_departure: row.scheduled_departure,
            scheduled_arrival: row.scheduled_arrival,
            gate: row.gate,
        }
    }
}

#[async_trait]
impl FlightRepository for PostgresFlightRepository {
    async fn find(&self, flight_number: &str) -> StoreResult<Option<Flight>> {
        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            SELECT flight_number, departure_location, arrival_location,
                   scheduled_departure, scheduled_arrival, gate
            FROM flight WHERE flight_number = $1
            "#,
        )
        .bind(flight_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Flight::from))
    }

    async fn list(&self) -> StoreResult<Vec<Flight>> {
        let rows = sqlx::query_as::<_, FlightRow>(
            r#"
            SELECT flight_number, departure_location, arrival_location,
                   scheduled_departure, scheduled_arrival, gate
            FROM flight ORDER BY scheduled_departure
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(Flight::from).collect())
    }

    async fn search(&self, term: &str) -> StoreResult<Vec<Flight>> {
        let pattern = format!("%{}%", term);
        let rows = sqlx::query_as::<_, FlightRow>(
            r#"
            SELECT flight_number, departure_location, arrival_location,
                   scheduled_departure, scheduled_arrival, gate
            FROM flight
            WHERE flight_number ILIKE $1 OR departure_location ILIKE $1 OR arrival_location ILIKE $1
            ORDER BY scheduled_departure
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(Flight::from).collect())
    }

    async fn create(&self, flight: &Flight) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO flight (flight_number, departure_location, arrival_location,
                                scheduled_departure, scheduled_arrival, gate)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&flight.flight_number)
        .bind(&flight.departure_location)
        .bind(&flight.arrival_location)
        .bind(flight.scheduled_departure)
        .bind(flight.scheduled_arrival)
        .bind(&flight.gate)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn update(&self, flight_number: &str, update: &FlightUpdate) -> StoreResult<()> {
        // Boarding records carry the flight number as their reference key, so
        // a renumber must rewrite them in the same transaction.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        if update.flight_number != flight_number {
            sqlx::query("UPDATE boarding SET flight_number = $1 WHERE flight_number = $2")
                .bind(&update.flight_number)
                .bind(flight_number)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;
        }

        sqlx::query(
            r#"
            UPDATE flight
            SET flight_number = $1, departure_location = $2, arrival_location = $3,
                scheduled_departure = $4, scheduled_arrival = $5, gate = $6
            WHERE flight_number = $7
            "#,
        )
        .bind(&update.flight_number)
        .bind(&update.departure_location)
        .bind(&update.arrival_location)
        .bind(update.scheduled_departure)
        .bind(update.scheduled_arrival)
        .bind(&update.gate)
        .bind(flight_number)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn delete_cascade(&self, flight_number: &str) -> StoreResult<()> {
        // Children before parents: services, then boarding, then the flight.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        sqlx::query(
            r#"
            DELETE FROM services
            WHERE boarding_id IN (SELECT boarding_id FROM boarding WHERE flight_number = $1)
            "#,
        )
        .bind(flight_number)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        sqlx::query("DELETE FROM boarding WHERE flight_number = $1")
            .bind(flight_number)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        sqlx::query("DELETE FROM flight WHERE flight_number = $1")
            .bind(flight_number)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }
}
