use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use aerodesk_core::boarding::{BoardingRecord, NewBoarding};
use aerodesk_core::repository::{BoardingRepository, StoreResult};

use crate::error::map_sqlx_err;

pub struct PostgresBoardingRepository {
    pool: PgPool,
}

impl PostgresBoardingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BoardingRow {
    boarding_id: i64,
    passenger_id: String,
    flight_number: String,
    seat_label: String,
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
    baggage_allowance_kg: i32,
}

impl From<BoardingRow> for BoardingRecord {
    fn from(row: BoardingRow) -> Self {
        BoardingRecord {
            boarding_id: row.boarding_id,
            passenger_id: row.passenger_id,
            flight_number: row.flight_number,
            seat_label: row.seat_label,
            departure: row.departure,
            arrival: row.arrival,
            baggage_allowance_kg: row.baggage_allowance_kg,
        }
    }
}

#[async_trait]
impl BoardingRepository for PostgresBoardingRepository {
    async fn list_occupied_seats(&self, flight_number: &str) -> StoreResult<HashSet<String>> {
        let labels: Vec<String> =
            sqlx::query_scalar("SELECT seat_label FROM boarding WHERE flight_number = $1")
                .bind(flight_number)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        Ok(labels.into_iter().collect())
    }

    async fn find(&self, boarding_id: i64) -> StoreResult<Option<BoardingRecord>> {
        let row = sqlx::query_as::<_, BoardingRow>(
            r#"
            SELECT boarding_id, passenger_id, flight_number, seat_label,
                   departure, arrival, baggage_allowance_kg
            FROM boarding WHERE boarding_id = $1
            "#,
        )
        .bind(boarding_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(BoardingRecord::from))
    }

    async fn find_for_passenger(
        &self,
        passenger_id: &str,
        flight_number: &str,
    ) -> StoreResult<Option<BoardingRecord>> {
        let row = sqlx::query_as::<_, BoardingRow>(
            r#"
            SELECT boarding_id, passenger_id, flight_number, seat_label,
                   departure, arrival, baggage_allowance_kg
            FROM boarding WHERE passenger_id = $1 AND flight_number = $2
            "#,
        )
        .bind(passenger_id)
        .bind(flight_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(BoardingRecord::from))
    }

    async fn find_for_seat(
        &self,
        flight_number: &str,
        seat_label: &str,
    ) -> StoreResult<Option<BoardingRecord>> {
        let row = sqlx::query_as::<_, BoardingRow>(
            r#"
            SELECT boarding_id, passenger_id, flight_number, seat_label,
                   departure, arrival, baggage_allowance_kg
            FROM boarding WHERE flight_number = $1 AND seat_label = $2
            "#,
        )
        .bind(flight_number)
        .bind(seat_label)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(BoardingRecord::from))
    }

    async fn list_for_passenger(&self, passenger_id: &str) -> StoreResult<Vec<BoardingRecord>> {
        let rows = sqlx::query_as::<_, BoardingRow>(
            r#"
            SELECT boarding_id, passenger_id, flight_number, seat_label,
                   departure, arrival, baggage_allowance_kg
            FROM boarding WHERE passenger_id = $1 ORDER BY boarding_id
            "#,
        )
        .bind(passenger_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(BoardingRecord::from).collect())
    }

    async fn insert(&self, record: &NewBoarding) -> StoreResult<BoardingRecord> {
        // Single conditional insert. The unique constraints on
        // (flight_number, seat_label) and (passenger_id, flight_number)
        // arbitrate concurrent commits; a losing insert surfaces as a typed
        // conflict via the constraint name.
        let row = sqlx::query_as::<_, BoardingRow>(
            r#"
            INSERT INTO boarding (passenger_id, flight_number, seat_label,
                                  departure, arrival, baggage_allowance_kg)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING boarding_id, passenger_id, flight_number, seat_label,
                      departure, arrival, baggage_allowance_kg
            "#,
        )
        .bind(&record.passenger_id)
        .bind(&record.flight_number)
        .bind(&record.seat_label)
        .bind(record.departure)
        .bind(record.arrival)
        .bind(record.baggage_allowance_kg)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.into())
    }

    async fn delete(&self, boarding_id: i64) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        sqlx::query("DELETE FROM services WHERE boarding_id = $1")
            .bind(boarding_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        sqlx::query("DELETE FROM boarding WHERE boarding_id = $1")
            .bind(boarding_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }
}
